//! Single-file copy with byte progress.

use std::fs::File;
use std::io::{BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use crate::error::Error;

/// Copy `source` to `destination`, creating or truncating it.
///
/// `on_bytes` is called after every chunk with the number of bytes just
/// written. The destination's parent directory must already exist. On failure
/// any partial destination is left in place.
///
/// Returns the total number of bytes copied.
///
/// # Errors
///
/// - [`Error::Access`] if either side is refused for permission reasons
/// - [`Error::Io`] on any other open, read or write failure
pub fn copy_file<F>(
    source: &Path,
    destination: &Path,
    buffer_size: usize,
    mut on_bytes: F,
) -> Result<u64, Error>
where
    F: FnMut(u64),
{
    let mut reader = File::open(source).map_err(|e| Error::from_io(source, e))?;
    let file = File::create(destination).map_err(|e| Error::from_io(destination, e))?;
    let mut writer = BufWriter::new(file);

    let mut buffer = vec![0u8; buffer_size.max(1)];
    let mut copied = 0u64;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::from_io(source, e)),
        };
        writer
            .write_all(&buffer[..n])
            .map_err(|e| Error::from_io(destination, e))?;
        copied += n as u64;
        on_bytes(n as u64);
    }

    writer.flush().map_err(|e| Error::from_io(destination, e))?;
    Ok(copied)
}
