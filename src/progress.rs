//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`ProgressCallback`] trait that the scanner and the
//! relocation engine report through, and the [`Progress`] struct which
//! implements it with terminal progress bars.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Phase name used while enumerating a tree.
pub const PHASE_WALKING: &str = "walking";
/// Phase name used while hashing files.
pub const PHASE_HASHING: &str = "hashing";
/// Phase name used while copying, verifying and deleting files.
pub const PHASE_MOVING: &str = "moving";

/// Progress callback for scan and relocation phases.
///
/// Implement this trait to observe progress. All calls happen synchronously
/// on the thread doing the work.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase (see the `PHASE_*` constants)
    /// * `total` - Total units of work (files for hashing, bytes for moving, 0 if unknown)
    fn on_phase_start(&self, phase: &str, total: u64);

    /// Called for each item processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Current item number (1-based)
    /// * `path` - Path being processed
    fn on_progress(&self, current: u64, path: &str);

    /// Called as file content is copied, with the bytes written since the last call.
    fn on_bytes(&self, _bytes: u64) {}

    /// Called after a file has been copied and before its size is verified.
    fn on_file_copied(&self, _source: &Path, _destination: &Path) {}

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);

    /// Called to update the progress message.
    fn on_message(&self, _message: &str) {}
}

/// Progress reporter using indicatif.
///
/// Holds one bar per phase; only the active phase's bar is updated.
pub struct Progress {
    multi: MultiProgress,
    walking: Mutex<Option<ProgressBar>>,
    hashing: Mutex<Option<ProgressBar>>,
    moving: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use paf::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            walking: Mutex::new(None),
            hashing: Mutex::new(None),
            moving: Mutex::new(None),
            quiet,
        }
    }

    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} entries")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn hashing_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    fn moving_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.green/blue}] {bytes}/{total_bytes} {binary_bytes_per_sec} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    fn slot(&self, phase: &str) -> Option<&Mutex<Option<ProgressBar>>> {
        match phase {
            PHASE_WALKING => Some(&self.walking),
            PHASE_HASHING => Some(&self.hashing),
            PHASE_MOVING => Some(&self.moving),
            _ => None,
        }
    }

    /// Run `f` on the most recently started bar that is still active.
    fn with_active(&self, f: impl FnOnce(&ProgressBar)) {
        for slot in [&self.moving, &self.hashing, &self.walking] {
            if let Ok(guard) = slot.lock() {
                if let Some(pb) = guard.as_ref() {
                    f(pb);
                    return;
                }
            }
        }
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: u64) {
        if self.quiet {
            return;
        }

        let pb = match phase {
            PHASE_WALKING => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::walking_style());
                pb.set_message("Walking directory");
                pb.enable_steady_tick(Duration::from_millis(100));
                pb
            }
            PHASE_HASHING => {
                let pb = self.multi.add(ProgressBar::new(total));
                pb.set_style(Self::hashing_style());
                pb.set_message("Hashing");
                pb
            }
            PHASE_MOVING => {
                let pb = self.multi.add(ProgressBar::new(total));
                pb.set_style(Self::moving_style());
                pb.set_message("Moving files...");
                pb
            }
            other => {
                log::debug!("No progress bar for phase '{}'", other);
                return;
            }
        };

        if let Some(slot) = self.slot(phase) {
            if let Ok(mut guard) = slot.lock() {
                *guard = Some(pb);
            }
        }
    }

    fn on_progress(&self, current: u64, path: &str) {
        if self.quiet {
            return;
        }

        let display_msg = truncate_path(path, 30);
        if let Ok(guard) = self.moving.lock() {
            // The byte bar tracks position through on_bytes
            if let Some(pb) = guard.as_ref() {
                pb.set_message(display_msg);
                return;
            }
        }
        self.with_active(|pb| {
            pb.set_position(current);
            pb.set_message(display_msg);
        });
    }

    fn on_bytes(&self, bytes: u64) {
        if self.quiet {
            return;
        }
        if let Ok(guard) = self.moving.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.inc(bytes);
            }
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }

        let Some(slot) = self.slot(phase) else {
            return;
        };
        let finished = slot.lock().ok().and_then(|mut guard| guard.take());
        if let Some(pb) = finished {
            match phase {
                PHASE_WALKING => pb.finish_with_message("Walking complete"),
                PHASE_HASHING => pb.finish_with_message("Hashing complete"),
                _ => pb.finish_and_clear(),
            }
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.with_active(|pb| pb.set_message(message.to_string()));
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len >= max_len {
        let tail: String = file_name.chars().skip(name_len + 3 - max_len).collect();
        return format!("...{}", tail);
    }

    format!(".../{}", file_name)
}
