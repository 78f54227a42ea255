//! Relocation module: verified moves into date-partitioned folders.
//!
//! This module provides functionality for:
//! - Computing `{base}/{YYYY-MM-DD}/{folder}` destinations ([`plan`])
//! - Copying one file with byte progress ([`copier`])
//! - Mirroring a tree, verifying sizes and deleting sources ([`engine`])
//!
//! # Safety
//!
//! A source file is deleted only after its copy exists and matches its size.
//! Any failure stops the run; files already moved are not rolled back.

pub mod copier;
pub mod engine;
pub mod plan;

pub use copier::copy_file;
pub use engine::{RelocationSummary, Relocator, RelocatorConfig, TransferRecord};
pub use plan::{RelocationPlan, DATE_FORMAT};
