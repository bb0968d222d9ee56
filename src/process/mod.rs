//! Process repository: record types and the proc-root scanner.
//!
//! This module provides:
//! - `record`: the per-process and per-thread snapshot records
//! - `scanner`: process discovery and detail reading from the proc root

pub mod record;
pub mod scanner;

// Re-export commonly used types
pub use record::{ProcessRecord, ThreadRecord};
pub use scanner::Scanner;
