//! pstgrep — grep for the live process tree.
//!
//! This library takes one point-in-time snapshot of the OS process table,
//! reconstructs the parent/child forest, and prints every branch that
//! contains a pattern match, preserving ancestry context for each match.
//!
//! # Pipeline
//!
//! - `process::Scanner` — reads per-process records from the proc root
//! - `tree::assemble` — flat records into a parent-linked forest
//! - `matcher::MatchAnnotation` — memoized direct/descendant match table
//! - `render::render_forest` — matched branches as indented text lines
//!
//! The tool is read-only and single-shot: nothing is mutated, nothing is
//! streamed, and no snapshot consistency is promised for processes that
//! appear or vanish while the scan is running.

pub mod cli;
pub mod config;
pub mod error;
pub mod matcher;
pub mod process;
pub mod render;
pub mod tree;

// Re-export main types for convenience
pub use config::{Config, MatchMode};
pub use error::ScanError;
pub use matcher::{MatchAnnotation, Matcher};
pub use process::{ProcessRecord, Scanner, ThreadRecord};
