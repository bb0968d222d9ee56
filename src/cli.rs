//! CLI arguments for pstgrep.
//!
//! This module defines the command-line interface structure using the clap
//! library. The parsed arguments are resolved into a runtime
//! [`Config`](crate::config::Config) before any scanning happens; the core
//! never looks at `Args` directly.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "pstgrep",
    about = "Print the branches of the process tree that match a pattern",
    long_about = "Print the branches of the process tree that match a pattern.\n\n\
                  Takes one snapshot of /proc, rebuilds the parent/child process \
                  forest, and prints every process that matches PATTERN together \
                  with its ancestors and descendants, so each match keeps its \
                  full lineage context.",
    version
)]
pub struct Args {
    /// Substring to search for in process ids, names and arguments
    pub pattern: String,

    /// Match against the fully rendered command line instead of individual tokens
    #[arg(short = 'f', long)]
    pub full_match: bool,

    /// Show one line per thread under each printed process
    #[arg(short = 'T', long)]
    pub show_threads: bool,

    /// Include the main thread (tid == pid) in thread listings
    #[arg(long)]
    pub show_main_thread: bool,

    /// Show each process's working directory
    #[arg(short = 'w', long)]
    pub show_workdir: bool,

    /// Show process UIDs (accepted, no effect yet)
    #[arg(short = 'u', long)]
    pub show_uid: bool,

    /// Show process GIDs (accepted, no effect yet)
    #[arg(short = 'g', long)]
    pub show_gid: bool,

    /// Show stdin/stdout/stderr targets (accepted, no effect yet)
    #[arg(short = 'F', long)]
    pub show_basic_fds: bool,

    /// Show process group information (accepted, no effect yet)
    #[arg(short = 'G', long)]
    pub show_process_groups: bool,

    /// Truncate output lines longer than this many characters (0 = unlimited)
    #[arg(short = 't', long, default_value_t = 0)]
    pub truncate: usize,

    /// Log match-cache statistics and per-process match decisions to stderr
    #[arg(long)]
    pub enable_trace: bool,

    /// Alternate process-information root (mainly for testing)
    #[arg(long, default_value = "/proc")]
    pub proc_root: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}
