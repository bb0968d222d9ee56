//! Runtime configuration for pstgrep.
//!
//! This module resolves the parsed CLI arguments into the `Config` struct the
//! scanning, matching and rendering code consumes. The matching policy is
//! resolved here into a tagged variant so the match engine never re-inspects
//! flags at traversal time.

use crate::cli::Args;
use std::path::PathBuf;

/// Default process-information root.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Matching policy, resolved once at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// A process matches if its pid (rendered as decimal), its name, or any
    /// single argument token contains the pattern.
    Token,
    /// A process matches if its fully rendered command line contains the
    /// pattern.
    FullLine,
}

/// Resolved runtime configuration.
///
/// The `show_uid`, `show_gid`, `show_basic_fds` and `show_process_groups`
/// flags are recognized but currently have no effect on output; they are
/// kept here (rather than rejected) so the surface is stable once the
/// corresponding readers land.
#[derive(Debug, Clone)]
pub struct Config {
    pub pattern: String,
    pub match_mode: MatchMode,
    pub show_threads: bool,
    /// Include the thread whose tid equals the owning pid. Default off: that
    /// thread duplicates the process line directly above it.
    pub show_main_thread: bool,
    pub show_workdir: bool,
    pub show_uid: bool,
    pub show_gid: bool,
    pub show_basic_fds: bool,
    pub show_process_groups: bool,
    /// Maximum characters per output line, 0 = unlimited.
    pub truncate: usize,
    /// Log match-cache statistics and per-process decisions to stderr.
    pub trace: bool,
    pub proc_root: PathBuf,
}

impl Config {
    /// Resolves CLI arguments into the runtime configuration.
    pub fn from_args(args: &Args) -> Self {
        Self {
            pattern: args.pattern.clone(),
            match_mode: if args.full_match {
                MatchMode::FullLine
            } else {
                MatchMode::Token
            },
            show_threads: args.show_threads,
            show_main_thread: args.show_main_thread,
            show_workdir: args.show_workdir,
            show_uid: args.show_uid,
            show_gid: args.show_gid,
            show_basic_fds: args.show_basic_fds,
            show_process_groups: args.show_process_groups,
            truncate: args.truncate,
            trace: args.enable_trace,
            proc_root: args.proc_root.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            match_mode: MatchMode::Token,
            show_threads: false,
            show_main_thread: false,
            show_workdir: false,
            show_uid: false,
            show_gid: false,
            show_basic_fds: false,
            show_process_groups: false,
            truncate: 0,
            trace: false,
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
        }
    }
}
