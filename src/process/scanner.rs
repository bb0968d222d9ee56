//! Process scanning: discovering and reading process entries from the proc
//! root.
//!
//! The scanner lists every numerically named entry of the proc root, reads
//! each process's command line and status attributes, and produces one flat
//! `ProcessRecord` per live process. It tolerates processes (and threads)
//! that vanish between listing and detail read — those are dropped silently —
//! while any other read failure aborts the whole scan.

use crate::config::Config;
use crate::error::ScanError;
use crate::process::record::{ProcessRecord, ThreadRecord};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Reads per-process records from a proc-style directory tree.
#[derive(Debug, Clone)]
pub struct Scanner {
    root: PathBuf,
    self_pid: i32,
    read_workdir: bool,
    read_threads: bool,
    include_main_thread: bool,
}

impl Scanner {
    /// Builds a scanner from the resolved configuration. The scanner's own
    /// pid is excluded from the scan.
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            root: cfg.proc_root.clone(),
            self_pid: std::process::id() as i32,
            read_workdir: cfg.show_workdir,
            read_threads: cfg.show_threads,
            include_main_thread: cfg.show_main_thread,
        }
    }

    /// Overrides the pid treated as "self". Fixture trees in tests are not
    /// perturbed by the test runner's real pid this way.
    pub fn with_self_pid(mut self, pid: i32) -> Self {
        self.self_pid = pid;
        self
    }

    /// Collects one record per live process under the proc root.
    ///
    /// Record order is the enumeration order of the underlying directory and
    /// is not guaranteed to be stable across runs.
    pub fn scan(&self) -> Result<Vec<ProcessRecord>, ScanError> {
        let pids = list_numeric_entries(&self.root).map_err(|source| ScanError::ProcRoot {
            path: self.root.clone(),
            source,
        })?;

        let mut records = Vec::with_capacity(pids.len());

        for pid in pids {
            if pid == self.self_pid {
                continue;
            }

            match self.read_process(pid) {
                Ok(record) => records.push(record),
                Err(err) if err.is_transient_absence() => {
                    trace!(pid, "process vanished during scan, dropping");
                }
                Err(err) => return Err(err),
            }
        }

        debug!(count = records.len(), "collected process records");

        Ok(records)
    }

    /// Reads one process's mandatory details plus the requested optional
    /// extensions.
    fn read_process(&self, pid: i32) -> Result<ProcessRecord, ScanError> {
        let dir = self.root.join(pid.to_string());

        let cmdline_path = dir.join("cmdline");
        let mut tokens = read_cmdline(&cmdline_path).map_err(|source| ScanError::ProcessRead {
            pid,
            path: cmdline_path,
            source,
        })?;

        let status_path = dir.join("status");
        let attrs = read_attrs(&status_path).map_err(|source| ScanError::ProcessRead {
            pid,
            path: status_path,
            source,
        })?;

        let name = if tokens.is_empty() {
            attrs
                .get("Name")
                .map(|n| format!("*{n}*"))
                .unwrap_or_default()
        } else {
            tokens.remove(0)
        };

        let ppid_raw = attrs.get("PPid").map(String::as_str).unwrap_or("");
        let parent_id: i32 = ppid_raw
            .parse()
            .map_err(|_| ScanError::InvalidParentId {
                pid,
                value: ppid_raw.to_string(),
            })?;

        let workdir = if self.read_workdir {
            Some(match fs::read_link(dir.join("cwd")) {
                Ok(target) => target.to_string_lossy().into_owned(),
                // Soft failure: recorded in-band, never fatal.
                Err(err) => format!("!{err}"),
            })
        } else {
            None
        };

        let threads = if self.read_threads {
            self.read_threads_of(pid, &dir)?
        } else {
            Vec::new()
        };

        Ok(ProcessRecord {
            id: pid,
            parent_id,
            name,
            args: tokens,
            workdir,
            threads,
            children: Vec::new(),
        })
    }

    /// Lists the threads of one process from its `task/` sub-tree. The main
    /// thread (tid == pid) is skipped unless configured otherwise; a thread
    /// vanishing mid-read is skipped silently.
    fn read_threads_of(&self, pid: i32, dir: &Path) -> Result<Vec<ThreadRecord>, ScanError> {
        let task_dir = dir.join("task");
        let tids = list_numeric_entries(&task_dir).map_err(|source| ScanError::ProcessRead {
            pid,
            path: task_dir.clone(),
            source,
        })?;

        let mut threads = Vec::new();

        for tid in tids {
            if !self.include_main_thread && tid == pid {
                continue;
            }

            let status_path = task_dir.join(tid.to_string()).join("status");
            let attrs = match read_attrs(&status_path) {
                Ok(attrs) => attrs,
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    trace!(pid, tid, "thread vanished during scan, dropping");
                    continue;
                }
                Err(source) => {
                    return Err(ScanError::ProcessRead {
                        pid,
                        path: status_path,
                        source,
                    })
                }
            };

            threads.push(ThreadRecord {
                id: tid,
                name: attrs.get("Name").cloned().unwrap_or_default(),
            });
        }

        Ok(threads)
    }
}

/// Lists the entries of `dir` whose names parse as positive integers, in
/// directory enumeration order. Non-numeric entries are skipped.
fn list_numeric_entries(dir: &Path) -> io::Result<Vec<i32>> {
    let mut ids = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Ok(id) = name.parse::<i32>() else { continue };
        if id < 1 {
            continue;
        }
        ids.push(id);
    }

    Ok(ids)
}

/// Reads a NUL-delimited command-line blob as a token list. The segment
/// after the trailing NUL (or the single empty segment of an empty blob) is
/// dropped, so an empty blob yields no tokens.
fn read_cmdline(path: &Path) -> io::Result<Vec<String>> {
    let raw = fs::read(path)?;

    let mut parts: Vec<&[u8]> = raw.split(|&b| b == 0).collect();
    parts.pop();

    Ok(parts
        .into_iter()
        .map(|p| String::from_utf8_lossy(p).into_owned())
        .collect())
}

/// Parses a colon-delimited status blob into a key/value table. Each line is
/// split on the first colon with leading spaces/tabs trimmed from the value;
/// lines without a colon are skipped.
fn read_attrs(path: &Path) -> io::Result<HashMap<String, String>> {
    let raw = fs::read(path)?;
    let text = String::from_utf8_lossy(&raw);

    let mut attrs = HashMap::new();

    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        attrs.insert(
            key.to_string(),
            value.trim_start_matches([' ', '\t']).to_string(),
        );
    }

    Ok(attrs)
}
