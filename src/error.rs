//! Error taxonomy for the process scan.
//!
//! Transient absence (a process or thread vanishing between listing and
//! detail read) is deliberately not represented here: it is tolerated at the
//! read site and the node is dropped. Everything below is fatal for the whole
//! scan — no partial tree is ever rendered.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors produced while collecting the process snapshot.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The process-information root itself cannot be listed.
    #[error("cannot open process root {}: {}", path.display(), source)]
    ProcRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A mandatory per-process read failed for a reason other than the
    /// process disappearing.
    #[error("reading {} for pid {}: {}", path.display(), pid, source)]
    ProcessRead {
        pid: i32,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The `PPid` status attribute was missing or unparsable. Without it the
    /// tree cannot be assembled correctly, so this is never skipped silently.
    #[error("invalid PPid {value:?} for pid {pid}")]
    InvalidParentId { pid: i32, value: String },
}

impl ScanError {
    /// True if this error means the process vanished between listing and
    /// detail read. Callers drop the process instead of failing the scan.
    pub fn is_transient_absence(&self) -> bool {
        matches!(
            self,
            ScanError::ProcessRead { source, .. } if source.kind() == io::ErrorKind::NotFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parent_id_names_the_pid() {
        let err = ScanError::InvalidParentId {
            pid: 4711,
            value: "garbage".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("4711"));
        assert!(msg.contains("garbage"));
    }

    #[test]
    fn test_transient_absence_detection() {
        let vanished = ScanError::ProcessRead {
            pid: 7,
            path: PathBuf::from("/proc/7/cmdline"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(vanished.is_transient_absence());

        let denied = ScanError::ProcessRead {
            pid: 7,
            path: PathBuf::from("/proc/7/status"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "nope"),
        };
        assert!(!denied.is_transient_absence());

        let root = ScanError::ProcRoot {
            path: PathBuf::from("/proc"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(!root.is_transient_absence());
    }
}
