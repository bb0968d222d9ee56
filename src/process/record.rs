//! Process and thread record types and their line renderings.
//!
//! One `ProcessRecord` is produced per live process observed during the
//! scan. Records are immutable after collection except for the `children`
//! list, which the tree assembler populates exactly once.

use crate::config::Config;

/// One process observed in the snapshot.
#[derive(Debug, Clone, Default)]
pub struct ProcessRecord {
    /// Process id, unique within the snapshot.
    pub id: i32,
    /// Parent process id; `< 1` means no known parent (forest root).
    pub parent_id: i32,
    /// First command-line token, or `*<statusName>*` for processes without
    /// a command line (kernel threads).
    pub name: String,
    /// Remaining command-line tokens.
    pub args: Vec<String>,
    /// Working directory; only populated when requested. On resolution
    /// failure this holds `!<error>` instead of aborting the record.
    pub workdir: Option<String>,
    /// Threads; only populated when requested.
    pub threads: Vec<ThreadRecord>,
    /// Child processes, attached by the tree assembler.
    pub children: Vec<ProcessRecord>,
}

/// One thread of a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadRecord {
    pub id: i32,
    pub name: String,
}

impl ProcessRecord {
    /// Renders the command line as one string.
    ///
    /// Tokens are space-joined unless any of them is empty or contains
    /// whitespace, in which case the whole command line is rendered as a
    /// JSON array so token boundaries stay unambiguous.
    pub fn render_cmdline(&self) -> String {
        if self.args.is_empty() {
            return self.name.clone();
        }

        let ambiguous = std::iter::once(self.name.as_str())
            .chain(self.args.iter().map(String::as_str))
            .any(|t| t.is_empty() || t.contains(' ') || t.contains('\t'));

        if !ambiguous {
            let mut line = self.name.clone();
            for arg in &self.args {
                line.push(' ');
                line.push_str(arg);
            }
            return line;
        }

        let mut tokens: Vec<&str> = Vec::with_capacity(self.args.len() + 1);
        tokens.push(&self.name);
        tokens.extend(self.args.iter().map(String::as_str));

        // Serializing a Vec<&str> cannot fail.
        serde_json::to_string(&tokens).unwrap_or_default()
    }

    /// Formats the full output line for this process (without indentation),
    /// applying the configured truncation.
    pub fn format_line(&self, cfg: &Config) -> String {
        let mut line = format!("[{}]", self.id);

        if cfg.show_workdir {
            line.push('(');
            line.push_str(self.workdir.as_deref().unwrap_or(""));
            line.push(')');
        }

        line.push_str(&self.render_cmdline());

        truncate_chars(line, cfg.truncate)
    }
}

impl ThreadRecord {
    /// Formats the output line for this thread (without indentation).
    pub fn format_line(&self) -> String {
        format!("[{}]{{{}}}", self.id, self.name)
    }
}

/// Truncates to at most `max` characters; `max == 0` disables truncation.
/// Counts characters rather than bytes so multi-byte names never split a
/// code point.
fn truncate_chars(line: String, max: usize) -> String {
    if max == 0 {
        return line;
    }
    match line.char_indices().nth(max) {
        Some((idx, _)) => line[..idx].to_string(),
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i32, name: &str, args: &[&str]) -> ProcessRecord {
        ProcessRecord {
            id,
            name: name.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }

    // -------------------------------------------------------------------------
    // Tests for render_cmdline
    // -------------------------------------------------------------------------

    #[test]
    fn test_render_cmdline_name_only() {
        assert_eq!(record(1, "init", &[]).render_cmdline(), "init");
    }

    #[test]
    fn test_render_cmdline_space_joined() {
        let p = record(42, "sshd", &["-D", "-e"]);
        assert_eq!(p.render_cmdline(), "sshd -D -e");
    }

    #[test]
    fn test_render_cmdline_whitespace_arg_uses_json() {
        let p = record(1, "proc", &["hello world"]);
        assert_eq!(p.render_cmdline(), r#"["proc","hello world"]"#);
    }

    #[test]
    fn test_render_cmdline_empty_arg_uses_json() {
        let p = record(1, "cat", &[""]);
        assert_eq!(p.render_cmdline(), r#"["cat",""]"#);
    }

    #[test]
    fn test_render_cmdline_placeholder_name() {
        let p = record(2, "*kthreadd*", &[]);
        assert_eq!(p.render_cmdline(), "*kthreadd*");
    }

    // -------------------------------------------------------------------------
    // Tests for format_line
    // -------------------------------------------------------------------------

    #[test]
    fn test_format_line_basic() {
        let p = record(42, "sshd", &["-D"]);
        assert_eq!(p.format_line(&Config::default()), "[42]sshd -D");
    }

    #[test]
    fn test_format_line_truncates_to_character_count() {
        let p = record(42, "sshd", &["-D"]);
        let cfg = Config {
            truncate: 5,
            ..Default::default()
        };
        assert_eq!(p.format_line(&cfg), "[42]s");
    }

    #[test]
    fn test_format_line_truncate_zero_is_unlimited() {
        let p = record(42, "sshd", &["-D"]);
        let cfg = Config {
            truncate: 0,
            ..Default::default()
        };
        assert_eq!(p.format_line(&cfg), "[42]sshd -D");
    }

    #[test]
    fn test_format_line_truncate_respects_char_boundaries() {
        let p = record(7, "bläddra", &[]);
        let cfg = Config {
            truncate: 6,
            ..Default::default()
        };
        // "[7]blä" is 6 characters but 7 bytes.
        assert_eq!(p.format_line(&cfg), "[7]blä");
    }

    #[test]
    fn test_format_line_with_workdir() {
        let mut p = record(10, "bash", &[]);
        p.workdir = Some("/home/op".to_string());
        let cfg = Config {
            show_workdir: true,
            ..Default::default()
        };
        assert_eq!(p.format_line(&cfg), "[10](/home/op)bash");
    }

    #[test]
    fn test_format_line_workdir_hidden_without_flag() {
        let mut p = record(10, "bash", &[]);
        p.workdir = Some("/home/op".to_string());
        assert_eq!(p.format_line(&Config::default()), "[10]bash");
    }

    #[test]
    fn test_thread_format_line() {
        let t = ThreadRecord {
            id: 1234,
            name: "tokio-runtime-w".to_string(),
        };
        assert_eq!(t.format_line(), "[1234]{tokio-runtime-w}");
    }
}
