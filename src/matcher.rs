//! Match engine: pattern predicate plus the memoized per-scan annotation.
//!
//! The matching policy is resolved once into a single predicate closure; the
//! traversal never re-inspects configuration. The annotation is a short-lived
//! side table keyed by pid — it lives for exactly one render pass and is
//! never reused, because pids are not stable across time.

use crate::config::{Config, MatchMode};
use crate::process::ProcessRecord;
use std::cell::Cell;
use std::collections::HashMap;
use tracing::trace;

/// A resolved, pure match predicate over process records.
pub struct Matcher {
    predicate: Box<dyn Fn(&ProcessRecord) -> bool>,
}

impl Matcher {
    /// Resolves a pattern and policy into a predicate.
    pub fn new(pattern: &str, mode: MatchMode) -> Self {
        let pattern = pattern.to_string();

        let predicate: Box<dyn Fn(&ProcessRecord) -> bool> = match mode {
            MatchMode::Token => Box::new(move |p: &ProcessRecord| {
                p.id.to_string().contains(&pattern)
                    || p.name.contains(&pattern)
                    || p.args.iter().any(|a| a.contains(&pattern))
            }),
            MatchMode::FullLine => {
                Box::new(move |p: &ProcessRecord| p.render_cmdline().contains(&pattern))
            }
        };

        Self { predicate }
    }

    /// Builds the matcher from the resolved configuration.
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(&cfg.pattern, cfg.match_mode)
    }

    /// Wraps an arbitrary predicate. Used by tests that count evaluations.
    pub fn from_fn(predicate: impl Fn(&ProcessRecord) -> bool + 'static) -> Self {
        Self {
            predicate: Box::new(predicate),
        }
    }

    /// True if the record matches the pattern directly.
    pub fn matches(&self, record: &ProcessRecord) -> bool {
        (self.predicate)(record)
    }
}

/// Per-scan match annotation keyed by pid.
///
/// Both memo tables are populated exactly once per node by [`build`], so the
/// predicate runs O(n) times for a forest of n nodes no matter how many
/// times the renderer queries a node. Every query against a populated entry
/// is counted as a cache hit for tracing.
///
/// [`build`]: MatchAnnotation::build
#[derive(Debug, Default)]
pub struct MatchAnnotation {
    direct: HashMap<i32, bool>,
    descendant: HashMap<i32, bool>,
    cache_hits: Cell<u64>,
}

impl MatchAnnotation {
    /// Annotates every node of the forest in one post-order pass.
    pub fn build(forest: &[ProcessRecord], matcher: &Matcher) -> Self {
        let mut annotation = Self::default();
        for root in forest {
            annotation.annotate(root, matcher);
        }
        annotation
    }

    fn annotate(&mut self, record: &ProcessRecord, matcher: &Matcher) {
        let mut by_descendant = false;

        for child in &record.children {
            self.annotate(child, matcher);
            // Children are memoized at this point; the boolean short-circuits
            // on the first matching child.
            if !by_descendant {
                by_descendant =
                    self.matched_directly(child.id) || self.matched_by_descendant(child.id);
            }
        }

        let direct = matcher.matches(record);

        trace!(
            pid = record.id,
            matched = direct,
            cmdline = %record.render_cmdline(),
            "direct match decision"
        );
        trace!(
            pid = record.id,
            matched = by_descendant,
            "descendant match decision"
        );

        self.direct.insert(record.id, direct);
        self.descendant.insert(record.id, by_descendant);
    }

    /// True if the node matched the pattern itself. Unknown pids never match.
    pub fn matched_directly(&self, pid: i32) -> bool {
        match self.direct.get(&pid) {
            Some(&matched) => {
                self.cache_hits.set(self.cache_hits.get() + 1);
                matched
            }
            None => false,
        }
    }

    /// True if some node strictly below this one matched directly.
    pub fn matched_by_descendant(&self, pid: i32) -> bool {
        match self.descendant.get(&pid) {
            Some(&matched) => {
                self.cache_hits.set(self.cache_hits.get() + 1);
                matched
            }
            None => false,
        }
    }

    /// True if the node belongs in the rendered output on its own account
    /// (directly matched or an ancestor of a match). Force-match inheritance
    /// from matching ancestors is the renderer's part.
    pub fn included(&self, pid: i32) -> bool {
        self.matched_directly(pid) || self.matched_by_descendant(pid)
    }

    /// Number of memo-table hits served so far.
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.get()
    }

    /// Number of annotated nodes.
    pub fn len(&self) -> usize {
        self.direct.len()
    }

    pub fn is_empty(&self) -> bool {
        self.direct.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn record(id: i32, name: &str, args: &[&str]) -> ProcessRecord {
        ProcessRecord {
            id,
            name: name.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }

    fn with_children(mut record: ProcessRecord, children: Vec<ProcessRecord>) -> ProcessRecord {
        record.children = children;
        record
    }

    // -------------------------------------------------------------------------
    // Tests for the match predicate
    // -------------------------------------------------------------------------

    #[test]
    fn test_token_mode_matches_name_substring() {
        let m = Matcher::new("ssh", MatchMode::Token);
        assert!(m.matches(&record(42, "sshd", &["-D"])));
    }

    #[test]
    fn test_token_mode_matches_pid_rendering() {
        let m = Matcher::new("42", MatchMode::Token);
        assert!(m.matches(&record(42, "sshd", &["-D"])));

        let m = Matcher::new("41", MatchMode::Token);
        assert!(!m.matches(&record(42, "sshd", &["-D"])));
    }

    #[test]
    fn test_token_mode_matches_argument_token() {
        let m = Matcher::new("-D", MatchMode::Token);
        assert!(m.matches(&record(42, "sshd", &["-D"])));
    }

    #[test]
    fn test_token_mode_does_not_match_across_tokens() {
        // "sshd -D" spans the name/arg boundary; token mode sees tokens only.
        let m = Matcher::new("sshd -D", MatchMode::Token);
        assert!(!m.matches(&record(42, "sshd", &["-D"])));
    }

    #[test]
    fn test_full_line_mode_matches_rendered_cmdline() {
        let m = Matcher::new("sshd -D", MatchMode::FullLine);
        assert!(m.matches(&record(42, "sshd", &["-D"])));
    }

    #[test]
    fn test_full_line_mode_whitespace_arg_json_rendering() {
        let p = record(1, "proc", &["hello world"]);
        assert_eq!(p.render_cmdline(), r#"["proc","hello world"]"#);

        let full = Matcher::new("hello world", MatchMode::FullLine);
        assert!(full.matches(&p));

        // The JSON quoting is visible to full-line matching.
        let quoted = Matcher::new(r#""proc""#, MatchMode::FullLine);
        assert!(quoted.matches(&p));
    }

    // -------------------------------------------------------------------------
    // Tests for the annotation
    // -------------------------------------------------------------------------

    #[test]
    fn test_descendant_match_propagates_to_all_ancestors() {
        let forest = vec![with_children(
            record(1, "init", &[]),
            vec![with_children(
                record(10, "shell", &[]),
                vec![record(100, "sshd", &["-D"])],
            )],
        )];

        let ann = MatchAnnotation::build(&forest, &Matcher::new("ssh", MatchMode::Token));

        assert!(!ann.matched_directly(1));
        assert!(ann.matched_by_descendant(1));
        assert!(!ann.matched_directly(10));
        assert!(ann.matched_by_descendant(10));
        assert!(ann.matched_directly(100));
        assert!(!ann.matched_by_descendant(100));
    }

    #[test]
    fn test_no_match_anywhere() {
        let forest = vec![with_children(
            record(1, "init", &[]),
            vec![record(10, "shell", &[])],
        )];

        let ann = MatchAnnotation::build(&forest, &Matcher::new("zzz", MatchMode::Token));

        assert!(!ann.included(1));
        assert!(!ann.included(10));
    }

    #[test]
    fn test_unknown_pid_never_matches() {
        let ann = MatchAnnotation::build(&[], &Matcher::new("x", MatchMode::Token));
        assert!(!ann.matched_directly(12345));
        assert!(!ann.matched_by_descendant(12345));
    }

    #[test]
    fn test_direct_match_evaluation_count_equals_node_count() {
        // Deep chain plus a wide fan-out; each ancestor of the chain would
        // re-issue descendant queries without the memo.
        let mut chain = record(100, "leaf-match", &[]);
        for id in (1..100).rev() {
            chain = with_children(record(id, "link", &[]), vec![chain]);
        }
        let wide = with_children(
            record(200, "parent", &[]),
            (201..=260).map(|id| record(id, "kid", &[])).collect(),
        );
        let forest = vec![chain, wide];

        let evaluations = Rc::new(RefCell::new(0usize));
        let counter = Rc::clone(&evaluations);
        let matcher = Matcher::from_fn(move |p| {
            *counter.borrow_mut() += 1;
            p.name.contains("match")
        });

        let ann = MatchAnnotation::build(&forest, &matcher);
        assert_eq!(*evaluations.borrow(), 161);
        assert_eq!(ann.len(), 161);

        // Re-querying from many paths hits the memo, not the predicate.
        for _ in 0..10 {
            assert!(ann.matched_by_descendant(1));
            assert!(ann.matched_directly(100));
        }
        assert_eq!(*evaluations.borrow(), 161);
        assert!(ann.cache_hits() > 0);
    }
}
