//! Rendering of matched branches as indented text lines.
//!
//! The walk carries the current depth and a force flag: once a node is
//! directly matched, the whole subtree below it prints unconditionally so a
//! match never appears without its lineage context.

use crate::config::Config;
use crate::matcher::MatchAnnotation;
use crate::process::ProcessRecord;
use std::io::{self, Write};

const INDENT: &str = "  ";

/// Renders every matched branch of the forest to `out`.
///
/// Children are visited in stored (assembler insertion) order; no sorting is
/// performed.
pub fn render_forest(
    out: &mut impl Write,
    forest: &[ProcessRecord],
    annotation: &MatchAnnotation,
    cfg: &Config,
) -> io::Result<()> {
    for root in forest {
        render_process(out, root, annotation, cfg, 0, false)?;
    }
    Ok(())
}

fn render_process(
    out: &mut impl Write,
    record: &ProcessRecord,
    annotation: &MatchAnnotation,
    cfg: &Config,
    depth: usize,
    force: bool,
) -> io::Result<()> {
    let force = force || annotation.matched_directly(record.id);

    if !force && !annotation.matched_by_descendant(record.id) {
        return Ok(());
    }

    let indent = INDENT.repeat(depth);

    writeln!(out, "{indent}{}", record.format_line(cfg))?;

    if cfg.show_threads {
        for thread in &record.threads {
            writeln!(out, " {indent}{}", thread.format_line())?;
        }
    }

    for child in &record.children {
        render_process(out, child, annotation, cfg, depth + 1, force)?;
    }

    Ok(())
}
