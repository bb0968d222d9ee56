//! Tree assembly: flat process records into a parent-linked forest.
//!
//! The parent id is an untrusted foreign key into a live, mutating process
//! table, so it is validated defensively: a record whose parent is unknown
//! is promoted to a forest root rather than dropped or assumed consistent.

use crate::process::ProcessRecord;
use std::collections::{HashMap, HashSet};

/// Assembles flat records into a forest of root processes.
///
/// A record becomes a root if its parent id is `< 1`, refers to itself, or
/// refers to a process absent from the record set. Everything else is
/// appended to its parent's children in the order the repository enumerated
/// it; sibling order is therefore filesystem-dependent and not stable
/// across runs.
pub fn assemble(records: Vec<ProcessRecord>) -> Vec<ProcessRecord> {
    let known: HashSet<i32> = records.iter().map(|r| r.id).collect();

    let mut pending: HashMap<i32, Vec<ProcessRecord>> = HashMap::new();
    let mut roots = Vec::new();

    for record in records {
        if record.parent_id < 1
            || record.parent_id == record.id
            || !known.contains(&record.parent_id)
        {
            roots.push(record);
        } else {
            pending.entry(record.parent_id).or_default().push(record);
        }
    }

    for root in &mut roots {
        attach_children(root, &mut pending);
    }

    // A parent-id cycle in a corrupt snapshot would leave records
    // unreachable from every root. Promote them instead of dropping them.
    while let Some(parent_id) = pending.keys().next().copied() {
        if let Some(bucket) = pending.remove(&parent_id) {
            for mut record in bucket {
                attach_children(&mut record, &mut pending);
                roots.push(record);
            }
        }
    }

    roots
}

/// Moves every pending record whose parent id equals `node.id` into
/// `node.children`, recursively. Each record is attached exactly once, so
/// the result has no cross-links.
fn attach_children(node: &mut ProcessRecord, pending: &mut HashMap<i32, Vec<ProcessRecord>>) {
    if let Some(mut children) = pending.remove(&node.id) {
        for child in &mut children {
            attach_children(child, pending);
        }
        node.children = children;
    }
}
