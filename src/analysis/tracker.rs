//! Selector-wide and name-specific exclusions plus the candidate buckets.
//!
//! Candidates are bucketed by selector. A selector block drops the whole
//! bucket; a name block drops one entry. Both kinds of block also reject
//! every later admission, so the order in which blocks and admissions arrive
//! during the pass does not change the outcome.

use crate::model::{QualifiedName, Selector, SourceLocation};
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// A method tentatively accepted for direct dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectableEntry {
    pub name: QualifiedName,
    pub location: SourceLocation,
    pub is_property_accessor: bool,
}

impl DirectableEntry {
    pub fn selector(&self) -> &Selector {
        &self.name.selector
    }
}

/// What happened to an admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    /// Another entry with the same qualified name is already in the bucket
    Duplicate,
    SelectorBlocked,
    NameBlocked,
}

#[derive(Debug, Default)]
pub struct ExclusionTracker {
    buckets: BTreeMap<Selector, Vec<DirectableEntry>>,
    blocked_selectors: BTreeSet<Selector>,
    blocked_names: BTreeSet<String>,
}

impl ExclusionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a candidate unless a block or an earlier entry of the same name rejects it.
    pub fn admit(&mut self, entry: DirectableEntry) -> Admission {
        if self.blocked_selectors.contains(entry.selector()) {
            return Admission::SelectorBlocked;
        }
        let rendered = entry.name.to_string();
        if self.blocked_names.contains(&rendered) {
            return Admission::NameBlocked;
        }

        let bucket = self.buckets.entry(entry.selector().clone()).or_default();
        if bucket.iter().any(|existing| existing.name == entry.name) {
            return Admission::Duplicate;
        }
        trace!(name = %rendered, "admitted");
        bucket.push(entry);
        Admission::Admitted
    }

    /// Block a selector everywhere, retracting anything already admitted under it.
    pub fn block_selector(&mut self, selector: Selector) {
        if let Some(evicted) = self.buckets.remove(&selector) {
            trace!(selector = %selector, evicted = evicted.len(), "selector bucket dropped");
        }
        self.blocked_selectors.insert(selector);
    }

    /// Block one qualified name, evicting a matching entry if present.
    pub fn block_name(&mut self, name: &QualifiedName) {
        let rendered = name.to_string();
        if let Some(bucket) = self.buckets.get_mut(&name.selector) {
            bucket.retain(|entry| entry.name != *name);
        }
        self.blocked_names.insert(rendered);
    }

    pub fn is_name_blocked(&self, name: &QualifiedName) -> bool {
        self.blocked_names.contains(&name.to_string())
    }

    pub fn blocked_selectors(&self) -> impl Iterator<Item = &Selector> {
        self.blocked_selectors.iter()
    }

    pub fn blocked_names(&self) -> impl Iterator<Item = &String> {
        self.blocked_names.iter()
    }

    /// Surviving entries, by selector and then in admission order.
    pub fn entries(&self) -> impl Iterator<Item = &DirectableEntry> {
        self.buckets.values().flatten()
    }

    pub fn entry_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MethodSignature;

    fn entry(class: &str, selector: &str, line: u32) -> DirectableEntry {
        DirectableEntry {
            name: QualifiedName::for_class(class, &MethodSignature::instance(selector)),
            location: SourceLocation::new("/src/X.h", line, 1),
            is_property_accessor: false,
        }
    }

    #[test]
    fn test_duplicate_admission_keeps_first() {
        let mut tracker = ExclusionTracker::new();
        assert_eq!(tracker.admit(entry("A", "run", 1)), Admission::Admitted);
        assert_eq!(tracker.admit(entry("A", "run", 9)), Admission::Duplicate);

        let entries: Vec<_> = tracker.entries().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].location.line, 1);
    }

    #[test]
    fn test_selector_block_evicts_and_rejects() {
        let mut tracker = ExclusionTracker::new();
        tracker.admit(entry("A", "foo:", 1));
        tracker.admit(entry("B", "foo:", 2));
        tracker.block_selector(Selector::new("foo:"));

        assert_eq!(tracker.entry_count(), 0);
        assert_eq!(tracker.admit(entry("C", "foo:", 3)), Admission::SelectorBlocked);
    }

    #[test]
    fn test_name_block_evicts_only_that_name() {
        let mut tracker = ExclusionTracker::new();
        tracker.admit(entry("A", "height", 1));
        tracker.admit(entry("B", "height", 2));
        let blocked = QualifiedName::for_class("A", &MethodSignature::instance("height"));
        tracker.block_name(&blocked);

        let names: Vec<String> = tracker.entries().map(|e| e.name.to_string()).collect();
        assert_eq!(names, vec!["-[B height]"]);
        assert_eq!(tracker.admit(entry("A", "height", 3)), Admission::NameBlocked);
    }
}
