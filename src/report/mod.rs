//! The per-unit directable report and its finalization.
//!
//! Field names on the wire (`sels`, `undirect_meths`, `meths`,
//! `isPropertyAccessor`) are what downstream build tooling reads, so they are
//! kept as-is rather than following Rust naming.

pub mod merge;

pub use merge::{merge_directory, MergeSummary, MergedReport};

use crate::analysis::ExclusionTracker;
use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One method that may be made direct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Qualified name, `-[Class sel]` or `-[Class(Category) sel]`
    pub name: String,
    pub sel: String,
    /// `file:line:column` of the declaration to annotate
    pub loc: String,
    #[serde(rename = "isPropertyAccessor", default)]
    pub is_property_accessor: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectableReport {
    /// Owner of the unit: the last implementation visited
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unit: String,
    /// Selectors blocked on every class
    #[serde(default)]
    pub sels: Vec<String>,
    /// Qualified names blocked individually
    #[serde(default)]
    pub undirect_meths: Vec<String>,
    #[serde(default)]
    pub meths: Vec<ReportEntry>,
}

impl DirectableReport {
    pub fn is_empty(&self) -> bool {
        self.sels.is_empty() && self.undirect_meths.is_empty() && self.meths.is_empty()
    }

    pub fn accessor_count(&self) -> usize {
        self.meths.iter().filter(|m| m.is_property_accessor).count()
    }

    /// Check that nothing is both directable and blocked.
    pub fn verify(&self) -> Result<()> {
        let sels: BTreeSet<&str> = self.sels.iter().map(String::as_str).collect();
        let names: BTreeSet<&str> = self.undirect_meths.iter().map(String::as_str).collect();
        for entry in &self.meths {
            if sels.contains(entry.sel.as_str()) {
                return Err(Error::Invariant(format!(
                    "{} is directable but selector '{}' is blocked",
                    entry.name, entry.sel
                )));
            }
            if names.contains(entry.name.as_str()) {
                return Err(Error::Invariant(format!(
                    "{} is both directable and name-blocked",
                    entry.name
                )));
            }
        }
        Ok(())
    }
}

/// Turns the tracker's final state into a [`DirectableReport`].
pub struct ReportBuilder {
    unit: String,
}

impl ReportBuilder {
    pub fn new(unit: impl Into<String>) -> Self {
        Self { unit: unit.into() }
    }

    pub fn finish(self, tracker: &ExclusionTracker) -> Result<DirectableReport> {
        let report = DirectableReport {
            unit: self.unit,
            sels: tracker
                .blocked_selectors()
                .map(|sel| sel.as_str().to_string())
                .collect(),
            undirect_meths: tracker.blocked_names().cloned().collect(),
            meths: tracker
                .entries()
                .map(|entry| ReportEntry {
                    name: entry.name.to_string(),
                    sel: entry.selector().as_str().to_string(),
                    loc: entry.location.to_string(),
                    is_property_accessor: entry.is_property_accessor,
                })
                .collect(),
        };
        report.verify()?;
        Ok(report)
    }
}
