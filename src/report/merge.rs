//! Merging per-unit reports into one project-wide map.
//!
//! A method that is directable in one unit may be blocked by a dynamic call
//! site in another, so blocks are unioned across every report before any
//! entry survives.

use super::{DirectableReport, ReportEntry};
use crate::core::{Error, Result, ResultExt};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Surviving entries keyed by declaration location.
pub type MergedReport = BTreeMap<String, ReportEntry>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub files: usize,
    pub entries: usize,
    pub blocked_selectors: usize,
    pub blocked_names: usize,
}

/// The `*.json` files directly inside `dir`, in path order.
pub fn report_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::file_system("no input directory to merge", dir));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| Error::io_at(dir, e.into()))?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

pub fn read_report(path: &Path) -> Result<DirectableReport> {
    let contents = fs::read_to_string(path).map_err(|e| Error::io_at(path, e))?;
    serde_json::from_str(&contents)
        .map_err(Error::from)
        .context(format!("parsing report {}", path.display()))
}

/// Merge reports, dropping every entry blocked in any of them.
///
/// Later reports overwrite earlier ones at the same location.
pub fn merge_reports<'a>(reports: impl IntoIterator<Item = &'a DirectableReport>) -> MergedReport {
    let reports: Vec<&DirectableReport> = reports.into_iter().collect();
    let sels: BTreeSet<&str> = reports
        .iter()
        .flat_map(|r| r.sels.iter().map(String::as_str))
        .collect();
    let names: BTreeSet<&str> = reports
        .iter()
        .flat_map(|r| r.undirect_meths.iter().map(String::as_str))
        .collect();

    reports
        .iter()
        .flat_map(|r| r.meths.iter())
        .filter(|m| !sels.contains(m.sel.as_str()) && !names.contains(m.name.as_str()))
        .map(|m| (m.loc.clone(), m.clone()))
        .collect()
}

pub fn merge_directory(dir: &Path) -> Result<(MergedReport, MergeSummary)> {
    let files = report_files(dir)?;
    let reports = files
        .iter()
        .map(|path| {
            debug!(path = %path.display(), "reading report");
            read_report(path)
        })
        .collect::<Result<Vec<_>>>()?;

    let merged = merge_reports(&reports);
    let summary = MergeSummary {
        files: files.len(),
        entries: merged.len(),
        blocked_selectors: reports
            .iter()
            .flat_map(|r| &r.sels)
            .collect::<BTreeSet<_>>()
            .len(),
        blocked_names: reports
            .iter()
            .flat_map(|r| &r.undirect_meths)
            .collect::<BTreeSet<_>>()
            .len(),
    };
    info!(
        files = summary.files,
        entries = summary.entries,
        "merged reports"
    );
    Ok((merged, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(name: &str, sel: &str, loc: &str) -> ReportEntry {
        ReportEntry {
            name: name.into(),
            sel: sel.into(),
            loc: loc.into(),
            is_property_accessor: false,
        }
    }

    #[test]
    fn test_block_in_one_unit_drops_entry_from_another() {
        let a = DirectableReport {
            meths: vec![entry("-[A foo:]", "foo:", "A.h:1:1"), entry("-[A run]", "run", "A.h:2:1")],
            ..Default::default()
        };
        let b = DirectableReport {
            sels: vec!["foo:".into()],
            ..Default::default()
        };
        let merged = merge_reports([&a, &b]);
        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["A.h:2:1"]);
    }

    #[test]
    fn test_later_entry_wins_at_same_location() {
        let a = DirectableReport {
            meths: vec![entry("-[A title]", "title", "A.h:4:1")],
            ..Default::default()
        };
        let mut later = entry("-[A title]", "title", "A.h:4:1");
        later.is_property_accessor = true;
        let b = DirectableReport {
            meths: vec![later],
            ..Default::default()
        };
        let merged = merge_reports([&a, &b]);
        assert!(merged["A.h:4:1"].is_property_accessor);
    }

    #[test]
    fn test_merge_directory_skips_other_files() {
        let dir = TempDir::new().unwrap();
        let report = DirectableReport {
            unit: "A".into(),
            meths: vec![entry("-[A run]", "run", "A.h:2:1")],
            ..Default::default()
        };
        fs::write(
            dir.path().join("A1234.json"),
            serde_json::to_string(&report).unwrap(),
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "not a report").unwrap();

        let (merged, summary) = merge_directory(dir.path()).unwrap();
        assert_eq!(summary.files, 1);
        assert_eq!(summary.entries, 1);
        assert!(merged.contains_key("A.h:2:1"));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            merge_directory(&missing),
            Err(Error::FileSystem { .. })
        ));
    }
}
