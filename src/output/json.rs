use crate::report::{DirectableReport, MergedReport};
use anyhow::Result;

pub fn report_to_json(report: &DirectableReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// The merged map, keyed by declaration location.
pub fn merged_to_json(merged: &MergedReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(merged)?)
}
