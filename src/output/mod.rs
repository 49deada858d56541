pub mod json;
pub mod markdown;
pub mod terminal;

use crate::formatting::FormattingConfig;
use crate::io;
use crate::report::DirectableReport;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use xxhash_rust::xxh64::xxh64;

pub use json::{merged_to_json, report_to_json};
pub use markdown::render_markdown;
pub use terminal::render_terminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

pub fn render(
    report: &DirectableReport,
    format: OutputFormat,
    formatting: FormattingConfig,
) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => report_to_json(report)?,
        OutputFormat::Markdown => render_markdown(report),
        OutputFormat::Terminal => render_terminal(report, formatting),
    })
}

/// Write to a file, or to stdout when no path is given.
pub fn emit(content: &str, output_file: Option<&Path>) -> Result<()> {
    match output_file {
        Some(path) => io::write_file(path, content),
        None => {
            println!("{content}");
            Ok(())
        }
    }
}

/// `<unit><hash>.json`, with the hash taken over the serialized content.
///
/// Units that share an owner name still land in distinct files unless
/// their reports are identical.
pub fn report_file_name(report: &DirectableReport, content: &str) -> String {
    format!("{}{:016x}.json", report.unit, xxh64(content.as_bytes(), 0))
}

/// Persist one unit's report into a directory of per-unit reports.
pub fn write_report_to_dir(dir: &Path, report: &DirectableReport) -> Result<PathBuf> {
    let content = report_to_json(report)?;
    let path = dir.join(report_file_name(report, &content));
    io::write_file(&path, &content)?;
    Ok(path)
}
