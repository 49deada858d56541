use crate::io;
use crate::observability::{set_phase, AnalysisPhase};
use crate::output::merged_to_json;
use crate::report::{merge_directory, MergeSummary};
use anyhow::{Context, Result};
use std::path::Path;

pub fn handle_merge(input: &Path, output: &Path) -> Result<MergeSummary> {
    let _phase = set_phase(AnalysisPhase::Merging);
    let (merged, summary) = merge_directory(input)
        .with_context(|| format!("merging reports in {}", input.display()))?;
    io::write_file(output, &merged_to_json(&merged)?)?;
    println!(
        "Merged {} directable methods from {} reports into {}",
        summary.entries,
        summary.files,
        output.display()
    );
    Ok(summary)
}
