use crate::analysis::analyze_path;
use crate::config::{resolve_config, DirectableConfig};
use crate::core::Error;
use crate::formatting::FormattingConfig;
use crate::observability::{increment_processed, set_phase, set_progress, AnalysisPhase};
use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    pub inputs: Vec<PathBuf>,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub plain: bool,
}

/// Where each unit's report goes.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Destination {
    Directory(PathBuf),
    Stream {
        format: OutputFormat,
        file: Option<PathBuf>,
    },
}

fn destination(options: &AnalyzeOptions, config: &DirectableConfig) -> Result<Destination> {
    if options.output.is_some() && options.inputs.len() > 1 {
        return Err(Error::Configuration(
            "--output takes a single input; use --output-dir for several".to_string(),
        )
        .into());
    }
    // An explicit output file beats a configured directory.
    if let Some(dir) = options.output_dir.clone().or_else(|| {
        options
            .output
            .is_none()
            .then(|| config.output_directory().cloned())
            .flatten()
    }) {
        return Ok(Destination::Directory(dir));
    }
    let format = options
        .format
        .or_else(|| config.default_format())
        .unwrap_or(OutputFormat::Terminal);
    Ok(Destination::Stream {
        format,
        file: options.output.clone(),
    })
}

pub fn handle_analyze(options: AnalyzeOptions) -> Result<()> {
    let config = resolve_config(options.config.as_deref())?;
    let destination = destination(&options, &config)?;
    let formatting = if options.plain {
        FormattingConfig::plain()
    } else {
        FormattingConfig::from_env()
    };

    set_progress(0, options.inputs.len());
    for input in &options.inputs {
        let report = analyze_path(input, &config.analysis)
            .with_context(|| format!("analyzing {}", input.display()))?;
        increment_processed();

        let _phase = set_phase(AnalysisPhase::OutputGeneration);
        match &destination {
            Destination::Directory(dir) => {
                let path = output::write_report_to_dir(dir, &report)?;
                info!(unit = %report.unit, path = %path.display(), "report written");
            }
            Destination::Stream { format, file } => {
                let content = output::render(&report, *format, formatting)?;
                output::emit(&content, file.as_deref())?;
            }
        }
    }
    Ok(())
}
