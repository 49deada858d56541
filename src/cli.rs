use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "directable")]
#[command(
    about = "Finds Objective-C methods that can safely be made objc_direct",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify the methods of one or more compilation units
    Analyze {
        /// Unit source files (.json, .yaml or .yml)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout); only valid with a single input
        #[arg(short, long, conflicts_with = "output_dir")]
        output: Option<PathBuf>,

        /// Write one `<unit><hash>.json` report per input into this directory
        #[arg(long = "output-dir")]
        output_dir: Option<PathBuf>,

        /// Configuration file (defaults to discovering .directable.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Plain output without colors
        #[arg(long)]
        plain: bool,

        /// Increase log verbosity (-v info, -vv debug, -vvv trace)
        #[arg(short, long, action = ArgAction::Count)]
        verbose: u8,
    },

    /// Merge a directory of per-unit reports into one map keyed by location
    Merge {
        /// Directory holding the per-unit reports
        #[arg(short, long)]
        input: PathBuf,

        /// Merged output file
        #[arg(short, long)]
        output: PathBuf,

        /// Increase log verbosity
        #[arg(short, long, action = ArgAction::Count)]
        verbose: u8,
    },

    /// Write a default .directable.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl From<OutputFormat> for crate::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => crate::output::OutputFormat::Json,
            OutputFormat::Markdown => crate::output::OutputFormat::Markdown,
            OutputFormat::Terminal => crate::output::OutputFormat::Terminal,
        }
    }
}
