use anyhow::Result;
use clap::Parser;
use directable::cli::{Cli, Commands};
use directable::commands::{self, AnalyzeOptions};
use directable::observability::{init_tracing, install_panic_hook};

fn main() -> Result<()> {
    install_panic_hook();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            inputs,
            format,
            output,
            output_dir,
            config,
            plain,
            verbose,
        } => {
            init_tracing(verbose);
            commands::handle_analyze(AnalyzeOptions {
                inputs,
                format: format.map(Into::into),
                output,
                output_dir,
                config,
                plain,
            })
        }
        Commands::Merge {
            input,
            output,
            verbose,
        } => {
            init_tracing(verbose);
            commands::handle_merge(&input, &output).map(|_| ())
        }
        Commands::Init { force } => {
            init_tracing(0);
            commands::init_config(force)
        }
    }
}
