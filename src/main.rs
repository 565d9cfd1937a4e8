use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::cli::{CommonArgs, CommonCommands, utils};
use extractor::Extractor;

#[derive(Parser)]
#[command(name = "tapin-extract")]
#[command(about = "Filter TAP-IN call-record archives by subscriber MSISDN")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Option<ExtractCommands>,
}

#[derive(Subcommand)]
enum ExtractCommands {
    #[command(flatten)]
    Common(CommonCommands),
}

impl Default for ExtractCommands {
    fn default() -> Self {
        Self::Common(CommonCommands::Start)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on CLI arguments
    utils::init_logging(&cli.common);

    let config = utils::load_config(cli.common.config.as_ref())?;

    let command = cli.command.unwrap_or_default();
    let ExtractCommands::Common(ref common_cmd) = command;
    if utils::handle_common_command(common_cmd, &config)? {
        return Ok(());
    }

    utils::validate_config(&config)?;

    let summary = Extractor::new(config)
        .run()
        .context("Extraction run failed")?;

    log::info!(
        "Run finished: {} files, {} processed, {} without matches, {} skipped, {} failed, {} rows kept",
        summary.files_seen,
        summary.processed,
        summary.no_match,
        summary.skipped,
        summary.failed,
        summary.rows_matched
    );
    log::info!("Run log written to {}", summary.log_path.display());

    if summary.failed > 0 {
        anyhow::bail!(
            "{} file(s) failed, see {}",
            summary.failed,
            summary.log_path.display()
        );
    }

    println!("Processing complete!");
    Ok(())
}
