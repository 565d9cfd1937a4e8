use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command line arguments shared by every invocation
#[derive(Parser, Debug, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "Configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, help = "Enable quiet mode (minimal output)")]
    pub quiet: bool,
}

/// Subcommands; running without one performs the extraction
#[derive(Subcommand, Debug, Clone, Default)]
pub enum CommonCommands {
    /// Run the extraction (default behavior)
    #[default]
    Start,
    /// Show current configuration and exit
    Config {
        #[arg(long, help = "Show configuration in JSON format")]
        json: bool,
    },
    /// Validate configuration and exit
    Validate,
    /// Show version information and exit
    Version,
}

/// Utility functions for CLI operations
pub mod utils {
    use super::*;
    use crate::config::{Configuration, DEFAULT_CONFIG_FILE};
    use anyhow::{Context, Result};
    use std::path::Path;
    use tracing_subscriber::EnvFilter;

    /// Pick the diagnostic level from the CLI flags
    pub fn log_level(args: &CommonArgs) -> &'static str {
        if args.quiet {
            "warn"
        } else if args.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Initialize logging based on CLI arguments
    pub fn init_logging(args: &CommonArgs) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(log_level(args)));

        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    /// Load configuration with optional override from CLI
    pub fn load_config(config_path: Option<&PathBuf>) -> Result<Configuration> {
        match config_path {
            Some(path) => {
                require_file(path)?;
                log::info!("Loading configuration from: {}", path.display());
                Configuration::load_from_path(path).context("Failed to load configuration")
            }
            None => {
                require_file(Path::new(DEFAULT_CONFIG_FILE))?;
                Configuration::load().context("Failed to load configuration")
            }
        }
    }

    fn require_file(path: &Path) -> Result<()> {
        if !path.is_file() {
            anyhow::bail!("Configuration file not found: {}", path.display());
        }
        Ok(())
    }

    /// Display configuration in human-readable or JSON format
    pub fn display_config(config: &Configuration, json: bool) -> Result<()> {
        if json {
            let json = serde_json::to_string_pretty(config)
                .context("Failed to serialize configuration to JSON")?;
            println!("{json}");
        } else {
            println!("TAP-IN Extract Configuration:");
            println!("=============================");
            println!("Input directory: {}", config.paths.input_directory.display());
            println!("Reference file: {}", config.paths.reference_file.display());
            println!(
                "Output directory: {}",
                config.paths.output_directory.display()
            );
            println!("Log directory: {}", config.paths.log_directory.display());
            println!("Isolate failures: {}", config.filter.isolate_failures);
        }
        Ok(())
    }

    /// Validate configuration and report any issues
    pub fn validate_config(config: &Configuration) -> Result<()> {
        log::info!("Validating configuration...");

        let paths = &config.paths;
        if !paths.input_directory.is_dir() {
            anyhow::bail!(
                "Input directory does not exist: {}",
                paths.input_directory.display()
            );
        }

        if !paths.reference_file.is_file() {
            anyhow::bail!(
                "Reference file does not exist: {}",
                paths.reference_file.display()
            );
        }

        if paths.output_directory.as_os_str().is_empty() {
            anyhow::bail!("Output directory cannot be empty");
        }

        if paths.log_directory.as_os_str().is_empty() {
            anyhow::bail!("Log directory cannot be empty");
        }

        log::info!("Configuration validation passed");
        Ok(())
    }

    /// Handle commands that don't perform an extraction run
    pub fn handle_common_command(command: &CommonCommands, config: &Configuration) -> Result<bool> {
        match command {
            CommonCommands::Config { json } => {
                display_config(config, *json)?;
                Ok(true)
            }
            CommonCommands::Validate => {
                validate_config(config)?;
                Ok(true)
            }
            CommonCommands::Version => {
                println!("{}", version_info());
                Ok(true)
            }
            CommonCommands::Start => Ok(false),
        }
    }

    /// Standard version information
    pub fn version_info() -> String {
        format!(
            "{} {} ({})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_RUST_VERSION")
        )
    }
}
