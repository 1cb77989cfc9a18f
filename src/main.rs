use clap::Parser;

use link_atlas::cli::Cli;
use link_atlas::config::AtlasConfig;
use link_atlas::error::{AtlasError, Result};
use link_atlas::main_lib;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log to a file when LINK_ATLAS_LOG is set, otherwise only with --verbose
    if let Ok(log_file) = std::env::var("LINK_ATLAS_LOG") {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .map_err(|e| AtlasError::from(format!("Failed to open log file {}: {}", log_file, e)))?;
        env_logger::Builder::new()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else if cli.verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }

    log::info!("link-atlas starting up");

    let config = AtlasConfig::load(cli.config.as_deref())?;
    main_lib::run(cli.command, &config).await
}
