// Library module containing testable functions from main.rs

use crate::async_task::load_snapshot;
use crate::command::Command;
use crate::config::AtlasConfig;
use crate::dump::PlatformDump;
use crate::error::{AtlasError, Result};
use crate::filter::matching_items;
use crate::navigator::NavigatorState;
use crate::open_all::{OpenAllReport, StdoutOpener, UrlOpener};
use crate::render::render_list;

/// Run the fetch pipeline against a dump file and wrap it in a navigator.
pub async fn load_navigator(dump_path: &str, config: &AtlasConfig) -> Result<NavigatorState> {
    let dump = PlatformDump::load_from_file(dump_path)?;
    let snapshot = load_snapshot(&dump.into_sources(), config).await;
    Ok(NavigatorState::new(snapshot))
}

pub async fn render(dump_path: &str, query: &str, json: bool, flat: bool, config: &AtlasConfig) -> Result<String> {
    let mut navigator = load_navigator(dump_path, config).await?;

    if flat && !query.is_empty() {
        let items = matching_items(&navigator.snapshot().forest, query);
        return Ok(render_list(&items, &config.display));
    }

    navigator.on_search_input(query);
    if json {
        Ok(serde_json::to_string_pretty(navigator.rows())?)
    } else {
        Ok(navigator.render_text(&config.display))
    }
}

/// Replay `command_str` and return the resulting view.
pub async fn execute_command(
    dump_path: &str,
    command_str: &str,
    json: bool,
    config: &AtlasConfig,
    opener: &mut dyn UrlOpener,
) -> Result<String> {
    let command = Command::from_string(command_str).map_err(AtlasError::InvalidCommand)?;
    let mut navigator = load_navigator(dump_path, config).await?;

    for event in command.into_events() {
        log::debug!("Executing {:?}", event);
        navigator.handle_event(event, opener)?;
    }

    if json {
        Ok(serde_json::to_string_pretty(&navigator.view_model())?)
    } else {
        Ok(navigator.render_text(&config.display))
    }
}

pub async fn open_all_at_row(
    dump_path: &str,
    row: usize,
    query: &str,
    config: &AtlasConfig,
    opener: &mut dyn UrlOpener,
) -> Result<OpenAllReport> {
    let mut navigator = load_navigator(dump_path, config).await?;
    navigator.on_search_input(query);
    navigator.on_open_all_click(row, opener)
}

pub async fn run(command: crate::cli::Commands, config: &AtlasConfig) -> Result<()> {
    use crate::cli::Commands;

    match command {
        Commands::Render { dump, query, json, flat } => {
            print!("{}", render(&dump, &query, json, flat, config).await?);
        }
        Commands::Execute { dump, command, json } => {
            let output = execute_command(&dump, &command, json, config, &mut StdoutOpener).await?;
            print!("{}", output);
        }
        Commands::OpenAll { dump, row, query } => {
            let report = open_all_at_row(&dump, row, &query, config, &mut StdoutOpener).await?;
            eprintln!("Opened {} links ({} failed)", report.issued - report.failed, report.failed);
        }
        Commands::Config => {
            println!("{}", config.to_json()?);
        }
    }
    Ok(())
}
