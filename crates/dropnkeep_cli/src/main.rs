//! DropNKeep command line tool.
//!
//! # Responsibility
//! - Decode and preview dropped files without a browser.
//! - Inspect and edit the persisted import settings.

mod cli;
mod commands;
mod local_file;

use clap::Parser;
use cli::{Cli, Command, SettingsAction};
use dropnkeep_core::{default_log_level, init_logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("dropnkeep: {err}");
            return ExitCode::FAILURE;
        }
    }

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("dropnkeep: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, String> {
    let db_path = commands::resolve_db_path(cli.db.as_deref());
    match cli.command {
        Command::Decode { path } => println!("{}", commands::decode(&path)?),
        Command::Preview { paths } => {
            let report = commands::preview_with_stored_settings(&db_path, &paths)?;
            if let Some(json) = report.request_json {
                println!("{json}");
            }
            eprintln!("{}", report.notice);
            if !report.accepted {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Settings { action } => match action {
            SettingsAction::Show => println!("{}", commands::show_settings(&db_path)?),
            SettingsAction::SetTitle { enabled } => {
                commands::update_settings(&db_path, |settings| {
                    settings.use_filename_as_title = enabled;
                })?;
            }
            SettingsAction::SetMaxSize { megabytes } => {
                commands::update_settings(&db_path, |settings| {
                    settings.max_file_size_mb = megabytes;
                })?;
            }
            SettingsAction::Seed => {
                let seeded = commands::seed_settings(&db_path)?;
                println!(
                    "{}",
                    serde_json::to_string_pretty(&seeded).map_err(|err| err.to_string())?
                );
            }
        },
        Command::Version => println!("{}", commands::version()),
    }
    Ok(ExitCode::SUCCESS)
}
