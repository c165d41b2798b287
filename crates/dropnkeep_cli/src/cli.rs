//! Command line surface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dropnkeep")]
#[command(about = "Decode dropped text files and manage DropNKeep settings")]
#[command(version)]
pub struct Cli {
    /// Settings database path (default: `DROPNKEEP_DB_PATH`, then the temp dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when omitted
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<String>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a file and print the detected encoding and text
    Decode {
        path: PathBuf,
    },
    /// Run the drop pipeline and print the note request it would send
    Preview {
        /// Files in drop order
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Inspect or change persisted settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Print the core version
    Version,
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print the effective settings
    Show,
    /// Use the file name (without extension) as the note title
    SetTitle {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Set the maximum accepted file size in MiB
    SetMaxSize {
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        megabytes: u32,
    },
    /// Fill missing settings with defaults
    Seed,
}
