//! QuickLog command-line tool
//!
//! Usage:
//!   quicklog defaults --out qlconfig.json
//!   quicklog show --config qlconfig.json [--on-missing fail|create-empty]
//!   quicklog probe [--lib-root /opt/quicklogger]

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use quicklog_cli::{load_settings, probe, render_settings, write_defaults};
use quicklog_config::OnMissing;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "quicklog")]
#[command(about = "QuickLog configuration and native engine tools")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a settings document with one default provider of every kind
    Defaults {
        /// Output path
        #[arg(short, long, default_value = "qlconfig.json")]
        out: PathBuf,
    },
    /// Print the providers of a settings document
    Show {
        /// Settings document to read
        #[arg(short, long)]
        config: PathBuf,

        /// What to do when the file does not exist
        #[arg(long, value_enum, default_value_t = MissingFile::Fail)]
        on_missing: MissingFile,
    },
    /// Load the native engine and report its version and catalog
    Probe {
        /// Directory containing the x64/ and x86/ library folders
        #[arg(long)]
        lib_root: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum MissingFile {
    Fail,
    CreateEmpty,
}

impl From<MissingFile> for OnMissing {
    fn from(value: MissingFile) -> Self {
        match value {
            MissingFile::Fail => OnMissing::Fail,
            MissingFile::CreateEmpty => OnMissing::CreateEmpty,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    match args.command {
        Command::Defaults { out } => {
            let count = write_defaults(&out)?;
            println!("{count} providers written to {}", out.display());
        }
        Command::Show { config, on_missing } => {
            let settings = load_settings(&config, on_missing.into())?;
            print!("{}", render_settings(&settings));
        }
        Command::Probe { lib_root } => {
            let report = probe(lib_root)?;
            info!("Engine loaded from {}", report.library.display());
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
