//! Binary entry point: load configuration, start logging, open the record
//! store, and drive the Ratatui event loop until the user exits.
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use boat_admeasurement::logging::{init_logging, Verbosity};
use boat_admeasurement::{
    open_store, run_app, App, AppSettings, BoatBook, Config, SqliteRepository,
};

/// Keep boat admeasurement records and export certificates and spreadsheets.
#[derive(Debug, Parser)]
#[command(name = "boat-admeasurement", version, about)]
struct Cli {
    /// Config file to read instead of ~/.boat-admeasurement/config.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory holding the record store.
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Directory exports are written to.
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_from(cli.config).context("failed to load configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(dir) = cli.export_dir {
        config.export_dir = Some(dir);
    }

    let log_file = config.log_file()?;
    init_logging(
        &log_file,
        &config.log_filter,
        Verbosity::from_occurrences(cli.verbose),
    )?;

    let data_dir = config.data_dir()?;
    let conn = open_store(&data_dir)?;
    let book = BoatBook::open(Box::new(SqliteRepository::new(conn)))?;
    info!(records = book.len(), data_dir = %data_dir.display(), "record store ready");

    let settings = AppSettings {
        export_dir: config.export_dir()?,
        open_after_export: config.open_after_export,
        default_sort: config.default_sort,
    };
    let mut app = App::new(book, settings);
    run_app(&mut app)
}
