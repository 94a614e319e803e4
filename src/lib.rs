//! Boat admeasurement record keeping: a terminal UI over a single persisted
//! collection of boat registrations, with spreadsheet and certificate exports.
//!
//! `main.rs` wires these modules together; they are public so integration
//! tests can drive the same pieces without a terminal.
pub mod book;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod listing;
pub mod logging;
pub mod models;
pub mod ui;

pub use book::BoatBook;
pub use config::Config;
pub use db::{open_store, BoatRepository, SqliteRepository};
pub use error::{Error, Result};
pub use models::{BoatDetails, BoatField, BoatRecord, BoatSubmission};

/// The interactive application entry point and state container.
pub use ui::{run_app, App, AppSettings};
