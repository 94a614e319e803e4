//! Persistence module split across logical submodules.

mod boats;
mod connection;

pub use boats::{BoatRepository, SqliteRepository, BOATS_KEY, QUARANTINE_KEY};
pub use connection::{open_in_memory, open_store, DB_FILE_NAME};
