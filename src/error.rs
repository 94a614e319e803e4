//! Error types shared by the persistence, export, and configuration layers.
//!
//! The UI converts these into `anyhow` chains so the footer can show the most
//! specific cause, while `main` lets start-up failures bubble to the terminal.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong below the UI.
#[derive(Error, Debug)]
pub enum Error {
    /// The SQLite file could not be opened or created.
    #[error("failed to open record store at {path}: {source}")]
    DatabaseOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A statement against the record store failed.
    #[error("record store query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// A data or export directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The record collection could not be serialized for the slot.
    #[error("failed to encode boat records: {0}")]
    Encode(#[from] serde_json::Error),

    /// An edit or delete targeted an id that is not in the collection.
    #[error("boat record {id} not found")]
    RecordNotFound { id: String },

    /// The spreadsheet writer rejected the workbook.
    #[error("failed to build spreadsheet: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    /// The PDF writer rejected the certificate.
    #[error("failed to build certificate: {0}")]
    Pdf(String),

    /// An exported file could not be written to disk.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Figment could not merge or extract the configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// The configuration parsed but holds unusable values.
    #[error("invalid configuration: {message}")]
    ConfigValidation { message: String },
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_id() {
        let err = Error::RecordNotFound {
            id: "1724900000000".to_string(),
        };
        assert_eq!(err.to_string(), "boat record 1724900000000 not found");
    }

    #[test]
    fn directory_error_keeps_source() {
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/nope"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("denied"));
        assert!(err.to_string().contains("/nope"));
    }
}
