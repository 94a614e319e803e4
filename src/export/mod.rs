//! File exporters. Both are stateless: they take a snapshot of records, build
//! the document in memory, and write it into the export directory.

mod certificate;
mod spreadsheet;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};

pub use certificate::{
    certificate_file_name, certificate_layout, export_certificate, render_certificate,
    CertificateLine, PAGE_HEIGHT_MM, PAGE_WIDTH_MM,
};
pub use spreadsheet::{
    export_spreadsheet, render_spreadsheet, sheet_rows, SHEET_NAME, SPREADSHEET_FILE_NAME,
};

/// Create `dir` if needed and write `bytes` to `dir/file_name`, replacing any
/// earlier export with the same name.
fn write_export(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreate {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(file_name);
    fs::write(&path, bytes).map_err(|source| Error::FileWrite {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), bytes = bytes.len(), "wrote export");
    Ok(path)
}
