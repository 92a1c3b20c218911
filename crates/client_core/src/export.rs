use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::{ClientError, ExportApi};

pub const DEFAULT_EXPORT_FILENAME: &str = "service_orders.csv";
pub const EXPORT_FAILURE_MESSAGE: &str = "Erro ao exportar dados!";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("failed to write export to {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Takes the token after `filename=` in a content-disposition header.
pub fn filename_from_content_disposition(header: Option<&str>) -> String {
    header
        .and_then(|value| value.split_once("filename="))
        .map(|(_, rest)| rest.split(';').next().unwrap_or_default())
        .map(|token| token.trim().trim_matches('"').trim())
        .and_then(|name| name.rsplit(['/', '\\']).next())
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_EXPORT_FILENAME.to_string())
}

pub async fn save_export(dir: &Path, file: &ExportedFile) -> Result<PathBuf, ExportError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| ExportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

    let path = dir.join(&file.filename);
    tokio::fs::write(&path, &file.bytes)
        .await
        .map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
    info!(path = %path.display(), bytes = file.bytes.len(), "saved export");
    Ok(path)
}

/// Downloads the CSV export and writes it into `dir`.
pub async fn download_export<E>(api: &E, dir: &Path) -> Result<PathBuf, ExportError>
where
    E: ExportApi + ?Sized,
{
    let file = api.export_csv().await?;
    save_export(dir, &file).await
}

#[cfg(test)]
#[path = "tests/export_tests.rs"]
mod tests;
