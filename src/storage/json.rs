//! JSON file snapshot backend

use crate::config::OutputConfig;
use crate::storage::{Snapshot, SnapshotStorage, StorageError, StorageResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stores the snapshot as pretty-printed JSON and the broken URL list as
/// newline-separated text
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    results_path: PathBuf,
    errored_path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(results_path: impl Into<PathBuf>, errored_path: impl Into<PathBuf>) -> Self {
        Self {
            results_path: results_path.into(),
            errored_path: errored_path.into(),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.results_path, &config.errored_path)
    }

    pub fn results_path(&self) -> &Path {
        &self.results_path
    }

    pub fn errored_path(&self) -> &Path {
        &self.errored_path
    }
}

impl SnapshotStorage for JsonFileStorage {
    fn load_snapshot(&self) -> StorageResult<Option<Snapshot>> {
        let content = match fs::read_to_string(&self.results_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&self.results_path, e)),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StorageError::Json {
                path: self.results_path.display().to_string(),
                source,
            })
    }

    fn write_snapshot(&mut self, snapshot: &Snapshot) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(snapshot).map_err(|source| StorageError::Json {
            path: self.results_path.display().to_string(),
            source,
        })?;
        write_replacing(&self.results_path, &json)
    }

    fn write_errored(&mut self, urls: &[String]) -> StorageResult<()> {
        write_replacing(&self.errored_path, &urls.join("\n"))
    }
}

/// Writes `contents` next to `path` and renames it into place
///
/// Readers inspecting the file mid-crawl see either the old or the new
/// contents, never a partial write.
fn write_replacing(path: &Path, contents: &str) -> StorageResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    fs::write(&tmp_path, contents).map_err(|e| io_error(&tmp_path, e))?;
    fs::rename(&tmp_path, path).map_err(|e| io_error(path, e))?;

    tracing::debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}
