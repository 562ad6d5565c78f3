use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use analysis_domain::{AnalysisRepository, AnalysisResult, DomainError};

#[derive(Default)]
pub struct InMemoryAnalysisRepository {
    results: RwLock<HashMap<String, AnalysisResult>>,
}

impl InMemoryAnalysisRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalysisRepository for InMemoryAnalysisRepository {
    async fn load(&self, item_id: &str) -> Result<Option<AnalysisResult>, DomainError> {
        Ok(self.results.read().await.get(item_id).cloned())
    }

    async fn save(&self, result: &AnalysisResult) -> Result<(), DomainError> {
        self.results
            .write()
            .await
            .insert(result.item_id.clone(), result.clone());
        Ok(())
    }

    async fn delete(&self, item_id: &str) -> Result<bool, DomainError> {
        Ok(self.results.write().await.remove(item_id).is_some())
    }
}

/// Stores one pretty-printed JSON document per item under a directory.
pub struct JsonFileAnalysisRepository {
    directory: PathBuf,
}

impl JsonFileAnalysisRepository {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, item_id: &str) -> PathBuf {
        self.directory.join(format!("{}.json", file_stem(item_id)))
    }
}

/// Maps an item id onto a file stem without collisions: bytes outside
/// `[A-Za-z0-9-]` become `_XX`, so `_` itself is always an escape.
fn file_stem(item_id: &str) -> String {
    let mut stem = String::with_capacity(item_id.len());
    for byte in item_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("_{byte:02X}"));
        }
    }
    stem
}

fn storage_error(action: &str, path: &Path, err: impl std::fmt::Display) -> DomainError {
    DomainError::internal_error(format!("failed to {action} {}: {err}", path.display()))
}

#[async_trait]
impl AnalysisRepository for JsonFileAnalysisRepository {
    async fn load(&self, item_id: &str) -> Result<Option<AnalysisResult>, DomainError> {
        let path = self.path_for(item_id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(storage_error("read", &path, err)),
        };
        let result: AnalysisResult =
            serde_json::from_slice(&bytes).map_err(|err| storage_error("decode", &path, err))?;
        if result.item_id != item_id {
            return Err(storage_error(
                "load",
                &path,
                format!("document belongs to `{}`, not `{item_id}`", result.item_id),
            ));
        }
        Ok(Some(result))
    }

    async fn save(&self, result: &AnalysisResult) -> Result<(), DomainError> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|err| storage_error("create", &self.directory, err))?;

        let path = self.path_for(&result.item_id);
        let bytes =
            serde_json::to_vec_pretty(result).map_err(|err| storage_error("encode", &path, err))?;

        // Write then rename so readers never observe a partial document.
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, bytes)
            .await
            .map_err(|err| storage_error("write", &staging, err))?;
        tokio::fs::rename(&staging, &path)
            .await
            .map_err(|err| storage_error("replace", &path, err))?;

        tracing::debug!(item_id = %result.item_id, path = %path.display(), "analysis persisted");
        Ok(())
    }

    async fn delete(&self, item_id: &str) -> Result<bool, DomainError> {
        let path = self.path_for(item_id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(storage_error("remove", &path, err)),
        }
    }
}
