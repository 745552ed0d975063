//! Flat-file bank store: one `<bank_key>.json` file per bank

use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::debug;

use crate::domain::bank::{BankFile, BankKey};
use crate::domain::DomainError;

const BANK_FILE_EXTENSION: &str = "json";

/// Read-only access to bank files in a directory
#[derive(Debug, Clone)]
pub struct FlatFileBankStore {
    dir: PathBuf,
}

impl FlatFileBankStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &BankKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Parse a bank payload
    pub fn parse(content: &str) -> Result<BankFile, DomainError> {
        serde_json::from_str(content).map_err(|e| {
            DomainError::invalid_format(format!("Invalid question bank format: {}", e))
        })
    }

    /// Read and parse the bank file for `key`; `None` when the file does not exist
    pub async fn read(&self, key: &BankKey) -> Result<Option<BankFile>, DomainError> {
        let path = self.path_for(key);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Bank file not found");
                return Ok(None);
            }
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read bank file '{}': {}",
                    path.display(),
                    e
                )));
            }
        };

        Self::parse(&content).map(Some)
    }

    /// Keys of every `*.json` file in the directory, sorted.
    /// A missing directory yields an empty list.
    pub async fn list_keys(&self) -> Result<Vec<BankKey>, DomainError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read banks directory '{}': {}",
                    self.dir.display(),
                    e
                )));
            }
        };

        let mut keys = Vec::new();

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list bank files: {}", e)))?
        {
            let path = entry.path();
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);

            if !is_file || path.extension().and_then(|e| e.to_str()) != Some(BANK_FILE_EXTENSION) {
                continue;
            }

            if let Some(key) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| BankKey::new(s).ok())
            {
                keys.push(key);
            }
        }

        keys.sort();
        Ok(keys)
    }
}
