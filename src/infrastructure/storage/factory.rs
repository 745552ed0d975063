//! Storage factory for runtime storage selection

use std::sync::Arc;

use tracing::info;

use crate::domain::bank::{BankRepository, InMemoryBankRepository};
use crate::domain::DomainError;
use crate::infrastructure::bank::PostgresBankRepository;

use super::migrations::run_storage_migrations;
use super::postgres::{connect_pool, PostgresConfig};

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory storage configuration
    InMemory,
    /// PostgreSQL storage configuration
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres(config)
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Factory for creating the durable bank store
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Create the bank repository described by the configuration.
    /// Postgres storage is migrated before it is handed out.
    pub async fn create_bank_repository(
        config: &StorageConfig,
    ) -> Result<Arc<dyn BankRepository>, DomainError> {
        match config {
            StorageConfig::InMemory => {
                info!("Using in-memory bank storage");
                Ok(Arc::new(InMemoryBankRepository::new()))
            }
            StorageConfig::Postgres(pg_config) => {
                let pool = connect_pool(pg_config).await?;
                run_storage_migrations(&pool).await?;
                Ok(Arc::new(PostgresBankRepository::new(pool)))
            }
        }
    }
}
