//! Exam Builder
//!
//! Assembles LaTeX exams from question banks:
//! - Weighted stratified sampling of questions by topic
//! - Bank resolution across a durable store with a flat-file fallback
//! - HTTP API and CLI front ends

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use api::state::AppState;
use infrastructure::bank::{BankResolver, FlatFileBankStore};
use infrastructure::services::{BankService, ExamService};
use infrastructure::storage::StorageFactory;
use tracing::info;

/// Create the application state with all services initialized
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage = config.storage.to_storage_config();
    info!(storage = ?storage.storage_type(), "Creating bank repository");

    let repository = StorageFactory::create_bank_repository(&storage).await?;
    let template = ExamService::load_template(config.banks.template_path.as_deref()).await?;
    let resolver = BankResolver::new(repository.clone(), FlatFileBankStore::new(&config.banks.dir));

    Ok(AppState::new(
        BankService::new(repository),
        ExamService::new(resolver, template),
    ))
}

/// Create only the exam pipeline, for one-shot generation
pub async fn create_exam_service(config: &AppConfig) -> anyhow::Result<ExamService> {
    let repository =
        StorageFactory::create_bank_repository(&config.storage.to_storage_config()).await?;
    let template = ExamService::load_template(config.banks.template_path.as_deref()).await?;
    let resolver = BankResolver::new(repository, FlatFileBankStore::new(&config.banks.dir));

    Ok(ExamService::new(resolver, template))
}
