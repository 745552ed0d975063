//! Import command - bulk load a bank file into the durable store

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::infrastructure::bank::FlatFileBankStore;
use crate::infrastructure::logging;
use crate::infrastructure::services::BankService;
use crate::infrastructure::storage::StorageFactory;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Path to the bank JSON file
    pub path: PathBuf,

    /// Bank key; defaults to the file stem
    #[arg(long)]
    pub key: Option<String>,
}

pub async fn run(args: ImportArgs) -> anyhow::Result<()> {
    let config = super::load_config();
    logging::init_logging(&config.logging);

    let key = match args.key {
        Some(key) => key,
        None => args
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .context("cannot derive a bank key from the file name, pass --key")?,
    };

    let content = tokio::fs::read_to_string(&args.path)
        .await
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    let file = FlatFileBankStore::parse(&content)?;

    let repository =
        StorageFactory::create_bank_repository(&config.storage.to_storage_config()).await?;
    let key = BankService::new(repository).import_bank(file, &key).await?;

    info!(bank_key = %key, path = %args.path.display(), "Bank imported");
    println!("{}", key);

    Ok(())
}
