//! Application configuration

mod app_config;

pub use app_config::{AppConfig, BanksConfig, LogFormat, LoggingConfig, ServerConfig, StorageSettings};
