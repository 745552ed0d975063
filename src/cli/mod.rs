//! CLI module for Exam Builder
//!
//! - `serve`: HTTP API server
//! - `import`: load a bank JSON file into the durable store
//! - `generate`: render an exam to stdout or a file

pub mod generate;
pub mod import;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

/// Exam Builder - assemble LaTeX exams from topic-weighted question banks
#[derive(Parser)]
#[command(name = "exam-builder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Import a bank JSON file into the durable store
    Import(import::ImportArgs),

    /// Generate an exam from a bank
    Generate(generate::GenerateArgs),
}

/// Load `.env`, then layered configuration; falls back to defaults
pub(crate) fn load_config() -> AppConfig {
    dotenvy::dotenv().ok();
    AppConfig::load().unwrap_or_default()
}
