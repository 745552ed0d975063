use clap::Parser;
use exam_builder::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Import(args) => cli::import::run(args).await,
        Command::Generate(args) => cli::generate::run(args).await,
    }
}
