//! Generate command - render an exam without the HTTP layer

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::domain::{ExamSpec, TopicWeights};
use crate::infrastructure::logging;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Bank key (flat-file name, `.json` optional)
    #[arg(long)]
    pub bank: String,

    /// Number of questions
    #[arg(long)]
    pub total: i64,

    /// Topic weight as `topic=weight`, repeatable; order is preserved
    #[arg(long = "weight", value_parser = parse_weight, required = true)]
    pub weights: Vec<(String, f64)>,

    /// Seed for a reproducible selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the document here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl GenerateArgs {
    pub fn to_spec(&self) -> ExamSpec {
        let weights: TopicWeights = self.weights.iter().cloned().collect();

        ExamSpec {
            total: self.total,
            weights,
            seed: self.seed,
        }
    }
}

fn parse_weight(raw: &str) -> Result<(String, f64), String> {
    let (topic, weight) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected topic=weight, got '{}'", raw))?;

    let topic = topic.trim();
    if topic.is_empty() {
        return Err(format!("missing topic in '{}'", raw));
    }

    let weight = weight
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid weight in '{}': {}", raw, e))?;

    Ok((topic.to_string(), weight))
}

pub async fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let config = super::load_config();
    logging::init_logging(&config.logging);

    let exam_service = crate::create_exam_service(&config).await?;
    let document = exam_service.generate(&args.bank, &args.to_spec()).await?;

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, &document)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(bank = %args.bank, output = %path.display(), "Exam written");
        }
        None => println!("{}", document),
    }

    Ok(())
}
