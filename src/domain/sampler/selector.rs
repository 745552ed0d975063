//! Weighted stratified question selection

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::weights::{required_count, ExamSpec, TopicWeights};
use crate::domain::question::Question;
use crate::domain::DomainError;

/// Build the generator for one selection call.
///
/// A seed makes the whole selection reproducible: per-topic draws and the
/// final shuffle all consume this one stream. `StdRng` pins its algorithm only
/// for a given `rand` release, so a seed replays the same exam for a fixed
/// `Cargo.lock`. A `rand` upgrade may change which questions a seed selects.
pub fn exam_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Select `total` questions from `pool` following the topic weights.
pub fn select(
    pool: &[Question],
    total: i64,
    weights: &TopicWeights,
    seed: Option<u64>,
) -> Result<Vec<Question>, DomainError> {
    let mut rng = exam_rng(seed);
    select_with_rng(pool, total, weights, &mut rng)
}

/// Select using an [`ExamSpec`]
pub fn select_for_spec(pool: &[Question], spec: &ExamSpec) -> Result<Vec<Question>, DomainError> {
    select(pool, spec.total, &spec.weights, spec.seed)
}

/// Select with a caller-supplied generator.
///
/// Questions without a topic, or whose topic carries no weight, are never
/// selected. Topics are drawn in the declared order of `weights`, each
/// without replacement, then the whole selection is shuffled once.
pub fn select_with_rng<R>(
    pool: &[Question],
    total: i64,
    weights: &TopicWeights,
    rng: &mut R,
) -> Result<Vec<Question>, DomainError>
where
    R: Rng + ?Sized,
{
    if total <= 0 {
        return Err(DomainError::invalid_request("total must be positive"));
    }

    weights.validate()?;

    let mut groups: HashMap<&str, Vec<&Question>> = HashMap::new();
    for question in pool {
        if let Some(topic) = question.topic() {
            groups.entry(topic).or_default().push(question);
        }
    }

    let mut selected: Vec<Question> = Vec::new();

    for (topic, weight) in weights.iter() {
        let count = required_count(total, weight);
        let group = groups.get(topic).map(Vec::as_slice).unwrap_or(&[]);

        if group.len() < count {
            return Err(DomainError::invalid_request(format!(
                "not enough questions for topic '{}' (needed {}, found {})",
                topic,
                count,
                group.len()
            )));
        }

        debug!(topic = %topic, count, available = group.len(), "Drawing questions");
        selected.extend(group.choose_multiple(rng, count).map(|q| (*q).clone()));
    }

    selected.shuffle(rng);

    // Per-topic rounding can over- or undershoot when several topics land on .5
    if selected.len() as i64 != total {
        return Err(DomainError::internal_invariant(format!(
            "exam generation error: expected {} questions, got {}",
            total,
            selected.len()
        )));
    }

    Ok(selected)
}
