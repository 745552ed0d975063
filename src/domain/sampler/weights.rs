//! Topic weights and the exam specification consumed by the sampler

use std::ops::RangeInclusive;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Accepted band for the sum of all weights. Deliberately loose: weights
/// entered by hand rarely add up to exactly 1.0.
pub const WEIGHT_SUM_TOLERANCE: RangeInclusive<f64> = 0.99..=1.01;

/// Ordered topic -> proportion mapping.
///
/// Iteration follows insertion order, which fixes the order in which topics
/// consume the shared random stream. Re-inserting a topic keeps its original
/// position and replaces the weight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicWeights(IndexMap<String, f64>);

impl TopicWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a topic weight
    pub fn with(mut self, topic: impl Into<String>, weight: f64) -> Self {
        self.insert(topic, weight);
        self
    }

    pub fn insert(&mut self, topic: impl Into<String>, weight: f64) {
        self.0.insert(topic.into(), weight);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, topic: &str) -> Option<f64> {
        self.0.get(topic).copied()
    }

    /// Iterate in declared order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(t, w)| (t.as_str(), *w))
    }

    pub fn sum(&self) -> f64 {
        self.0.values().sum()
    }

    /// Check the mapping is usable for sampling
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.is_empty() {
            return Err(DomainError::invalid_request("weights required"));
        }

        if !WEIGHT_SUM_TOLERANCE.contains(&self.sum()) {
            return Err(DomainError::invalid_request("weights must sum to ~1.0"));
        }

        for (topic, weight) in self.iter() {
            if !(weight.is_finite() && weight > 0.0 && weight <= 1.0) {
                return Err(DomainError::invalid_request(format!(
                    "weight for topic '{}' must be in (0, 1]",
                    topic
                )));
            }
        }

        Ok(())
    }
}

impl<T: Into<String>> FromIterator<(T, f64)> for TopicWeights {
    fn from_iter<I: IntoIterator<Item = (T, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(t, w)| (t.into(), w)).collect())
    }
}

/// Number of questions a topic contributes.
///
/// `total * weight` is rounded half-to-even, so an exact `.5` goes to the
/// nearest even integer (2.5 -> 2, 3.5 -> 4). Other rounding functions
/// disagree on these cases and would change the per-topic counts.
pub fn required_count(total: i64, weight: f64) -> usize {
    let count = (total as f64 * weight).round_ties_even();

    if count <= 0.0 { 0 } else { count as usize }
}

/// Sampler input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamSpec {
    pub total: i64,
    pub weights: TopicWeights,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ExamSpec {
    pub fn new(total: i64, weights: TopicWeights) -> Self {
        Self {
            total,
            weights,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
