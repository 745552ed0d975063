//! Sampler domain - Topic-weighted question selection

mod selector;
mod weights;

pub use selector::{exam_rng, select, select_for_spec, select_with_rng};
pub use weights::{required_count, ExamSpec, TopicWeights, WEIGHT_SUM_TOLERANCE};
