//! Question domain - Pre-authored exam questions

mod entity;
mod validation;

pub use entity::{Question, QuestionPatch};
pub use validation::{
    validate_external_id, validate_latex, validate_topic, QuestionValidationError,
};
