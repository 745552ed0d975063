//! Exam domain - Rendering selected questions into a document

mod template;

pub use template::{
    ExamTemplate, COURSE_PLACEHOLDER, DEFAULT_TEMPLATE, QUESTIONS_PLACEHOLDER, UNIT_PLACEHOLDER,
};
