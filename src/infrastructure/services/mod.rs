//! Infrastructure services

mod bank_service;
mod exam_service;

pub use bank_service::{BankService, CreateBankRequest, CreateQuestionRequest};
pub use exam_service::{ExamPreview, ExamService};
