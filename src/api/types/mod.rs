//! API request, response and error types

pub mod bank;
pub mod error;
pub mod exam;
pub mod json;
pub mod query;

pub use bank::{
    BankResponse, CreateBankApiRequest, CreateQuestionApiRequest, DeletedResponse,
    ImportBankResponse, QuestionResponse,
};
pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use exam::{BankFileQuery, ExamRequest, PreviewQuestion, PreviewResponse};
pub use json::Json;
pub use query::Query;
