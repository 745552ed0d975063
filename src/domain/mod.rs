//! Domain layer - Core business logic and entities

pub mod bank;
pub mod error;
pub mod exam;
pub mod question;
pub mod sampler;

pub use bank::{
    Bank, BankFile, BankFileQuestion, BankKey, BankRecord, BankRepository, BankValidationError,
    CourseBank, InMemoryBankRepository,
};
pub use error::DomainError;
pub use exam::ExamTemplate;
pub use question::{Question, QuestionPatch, QuestionValidationError};
pub use sampler::{select, select_with_rng, ExamSpec, TopicWeights};
