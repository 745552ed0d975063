//! Bank domain - Question collections scoped to one course/unit

mod entity;
mod repository;
mod validation;

pub use entity::{
    distinct_topics, Bank, BankFile, BankFileQuestion, BankKey, BankRecord,
};
pub use repository::{in_memory::InMemoryBankRepository, BankRepository, CourseBank};
pub use validation::{validate_bank_identity, validate_bank_key, BankValidationError};

#[cfg(test)]
pub use repository::MockBankRepository;
