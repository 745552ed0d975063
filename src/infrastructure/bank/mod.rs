//! Bank storage backends and resolution

mod flat_file;
mod postgres_repository;
mod resolver;

pub use flat_file::FlatFileBankStore;
pub use postgres_repository::PostgresBankRepository;
pub use resolver::{reconcile, BankResolver, ResolutionState};
