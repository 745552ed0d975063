//! API layer - HTTP endpoints

pub mod banks;
pub mod exams;
pub mod health;
pub mod questions;
pub mod router;
pub mod state;
pub mod types;

pub use router::create_router;
pub use state::AppState;
