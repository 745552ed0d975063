//! Infrastructure layer - Storage backends, bank resolution and services

pub mod bank;
pub mod logging;
pub mod services;
pub mod storage;
