//! Backend worker: owns the customer list component on a tokio runtime.

pub mod commands;
pub mod prompt;
pub mod runtime;
