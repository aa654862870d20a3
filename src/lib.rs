pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod fetch;
pub mod report;

pub use error::{AppError, Result};
