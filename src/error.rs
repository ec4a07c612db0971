//! Unified application error.
//!
//! Every layer (config, network, parsing, data quality) fails through
//! `AppError` so `main.rs` can map the failure class to a process exit
//! code: 0 success, 1 configuration error, 2 upstream data error.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Unable to parse {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unable to connect to {url}: {message}")]
    Unreachable { url: String, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Known connections count = {count} (expected at least {threshold})")]
    InsufficientData { count: usize, threshold: usize },
}

impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Process exit code for this failure class.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) | AppError::ConfigParse { .. } => 1,
            AppError::Network(_)
            | AppError::Unreachable { .. }
            | AppError::Parse(_)
            | AppError::InsufficientData { .. } => 2,
        }
    }
}
