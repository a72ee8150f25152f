//! Error types for the ideaforge application.
//!
//! This module defines custom error types that categorize different failures
//! that can occur while talking to the generation backend and managing ideas.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the ideaforge application.
#[derive(Error, Debug)]
pub enum IdeaError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Errors raised by the HTTP client while talking to the backend.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The generation backend answered with a non-success status or an
    /// unusable body.
    #[error("Generation backend error: {message}")]
    Backend { message: String },

    /// No API key available for the generation backend.
    #[error("API key not set: export {env_var} or run `ideaforge config --set api_key=<key>`")]
    MissingApiKey { env_var: String },

    /// Idea was not found when performing an operation.
    #[error("Idea not found: {id}")]
    IdeaNotFound { id: String },

    /// Invalid record or file format.
    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {}", path.display())]
    DirectoryError { path: PathBuf },

    /// Generic application error with a custom message.
    #[error("{message}")]
    ApplicationError { message: String },

    /// for mutex lock acquisition issues
    #[error("{message}")]
    LockAcquisitionFailed { message: String },
}
