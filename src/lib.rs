//! Idea generation and favorites library
//!
//! This library asks a generative-language backend for structured "idea"
//! records for a topic, recovers a JSON array from whatever text comes back,
//! normalizes the records into a canonical shape with stable identities, and
//! manages a locally persisted favorites collection keyed by those
//! identities.

mod cli;
mod config;
mod errors;
mod extract;
mod generator;
mod idea;
mod normalize;
mod storage;
mod types;

// Re-export key components
pub use cli::*;
pub use config::*;
pub use errors::*;
pub use extract::*;
pub use generator::*;
pub use idea::*;
pub use normalize::*;
pub use storage::*;
pub use types::*;
