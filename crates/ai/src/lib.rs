//! AI task assistant.
//!
//! Sends assignment, recommendation and workload questions to a hosted
//! generative model, validates the answers against a strict schema, and
//! falls back to the deterministic heuristics whenever the model fails.

#![warn(missing_docs)]

pub mod assistant;
pub mod client;
pub mod config;
pub mod error;
pub mod prompt;
pub mod response;

pub use assistant::{Advice, AdviceSource, TaskAssistant};
pub use client::{GeminiClient, ModelClient, OfflineClient};
pub use config::AiConfig;
pub use error::{AiError, ResponseError};
