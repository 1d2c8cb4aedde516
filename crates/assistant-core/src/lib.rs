//! Core traits and types shared across the Vita wellness assistant.
//!
//! This crate defines the interfaces between the conversation core and its
//! external collaborators:
//!
//! - [`Generator`] - LLM text generation from a prompt
//! - [`Embedder`] - text to embedding vector, for semantic recall
//! - [`InboundMessage`] / [`OutboundMessage`] - message types for input/output
//! - [`CoreError`] - error type for collaborator operations
//!
//! # Example
//!
//! ```rust
//! use assistant_core::{CoreError, Generator};
//! use async_trait::async_trait;
//!
//! struct CannedGenerator;
//!
//! #[async_trait]
//! impl Generator for CannedGenerator {
//!     async fn generate(&self, _prompt: &str) -> Result<String, CoreError> {
//!         Ok(r#"{"response": "hello"}"#.to_string())
//!     }
//! }
//! ```

mod embedder;
mod error;
mod generator;
mod message;

pub use embedder::Embedder;
pub use error::CoreError;
pub use generator::Generator;
pub use message::{InboundMessage, OutboundMessage};

// Re-export async_trait for implementors
pub use async_trait::async_trait;
