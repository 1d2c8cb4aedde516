//! OpenAI-backed brain for the Vita wellness assistant.
//!
//! Implements the [`assistant_core::Generator`] and
//! [`assistant_core::Embedder`] collaborator contracts over the OpenAI
//! chat completions and embeddings APIs.
//!
//! # Example
//!
//! ```no_run
//! use assistant_core::Generator;
//! use openai_brain::{OpenAiBrain, OpenAiConfig};
//!
//! # async fn example() -> Result<(), assistant_core::CoreError> {
//! let brain = OpenAiBrain::new(OpenAiConfig::from_env()?)?;
//! let reply = brain.generate("Give one short health tip.").await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

mod api_types;
mod brain;
mod config;

pub use api_types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
pub use brain::OpenAiBrain;
pub use config::OpenAiConfig;
