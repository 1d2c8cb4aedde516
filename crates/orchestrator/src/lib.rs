//! Conversation core for the Vita wellness assistant.
//!
//! Each inbound message flows through the [`ConversationRouter`]:
//!
//! 1. Load or create the sender's [`database::UserProfile`].
//! 2. Quick commands (`hi`, `help`, `profile`) short-circuit for onboarded
//!    users.
//! 3. Incomplete onboarding delegates to the [`onboarding`] state machine.
//! 4. Otherwise the [`streak`] engine runs, the message is classified by
//!    [`intent`], behavioural context is gathered ([`analytics`],
//!    [`recall`]), the generation collaborator produces a structured reply,
//!    and the exchange is persisted through [`memory`].
//!
//! All state lives in the database; there is no in-memory session. Two
//! concurrent messages from the same phone race the profile
//! read-modify-write with last-write-wins semantics (see DESIGN.md).

pub mod analytics;
pub mod error;
pub mod intent;
pub mod memory;
pub mod onboarding;
pub mod prompts;
pub mod recall;
pub mod replies;
pub mod router;
pub mod sender;
pub mod streak;

pub use analytics::{KeywordAnalytics, RefreshSummary};
pub use error::OrchestratorError;
pub use memory::ConversationMemory;
pub use recall::SemanticRecall;
pub use router::{ConversationRouter, RouterConfig};
pub use sender::{LoggingSender, MessageSender, NoOpSender};
