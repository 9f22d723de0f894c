// Public modules
pub mod auth;
pub mod chat;
pub mod client;
pub mod error;
pub mod playbook;
pub mod render;
pub mod scripted;
pub mod strings;
pub mod transport;
pub mod types;
pub mod utils;

mod observability;
mod session_logger;

// Re-exports
pub use auth::{DemoAdmin, DemoIdentity, IdentityProvider};
pub use client::InferenceClient;
pub use error::{Error, FailureKind, Result};
pub use observability::register_biometrics;
pub use render::{PlainTextRenderer, Renderer};
pub use scripted::ScriptedTransport;
pub use session_logger::{SessionLogger, TracingLogger};
pub use transport::Transport;
pub use types::*;
