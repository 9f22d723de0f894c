//! Chat session and terminal client support.
//!
//! This module provides the [`ChatSession`] request/response cycle and the
//! pieces the `imali-chat` REPL is built from:
//!
//! - `session`: transcript, pending gate, and fallback handling
//! - `events`: the replayable event log
//! - `config`: CLI argument parsing and configuration
//! - `commands`: slash command parsing

mod commands;
mod config;
mod events;
mod session;

pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig, ConfigFile};
pub use events::{Rejection, SessionEvent, SessionSnapshot};
pub use session::{ChatSession, DEFAULT_FALLBACK_DELAY, SessionStats, SubmitOutcome};
