//! Logging hook for chat session activity.
//!
//! This module provides the [`SessionLogger`] trait that allows users to
//! capture every event passing through a [`ChatSession`](crate::chat::ChatSession).

use crate::chat::SessionEvent;

/// A trait for logging chat session events.
///
/// Implement this trait to record the session's event log as it grows, for
/// example to mirror it into an audit trail.
///
/// # Example
///
/// ```rust,ignore
/// use imali::SessionLogger;
/// use imali::chat::SessionEvent;
/// use std::sync::Mutex;
///
/// struct Audit {
///     lines: Mutex<Vec<String>>,
/// }
///
/// impl SessionLogger for Audit {
///     fn log_event(&self, event: &SessionEvent) {
///         self.lines.lock().unwrap().push(format!("{event:?}"));
///     }
/// }
/// ```
pub trait SessionLogger: Send + Sync {
    /// Log one event.
    ///
    /// Called while the session's lock is held, so events arrive in log
    /// order even when several tasks share the session.  Must not block, and
    /// must not call back into the session.
    fn log_event(&self, event: &SessionEvent);
}

/// Forwards session events to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl SessionLogger for TracingLogger {
    fn log_event(&self, event: &SessionEvent) {
        match event {
            SessionEvent::Greeted { language, message } => {
                tracing::debug!(id = %message.id, %language, "greeting appended");
            }
            SessionEvent::Submitted { message } => {
                tracing::debug!(id = %message.id, "user message submitted");
            }
            SessionEvent::Replied {
                message,
                strategies_used,
            } => {
                tracing::debug!(id = %message.id, strategies = ?strategies_used, "reply appended");
            }
            SessionEvent::FellBack { message, failure } => {
                tracing::debug!(id = %message.id, %failure, "fallback appended");
            }
            SessionEvent::Rejected { reason } => {
                tracing::debug!(?reason, "submission rejected");
            }
        }
    }
}
