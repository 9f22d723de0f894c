//! The chat session's event log.
//!
//! Every state change of a [`ChatSession`](crate::chat::ChatSession) is
//! recorded as a [`SessionEvent`] and applied to a [`SessionSnapshot`].  The
//! session's own state is built the same way, so replaying its log reproduces
//! its transcript and pending flag exactly.

use crate::error::FailureKind;
use crate::types::{Language, Message};

/// Why a submission was not accepted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The text was empty after trimming.
    Empty,
    /// A reply was still pending.
    Busy,
}

/// One state change of a chat session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A greeting was appended, either at session start or after a language
    /// switch.
    Greeted {
        /// Language now in effect.
        language: Language,
        /// The greeting.
        message: Message,
    },

    /// A user message was accepted; a reply is now pending.
    Submitted {
        /// The user's message.
        message: Message,
    },

    /// The assistant replied.
    Replied {
        /// The reply.
        message: Message,
        /// Playbook strategies the assistant reported using.
        strategies_used: Vec<String>,
    },

    /// The assistant could not be reached; the fallback message was appended.
    FellBack {
        /// The fallback message.
        message: Message,
        /// How the cycle failed.
        failure: FailureKind,
    },

    /// A submission was ignored.
    Rejected {
        /// Why it was ignored.
        reason: Rejection,
    },
}

impl SessionEvent {
    /// The message this event appended, if any.
    pub fn message(&self) -> Option<&Message> {
        match self {
            SessionEvent::Greeted { message, .. }
            | SessionEvent::Submitted { message }
            | SessionEvent::Replied { message, .. }
            | SessionEvent::FellBack { message, .. } => Some(message),
            SessionEvent::Rejected { .. } => None,
        }
    }
}

/// Transcript and pending flag rebuilt from events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    /// Messages in insertion order.
    pub transcript: Vec<Message>,
    /// True while a reply is outstanding.
    pub pending: bool,
    /// The language of the last greeting.
    pub language: Language,
}

impl SessionSnapshot {
    /// Rebuild a snapshot from a log.
    pub fn replay<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a SessionEvent>,
    {
        let mut snapshot = Self::default();
        for event in events {
            snapshot.apply(event);
        }
        snapshot
    }

    /// Apply one event.
    pub fn apply(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::Greeted { language, message } => {
                self.language = *language;
                self.transcript.push(message.clone());
            }
            SessionEvent::Submitted { message } => {
                self.transcript.push(message.clone());
                self.pending = true;
            }
            SessionEvent::Replied { message, .. } | SessionEvent::FellBack { message, .. } => {
                self.transcript.push(message.clone());
                self.pending = false;
            }
            SessionEvent::Rejected { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageId;

    #[test]
    fn replay_tracks_pending() {
        let events = vec![
            SessionEvent::Greeted {
                language: Language::Zu,
                message: Message::bot(MessageId::new(1), "Sawubona!"),
            },
            SessionEvent::Submitted {
                message: Message::user(MessageId::new(2), "ping"),
            },
            SessionEvent::Rejected {
                reason: Rejection::Busy,
            },
        ];
        let snapshot = SessionSnapshot::replay(&events);
        assert_eq!(snapshot.transcript.len(), 2);
        assert!(snapshot.pending);
        assert_eq!(snapshot.language, Language::Zu);

        let mut snapshot = snapshot;
        snapshot.apply(&SessionEvent::FellBack {
            message: Message::bot(MessageId::new(3), "offline"),
            failure: FailureKind::Transport,
        });
        assert!(!snapshot.pending);
        assert_eq!(snapshot.transcript.last().unwrap().text, "offline");
    }

    #[test]
    fn rejected_has_no_message() {
        let event = SessionEvent::Rejected {
            reason: Rejection::Empty,
        };
        assert!(event.message().is_none());
    }
}
