use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Identifier of a message within one chat session.
///
/// Ids are handed out by the session in strictly increasing order, so sorting
/// by id reproduces transcript order.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    /// Wrap a raw id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who authored a message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person typing into the chat.
    User,

    /// The assistant, including greetings and fallback notices.
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

/// One entry of a chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Session-unique, monotonic id.
    pub id: MessageId,

    /// The author of the message.
    pub sender: Sender,

    /// The message text.
    pub text: String,

    /// When the message was appended to the transcript.
    #[serde(with = "crate::utils::time")]
    pub sent_at: OffsetDateTime,
}

impl Message {
    /// Create a message stamped with the current time.
    pub fn new(id: MessageId, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id,
            sender,
            text: text.into(),
            sent_at: OffsetDateTime::now_utc(),
        }
    }

    /// Create a user message.
    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self::new(id, Sender::User, text)
    }

    /// Create a bot message.
    pub fn bot(id: MessageId, text: impl Into<String>) -> Self {
        Self::new(id, Sender::Bot, text)
    }

    /// Returns true if the user wrote this message.
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    /// Returns true if the assistant wrote this message.
    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialization() {
        let mut message = Message::user(MessageId::new(7), "What is my revenue?");
        message.sent_at = time::macros::datetime!(2024-03-01 09:30:00 UTC);
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(
            json,
            r#"{"id":7,"sender":"user","text":"What is my revenue?","sent_at":"2024-03-01T09:30:00Z"}"#
        );
    }

    #[test]
    fn deserialization() {
        let json = r#"{"id":2,"sender":"bot","text":"R14,200 projected","sent_at":"2024-03-01T09:30:01Z"}"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.id, MessageId::new(2));
        assert!(message.is_bot());
        assert_eq!(message.text, "R14,200 projected");
    }

    #[test]
    fn ids_order() {
        assert!(MessageId::new(1) < MessageId::new(2));
        assert_eq!(MessageId::new(5).get(), 5);
        assert_eq!(Sender::Bot.to_string(), "bot");
    }
}
