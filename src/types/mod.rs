mod inference;
mod language;
mod message;
mod user;

pub use inference::{HealthStatus, QueryRequest, QueryResponse};
pub use language::{Language, LanguageParseError};
pub use message::{Message, MessageId, Sender};
pub use user::{Role, SignUp, User};
