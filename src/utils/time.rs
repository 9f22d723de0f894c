//! Timestamp helpers for transcript messages.
//!
//! Used as `#[serde(with = "crate::utils::time")]` so message timestamps travel
//! as RFC 3339 strings.

use serde::{Deserialize, Deserializer, Serializer};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

/// Parse an RFC 3339 string into a timestamp.
pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    OffsetDateTime::parse(&s, &Rfc3339).map_err(serde::de::Error::custom)
}

/// Write a timestamp as an RFC 3339 string.
pub fn serialize<S>(sent_at: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let s = sent_at.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&s)
}

/// Wall-clock `HH:MM` label shown next to rendered messages.
pub fn clock(sent_at: OffsetDateTime) -> String {
    sent_at
        .format(format_description!("[hour]:[minute]"))
        .unwrap_or_else(|_| "--:--".to_string())
}
