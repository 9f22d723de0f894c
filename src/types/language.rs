use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages the assistant's interface strings are available in.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English
    #[default]
    En,

    /// isiZulu
    Zu,

    /// isiXhosa
    Xh,

    /// Afrikaans
    Af,

    /// Sesotho
    St,
}

impl Language {
    /// Every supported language, in menu order.
    pub const ALL: [Language; 5] = [
        Language::En,
        Language::Zu,
        Language::Xh,
        Language::Af,
        Language::St,
    ];

    /// The two-letter code.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zu => "zu",
            Language::Xh => "xh",
            Language::Af => "af",
            Language::St => "st",
        }
    }

    /// The language's name for itself.
    pub fn native_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Zu => "isiZulu",
            Language::Xh => "isiXhosa",
            Language::Af => "Afrikaans",
            Language::St => "Sesotho",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error returned when parsing an unknown language code.
#[derive(Debug)]
pub struct LanguageParseError {
    /// The code that could not be parsed.
    pub invalid_value: String,
}

impl fmt::Display for LanguageParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown language: {}", self.invalid_value)
    }
}

impl std::error::Error for LanguageParseError {}

impl FromStr for Language {
    type Err = LanguageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "zu" => Ok(Language::Zu),
            "xh" => Ok(Language::Xh),
            "af" => Ok(Language::Af),
            "st" => Ok(Language::St),
            _ => Err(LanguageParseError {
                invalid_value: s.to_string(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!("zu".parse::<Language>().unwrap(), Language::Zu);
        assert_eq!(" AF ".parse::<Language>().unwrap(), Language::Af);
        let err = "fr".parse::<Language>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown language: fr");
    }

    #[test]
    fn codes_round_trip() {
        for lang in Language::ALL {
            assert_eq!(lang.code().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn serialization() {
        assert_eq!(serde_json::to_string(&Language::Xh).unwrap(), r#""xh""#);
        let lang: Language = serde_json::from_str(r#""st""#).unwrap();
        assert_eq!(lang, Language::St);
        let lang: Language = serde_json::from_str(r#""ZU""#).unwrap();
        assert_eq!(lang, Language::Zu);
        let err = serde_json::from_str::<Language>(r#""fr""#).unwrap_err();
        assert!(err.to_string().contains("Unknown language: fr"));
    }
}
