//! Static interface strings.
//!
//! A lookup for a key that a language does not translate falls back to the
//! English entry, so every key resolves.

use crate::types::Language;

/// Interface strings the chat client displays.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Text {
    /// Title of the chat view.
    Assistant,
    /// First bot message of a session, and the message added on a language switch.
    Greeting,
    /// Prompt hint shown before the first question.
    Placeholder,
    /// Bot message shown when the assistant cannot be reached.
    Fallback,
    /// Indicator shown while a reply is pending.
    Typing,
    /// Label for signing in or registering.
    AdminAccess,
    /// Label for signing out.
    SignOut,
}

/// Look up `key` in `lang`, falling back to English.
pub fn t(lang: Language, key: Text) -> &'static str {
    lookup(lang, key)
        .or_else(|| lookup(Language::En, key))
        .unwrap_or("")
}

fn lookup(lang: Language, key: Text) -> Option<&'static str> {
    use Language::*;
    use Text::*;
    let s = match (lang, key) {
        (En, Assistant) => "Financial Assistant",
        (En, Greeting) => {
            "Hello! I am Imali-Bot. I can help you analyze cash flow, audit transactions, or predict future expenses."
        }
        (En, Placeholder) => "Ask about revenue, expenses, or reports...",
        (En, Fallback) => {
            "I can't reach the Imali-Bot assistant right now. Please try again in a moment."
        }
        (En, Typing) => "Imali-Bot is typing...",
        (En, AdminAccess) => "Login / Register",
        (En, SignOut) => "Sign Out",

        (Zu, Assistant) => "Umsizi Wezimali",
        (Zu, Greeting) => {
            "Sawubona! Ngingu-Imali-Bot. Ngingakusiza ukuhlaziya ukuhamba kwemali noma ukuhlola ukuthengiselana."
        }
        (Zu, Placeholder) => "Buza ngemali engenayo, izindleko, noma imibiko...",
        (Zu, Fallback) => {
            "Angikwazi ukuxhumana nomsizi we-Imali-Bot okwamanje. Sicela uzame futhi maduze."
        }
        (Zu, AdminAccess) => "Ngena / Bhalisa",
        (Zu, SignOut) => "Phuma",

        (Xh, Assistant) => "Umncedisi Wezemali",
        (Xh, Greeting) => {
            "Molo! Ndingu-Imali-Bot. Ndingakunceda uhlalutye ukuhamba kwemali okanye uqikelele inkcitho."
        }
        (Xh, Placeholder) => "Buza malunga nengeniso, inkcitho, okanye iingxelo...",
        (Xh, Fallback) => {
            "Andikwazi ukufikelela kumncedisi we-Imali-Bot ngoku. Nceda uzame kwakhona kamva."
        }
        (Xh, AdminAccess) => "Ngena / Bhalisa",
        (Xh, SignOut) => "Phuma",

        (Af, Assistant) => "Finansiële Assistent",
        (Af, Greeting) => {
            "Hallo! Ek is Imali-Bot. Ek kan jou help om kontantvloei te ontleed of transaksies te oudit."
        }
        (Af, Placeholder) => "Vra oor inkomste, uitgawes of verslae...",
        (Af, Fallback) => {
            "Ek kan nie nou die Imali-Bot-assistent bereik nie. Probeer asseblief binnekort weer."
        }
        (Af, Typing) => "Imali-Bot tik...",
        (Af, AdminAccess) => "Teken In / Registreer",
        (Af, SignOut) => "Teken Uit",

        (St, Assistant) => "Mothusi wa Ditjhelete",
        (St, Greeting) => {
            "Dumela! Ke nna Imali-Bot. Nka o thusa ho hlahloba phallo ea chelete kapa ho rala bokamoso."
        }
        (St, Placeholder) => "Botsa ka chelete e kenang, ditshenyyehelo...",
        (St, Fallback) => {
            "Ha ke kgone ho fihlella mothusi wa Imali-Bot hona jwale. Ka kopo leka hape hamorao."
        }
        (St, AdminAccess) => "Kena / Ngolisa",
        (St, SignOut) => "Tswa",

        _ => return None,
    };
    Some(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_resolves_in_every_language() {
        let keys = [
            Text::Assistant,
            Text::Greeting,
            Text::Placeholder,
            Text::Fallback,
            Text::Typing,
            Text::AdminAccess,
            Text::SignOut,
        ];
        for lang in Language::ALL {
            for key in keys {
                assert!(!t(lang, key).is_empty(), "{lang} {key:?}");
            }
        }
    }

    #[test]
    fn missing_translation_uses_english() {
        assert_eq!(t(Language::Zu, Text::Typing), t(Language::En, Text::Typing));
        assert_ne!(t(Language::Af, Text::Typing), t(Language::En, Text::Typing));
    }

    #[test]
    fn fallback_is_localized() {
        assert!(t(Language::En, Text::Fallback).contains("can't reach"));
        assert!(t(Language::Af, Text::Fallback).starts_with("Ek kan nie"));
    }
}
