//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the client without sending a query to the
//! assistant.

use crate::types::Language;

/// A parsed chat command.
///
/// These commands control the client and are never sent to the assistant.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Switch the interface language.
    Language(Language),

    /// List the available languages.
    ListLanguages,

    /// Ask the model server whether it is online.
    Health,

    /// Print the transcript.
    History,

    /// Display session statistics.
    Stats,

    /// Sign in with the given email; the password is prompted for.
    Login(String),

    /// Register the given email; the password is prompted for.
    SignUp(String),

    /// Sign out.
    Logout,

    /// Show the signed-in user.
    WhoAmI,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be submitted as a query.
///
/// # Examples
///
/// ```
/// # use imali::chat::{ChatCommand, parse_command};
/// # use imali::Language;
/// assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
/// assert_eq!(parse_command("/lang zu"), Some(ChatCommand::Language(Language::Zu)));
/// assert!(parse_command("What is my revenue?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;

    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "lang" | "language" => match argument {
            Some(code) => match code.parse::<Language>() {
                Ok(language) => ChatCommand::Language(language),
                Err(err) => ChatCommand::Invalid(format!("/lang: {err}")),
            },
            None => ChatCommand::ListLanguages,
        },
        "langs" | "languages" => ChatCommand::ListLanguages,
        "health" => ChatCommand::Health,
        "history" => ChatCommand::History,
        "stats" | "status" => ChatCommand::Stats,
        "login" => match argument {
            Some(email) => ChatCommand::Login(email.to_string()),
            None => ChatCommand::Invalid("/login requires an email".to_string()),
        },
        "signup" | "register" => match argument {
            Some(email) => ChatCommand::SignUp(email.to_string()),
            None => ChatCommand::Invalid("/signup requires an email".to_string()),
        },
        "logout" => ChatCommand::Logout,
        "whoami" => ChatCommand::WhoAmI,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Commands:
  /lang <code>      Switch language (en, zu, xh, af, st)
  /langs            List languages
  /health           Check whether the model server is online
  /history          Show the conversation so far
  /stats            Show session statistics
  /login <email>    Sign in (demo only)
  /signup <email>   Register (demo only)
  /logout           Sign out
  /whoami           Show the signed-in user
  /help, /?         Show this help
  /quit, /exit, /q  Exit"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_text_is_not_a_command() {
        assert_eq!(parse_command("hello"), None);
        assert_eq!(parse_command("  what about /lang?"), None);
    }

    #[test]
    fn language_commands() {
        assert_eq!(
            parse_command("/lang AF"),
            Some(ChatCommand::Language(Language::Af))
        );
        assert_eq!(parse_command("/lang"), Some(ChatCommand::ListLanguages));
        assert_eq!(parse_command("/langs"), Some(ChatCommand::ListLanguages));
        assert_eq!(
            parse_command("/lang fr"),
            Some(ChatCommand::Invalid("/lang: Unknown language: fr".to_string()))
        );
    }

    #[test]
    fn auth_commands() {
        assert_eq!(
            parse_command("/login  ops@example.com "),
            Some(ChatCommand::Login("ops@example.com".to_string()))
        );
        assert_eq!(
            parse_command("/register a@b.co"),
            Some(ChatCommand::SignUp("a@b.co".to_string()))
        );
        assert!(matches!(
            parse_command("/login"),
            Some(ChatCommand::Invalid(_))
        ));
        assert_eq!(parse_command("/logout"), Some(ChatCommand::Logout));
        assert_eq!(parse_command("/whoami"), Some(ChatCommand::WhoAmI));
    }

    #[test]
    fn misc_commands() {
        assert_eq!(parse_command("/HELP"), Some(ChatCommand::Help));
        assert_eq!(parse_command("/?"), Some(ChatCommand::Help));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/health"), Some(ChatCommand::Health));
        assert_eq!(parse_command("/history"), Some(ChatCommand::History));
        assert_eq!(parse_command("/status"), Some(ChatCommand::Stats));
        assert_eq!(
            parse_command("/bogus"),
            Some(ChatCommand::Invalid("Unknown command: /bogus".to_string()))
        );
    }

    #[test]
    fn help_mentions_every_command() {
        let help = help_text();
        for command in ["/lang", "/health", "/history", "/stats", "/login", "/signup", "/quit"] {
            assert!(help.contains(command), "{command}");
        }
    }
}
