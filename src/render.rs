//! Output rendering for the chat client.
//!
//! The renderer is the thin view layer over a session's transcript: it prints
//! messages, the typing indicator, and diagnostics.  It never decides what is
//! shown; the session does.

use std::io::{self, Stdout, Write};

use crate::types::{Message, Sender};
use crate::utils::time::clock;

/// ANSI escape code for dim text (used for the typing indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for italic text (used for the typing indicator).
const ANSI_ITALIC: &str = "\x1b[3m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the user label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for green text (used for the bot label).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code for magenta text (used for strategy annotations).
const ANSI_MAGENTA: &str = "\x1b[35m";

/// Display name of the assistant.
const BOT_NAME: &str = "Imali-Bot";

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
pub trait Renderer: Send {
    /// Print one transcript message.
    fn print_message(&mut self, message: &Message);

    /// Print the indicator shown while a reply is pending.
    fn print_typing(&mut self, text: &str);

    /// Print the playbook strategies a reply was based on.
    fn print_strategies(&mut self, strategies: &[String]);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer<W: Write + Send = Stdout> {
    out: W,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer on stdout with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer on stdout with the specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self::with_writer(io::stdout(), use_color)
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> PlainTextRenderer<W> {
    /// Creates a renderer that writes to `out`.
    pub fn with_writer(out: W, use_color: bool) -> Self {
        Self { out, use_color }
    }

    /// Consumes the renderer and returns its writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn styled(&self, style: &str, text: &str) -> String {
        if self.use_color {
            format!("{style}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }

    // Terminal write failures are not actionable for a REPL; drop them.
    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }
}

impl<W: Write + Send> Renderer for PlainTextRenderer<W> {
    fn print_message(&mut self, message: &Message) {
        let label = match message.sender {
            Sender::User => self.styled(ANSI_CYAN, "You"),
            Sender::Bot => self.styled(ANSI_GREEN, BOT_NAME),
        };
        let line = format!("[{}] {}: {}", clock(message.sent_at), label, message.text);
        self.line(&line);
    }

    fn print_typing(&mut self, text: &str) {
        let line = self.styled(&format!("{ANSI_DIM}{ANSI_ITALIC}"), text);
        self.line(&line);
    }

    fn print_strategies(&mut self, strategies: &[String]) {
        if strategies.is_empty() {
            return;
        }
        let line = self.styled(
            ANSI_MAGENTA,
            &format!("  strategies: {}", strategies.join(", ")),
        );
        self.line(&line);
    }

    fn print_error(&mut self, error: &str) {
        let line = self.styled(ANSI_RED, &format!("Error: {error}"));
        self.line(&line);
    }

    fn print_info(&mut self, info: &str) {
        let line = self.styled(ANSI_DIM, info);
        self.line(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageId;
    use time::macros::datetime;

    fn rendered(use_color: bool, f: impl FnOnce(&mut PlainTextRenderer<Vec<u8>>)) -> String {
        let mut renderer = PlainTextRenderer::with_writer(Vec::new(), use_color);
        f(&mut renderer);
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn plain_messages() {
        let mut user = Message::user(MessageId::new(2), "What is my revenue?");
        user.sent_at = datetime!(2024-03-01 09:30:00 UTC);
        let mut bot = Message::bot(MessageId::new(3), "R14,200 projected");
        bot.sent_at = datetime!(2024-03-01 09:30:02 UTC);
        let out = rendered(false, |r| {
            r.print_message(&user);
            r.print_message(&bot);
        });
        assert_eq!(
            out,
            "[09:30] You: What is my revenue?\n[09:30] Imali-Bot: R14,200 projected\n"
        );
    }

    #[test]
    fn colored_labels() {
        let message = Message::bot(MessageId::new(1), "hi");
        let out = rendered(true, |r| r.print_message(&message));
        assert!(out.contains("\x1b[32mImali-Bot\x1b[0m: hi"));
    }

    #[test]
    fn strategies_skipped_when_empty() {
        assert_eq!(rendered(false, |r| r.print_strategies(&[])), "");
        let out = rendered(false, |r| {
            r.print_strategies(&["- [Cash Flow]".to_string(), "- [VAT Compliance]".to_string()])
        });
        assert_eq!(out, "  strategies: - [Cash Flow], - [VAT Compliance]\n");
    }

    #[test]
    fn errors_and_info() {
        let out = rendered(false, |r| {
            r.print_error("boom");
            r.print_typing("Imali-Bot is typing...");
            r.print_info("ok");
        });
        assert_eq!(out, "Error: boom\nImali-Bot is typing...\nok\n");
    }
}
