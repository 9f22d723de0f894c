//! Interactive chat client for the Imali-Bot financial assistant.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a model server on localhost:8000
//! imali-chat
//!
//! # Another endpoint, in isiZulu
//! imali-chat --endpoint http://models.internal:8000/predict --language zu
//!
//! # No model server: answer from the built-in script
//! imali-chat --offline
//!
//! # Settings from a YAML file (command-line flags win)
//! imali-chat --config imali.yaml
//! ```
//!
//! Set `RUST_LOG=imali=debug` to see the session's event log on stderr.

use std::sync::Arc;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use imali::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, SubmitOutcome, help_text, parse_command,
};
use imali::playbook::Playbook;
use imali::strings::{Text, t};
use imali::{
    DemoIdentity, IdentityProvider, InferenceClient, Language, PlainTextRenderer, Renderer,
    ScriptedTransport, TracingLogger, Transport, User,
};

type Session = ChatSession<Box<dyn Transport>>;

/// The demo identity provider is not a security boundary; input is echoed.
const PASSWORD_PROMPT: &str = "Password (demo only, shown as typed): ";

/// Main entry point for the imali-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let (args, _) = ChatArgs::from_command_line_relaxed("imali-chat [OPTIONS]");
    let config = ChatConfig::resolve(args)?;

    let (transport, client) = build_transport(&config)?;
    let session = ChatSession::from_config(transport, &config).with_logger(Arc::new(TracingLogger));
    let identity = DemoIdentity::new()
        .with_latency(config.auth_latency)
        .with_admin(config.demo_admin.clone());
    let mut user: Option<User> = None;
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut rl = DefaultEditor::new()?;
    let mut shown = 0;

    println!("Imali-Bot: {}", t(session.language(), Text::Assistant));
    match &client {
        Some(client) => println!("Endpoint: {}", client.endpoint()),
        None => println!("Offline mode: answers come from the built-in script."),
    }
    println!("Type /help for commands, /quit to exit\n");
    show_new_messages(&session, &mut renderer, &mut shown);
    renderer.print_info(t(session.language(), Text::Placeholder));

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Language(language) => {
                            session.set_language(language);
                            show_new_messages(&session, &mut renderer, &mut shown);
                        }
                        ChatCommand::ListLanguages => {
                            print_languages(session.language());
                        }
                        ChatCommand::Health => match &client {
                            Some(client) => match client.health().await {
                                Ok(health) => renderer.print_info(&format!(
                                    "Model server {} ({})",
                                    health.status, health.model
                                )),
                                Err(err) => renderer.print_error(&err.to_string()),
                            },
                            None => renderer.print_info("Offline mode: no model server in use."),
                        },
                        ChatCommand::History => {
                            for message in session.transcript() {
                                renderer.print_message(&message);
                            }
                        }
                        ChatCommand::Stats => {
                            print_stats(&session, user.as_ref());
                        }
                        ChatCommand::Login(email) => {
                            let password = match rl.readline(PASSWORD_PROMPT) {
                                Ok(password) => password,
                                Err(_) => continue,
                            };
                            match identity.sign_in(&email, &password).await {
                                Ok(signed_in) => {
                                    renderer.print_info(&format!(
                                        "Signed in as {} ({})",
                                        signed_in.email, signed_in.role
                                    ));
                                    user = Some(signed_in);
                                }
                                Err(err) => renderer.print_error(&err.to_string()),
                            }
                        }
                        ChatCommand::SignUp(email) => {
                            let password = match rl.readline(PASSWORD_PROMPT) {
                                Ok(password) => password,
                                Err(_) => continue,
                            };
                            match identity.sign_up(&email, &password).await {
                                Ok(signup) if signup.confirmation_required => {
                                    renderer.print_info(
                                        "Account created successfully! Please check your email to confirm.",
                                    );
                                }
                                Ok(signup) => {
                                    renderer.print_info(&format!(
                                        "Signed in as {}",
                                        signup.user.email
                                    ));
                                    user = Some(signup.user);
                                }
                                Err(err) => renderer.print_error(&err.to_string()),
                            }
                        }
                        ChatCommand::Logout => {
                            if let Err(err) = identity.sign_out().await {
                                renderer.print_error(&err.to_string());
                            } else if user.take().is_some() {
                                renderer.print_info(t(session.language(), Text::SignOut));
                            } else {
                                renderer.print_info("Not signed in.");
                            }
                        }
                        ChatCommand::WhoAmI => match &user {
                            Some(user) => renderer
                                .print_info(&format!("{} ({}, id {})", user.email, user.role, user.id)),
                            None => renderer.print_info(&format!(
                                "Not signed in. {}: /login <email>",
                                t(session.language(), Text::AdminAccess)
                            )),
                        },
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // The typed line is already on screen; skip echoing it back.
                renderer.print_typing(t(session.language(), Text::Typing));
                let outcome = session.submit(line).await;
                shown += 1;
                show_new_messages(&session, &mut renderer, &mut shown);
                if let SubmitOutcome::Replied {
                    strategies_used, ..
                } = &outcome
                {
                    renderer.print_strategies(strategies_used);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

/// The HTTP client is only built online, so a bad endpoint cannot block
/// offline mode.
fn build_transport(
    config: &ChatConfig,
) -> imali::Result<(Box<dyn Transport>, Option<InferenceClient>)> {
    if config.offline {
        let playbook = Playbook::load_or_seed(config.playbook_path.as_deref())?;
        return Ok((Box::new(ScriptedTransport::with_playbook(playbook)), None));
    }
    let client = InferenceClient::with_options(Some(config.endpoint.clone()), config.timeout)?;
    Ok((Box::new(client.clone()), Some(client)))
}

fn show_new_messages(session: &Session, renderer: &mut dyn Renderer, shown: &mut usize) {
    let transcript = session.transcript();
    for message in transcript.iter().skip(*shown) {
        renderer.print_message(message);
    }
    *shown = transcript.len();
}

fn print_languages(current: Language) {
    println!("    Languages:");
    for language in Language::ALL {
        let marker = if language == current { "*" } else { " " };
        println!("     {} {}  {}", marker, language.code(), language.native_name());
    }
}

fn print_stats(session: &Session, user: Option<&User>) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!(
        "      Language: {} ({})",
        stats.language.code(),
        stats.language.native_name()
    );
    println!("      Messages: {}", stats.message_count);
    println!("      Submissions: {}", stats.submissions);
    println!("      Replies: {}", stats.replies);
    println!("      Offline fallbacks: {}", stats.fallbacks);
    println!("      Ignored submissions: {}", stats.rejected);
    println!(
        "      Fallback delay: {} ms",
        session.fallback_delay().as_millis()
    );
    match user {
        Some(user) => println!("      User: {} ({})", user.email, user.role),
        None => println!("      User: (not signed in)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_ignores_endpoint() {
        let config = ChatConfig::new()
            .with_endpoint("ftp://not-a-model-server")
            .with_offline(true);
        let (_, client) = build_transport(&config).unwrap();
        assert!(client.is_none());
    }

    #[test]
    fn online_validates_endpoint() {
        let config = ChatConfig::new().with_endpoint("ftp://not-a-model-server");
        assert!(build_transport(&config).is_err());

        let config = ChatConfig::new().with_endpoint("http://127.0.0.1:8000/predict");
        let (_, client) = build_transport(&config).unwrap();
        assert_eq!(
            client.unwrap().endpoint().as_str(),
            "http://127.0.0.1:8000/predict"
        );
    }

    #[test]
    fn password_prompt_warns_about_echo() {
        assert!(PASSWORD_PROMPT.contains("shown as typed"));
    }
}
