//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg`, an optional YAML
//! configuration file, and the resolved [`ChatConfig`].  Command-line values
//! override the file, which overrides the defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use arrrg_derive::CommandLine;
use serde::Deserialize;

use crate::auth::{DEFAULT_AUTH_LATENCY, DemoAdmin};
use crate::chat::session::DEFAULT_FALLBACK_DELAY;
use crate::client::DEFAULT_ENDPOINT;
use crate::error::{Error, Result};
use crate::types::Language;

/// Command-line arguments for the imali-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// YAML configuration file.
    #[arrrg(optional, "YAML configuration file", "FILE")]
    pub config: Option<String>,

    /// Inference endpoint URL.
    #[arrrg(optional, "Inference endpoint (default: http://localhost:8000/predict)", "URL")]
    pub endpoint: Option<String>,

    /// Interface language code.
    #[arrrg(optional, "Language: en, zu, xh, af, st (default: en)", "LANG")]
    pub language: Option<String>,

    /// Delay before the fallback message, in milliseconds.
    #[arrrg(optional, "Delay before the offline message in ms (default: 1500)", "MS")]
    pub fallback_delay_ms: Option<u64>,

    /// Request timeout, in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: none)", "SECS")]
    pub timeout_secs: Option<u64>,

    /// Answer from the built-in script instead of the endpoint.
    #[arrrg(flag, "Answer from the built-in script (no model server)")]
    pub offline: bool,

    /// Playbook JSON file for offline answers.
    #[arrrg(optional, "Playbook JSON used in offline mode", "FILE")]
    pub playbook: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Contents of a YAML configuration file.  Every field is optional.
///
/// ```yaml
/// endpoint: http://models.internal:8000/predict
/// language: zu
/// fallback_delay_ms: 1000
/// demo_admin:
///   email: ops@example.com
///   password: change-me
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Inference endpoint URL.
    pub endpoint: Option<String>,
    /// Interface language code.
    pub language: Option<Language>,
    /// Delay before the fallback message, in milliseconds.
    pub fallback_delay_ms: Option<u64>,
    /// Request timeout, in seconds.
    pub timeout_secs: Option<u64>,
    /// Answer from the built-in script.
    pub offline: Option<bool>,
    /// Playbook JSON file.
    pub playbook: Option<PathBuf>,
    /// Use ANSI colors.
    pub color: Option<bool>,
    /// Simulated sign-in latency, in milliseconds.
    pub auth_latency_ms: Option<u64>,
    /// Credentials the demo identity provider treats as the administrator.
    pub demo_admin: Option<DemoAdmin>,
}

impl ConfigFile {
    /// Read and parse a YAML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|err| Error::io("failed to read configuration file", err))?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// the configuration file and command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Inference endpoint URL.
    pub endpoint: String,

    /// Request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,

    /// Delay before the fallback message is shown.
    pub fallback_delay: Duration,

    /// Interface language.
    pub language: Language,

    /// Answer from the built-in script instead of the endpoint.
    pub offline: bool,

    /// Playbook for offline answers; the seed playbook when `None`.
    pub playbook_path: Option<PathBuf>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Simulated latency of the demo identity provider.
    pub auth_latency: Duration,

    /// Demo administrator credentials, if any.
    pub demo_admin: Option<DemoAdmin>,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Endpoint: http://localhost:8000/predict
    /// - Timeout: none
    /// - Fallback delay: 1500 ms
    /// - Language: English
    /// - Color: enabled
    /// - Demo admin: none
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
            fallback_delay: DEFAULT_FALLBACK_DELAY,
            language: Language::En,
            offline: false,
            playbook_path: None,
            use_color: true,
            auth_latency: DEFAULT_AUTH_LATENCY,
            demo_admin: None,
        }
    }

    /// Resolve the configuration from command-line arguments, reading the
    /// configuration file they name, if any.
    pub fn resolve(args: ChatArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => ConfigFile::from_file(path)?,
            None => ConfigFile::default(),
        };
        Self::new().with_file(file)?.with_args(args)
    }

    /// Apply the values set in a configuration file.
    pub fn with_file(mut self, file: ConfigFile) -> Result<Self> {
        if let Some(endpoint) = file.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(language) = file.language {
            self.language = language;
        }
        if let Some(ms) = file.fallback_delay_ms {
            self.fallback_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout = Some(positive_timeout(secs, "timeout_secs")?);
        }
        if let Some(offline) = file.offline {
            self.offline = offline;
        }
        if file.playbook.is_some() {
            self.playbook_path = file.playbook;
        }
        if let Some(color) = file.color {
            self.use_color = color;
        }
        if let Some(ms) = file.auth_latency_ms {
            self.auth_latency = Duration::from_millis(ms);
        }
        if file.demo_admin.is_some() {
            self.demo_admin = file.demo_admin;
        }
        Ok(self)
    }

    /// Apply the values set on the command line.
    pub fn with_args(mut self, args: ChatArgs) -> Result<Self> {
        if let Some(endpoint) = args.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(language) = args.language {
            self.language = language
                .parse()
                .map_err(|err| Error::config(format!("--language: {err}")))?;
        }
        if let Some(ms) = args.fallback_delay_ms {
            self.fallback_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = args.timeout_secs {
            self.timeout = Some(positive_timeout(secs, "--timeout-secs")?);
        }
        if args.offline {
            self.offline = true;
        }
        if let Some(path) = args.playbook {
            self.playbook_path = Some(PathBuf::from(path));
        }
        if args.no_color {
            self.use_color = false;
        }
        Ok(self)
    }

    /// Sets the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the fallback delay.
    pub fn with_fallback_delay(mut self, delay: Duration) -> Self {
        self.fallback_delay = delay;
        self
    }

    /// Sets the language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Enables or disables offline mode.
    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

fn positive_timeout(secs: u64, name: &str) -> Result<Duration> {
    if secs == 0 {
        return Err(Error::config(format!("{name} must be positive")));
    }
    Ok(Duration::from_secs(secs))
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}
