//! Server configuration.
//!
//! Values come from three layers, later ones winning: built-in defaults or a
//! TOML file, the `PORT` environment variable, then command-line flags.

use derive_getters::Getters;
use derive_new::new;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Chat moderation policy for the lobby.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, new)]
pub struct ChatPolicy {
    /// Refuse a message its sender has already sent once.
    #[serde(default = "default_reject_duplicates")]
    reject_duplicates: bool,

    /// Longest accepted message, in characters, after trimming.
    #[serde(default = "default_chat_max_len")]
    max_len: usize,
}

impl Default for ChatPolicy {
    fn default() -> Self {
        Self::new(default_reject_duplicates(), default_chat_max_len())
    }
}

/// Configuration for the online relay server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    port: u16,

    /// Longest accepted nickname, in characters.
    #[serde(default = "default_max_nickname_len")]
    max_nickname_len: usize,

    /// Lobby chat policy.
    #[serde(default)]
    chat: ChatPolicy,

    /// Emoji that may be relayed in a match. Empty accepts any short symbol.
    #[serde(default = "default_emoji")]
    emoji: Vec<String>,
}

/// Longest symbol accepted when the emoji allow-list is empty.
pub const MAX_FREE_EMOJI_LEN: usize = 8;

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_nickname_len() -> usize {
    20
}

fn default_reject_duplicates() -> bool {
    true
}

fn default_chat_max_len() -> usize {
    200
}

fn default_emoji() -> Vec<String> {
    ["👍", "😀", "😮", "😢", "😡", "❤️"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_nickname_len: default_max_nickname_len(),
            chat: ChatPolicy::default(),
            emoji: default_emoji(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Loads from `path` if given, otherwise starts from defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Applies the `PORT` environment variable, as hosting platforms set it.
    #[instrument(skip(self))]
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        match std::env::var("PORT") {
            Ok(raw) => {
                self.port = raw
                    .trim()
                    .parse()
                    .map_err(|e| ConfigError::new(format!("Invalid PORT {:?}: {}", raw, e)))?;
                debug!(port = self.port, "Port taken from environment");
            }
            Err(std::env::VarError::NotPresent) => {}
            Err(e) => warn!(error = %e, "Ignoring unreadable PORT"),
        }
        Ok(self)
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Replaces the chat policy.
    pub fn with_chat(mut self, chat: ChatPolicy) -> Self {
        self.chat = chat;
        self
    }

    /// Replaces the emoji allow-list.
    pub fn with_emoji(mut self, emoji: Vec<String>) -> Self {
        self.emoji = emoji;
        self
    }

    /// `host:port` for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// True if `symbol` may be relayed as a reaction.
    pub fn allows_emoji(&self, symbol: &str) -> bool {
        if self.emoji.is_empty() {
            !symbol.is_empty() && symbol.chars().count() <= MAX_FREE_EMOJI_LEN
        } else {
            self.emoji.iter().any(|e| e == symbol)
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
