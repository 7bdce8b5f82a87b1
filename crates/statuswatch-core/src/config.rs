//! Configuration types for the status monitor
//!
//! Every field has a default, so an empty JSON object is a valid config that
//! watches the OpenAI status page every 30 seconds.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Base URL of the status page, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Delay between the end of one cycle and the start of the next (in seconds)
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Upper bound for a single HTTP request (in seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Capacity of the lifecycle event channel
    ///
    /// When full, lifecycle events are dropped (with a warning log).
    /// Change events go through the sink and are never dropped.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,

    /// Product tagging for incident events
    #[serde(default)]
    pub products: ProductTagConfig,
}

impl MonitorConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            base_url: default_base_url(),
            poll_interval_secs: default_poll_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
            event_channel_capacity: default_event_channel_capacity(),
            products: ProductTagConfig::default(),
        }
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the poll interval
    pub fn with_poll_interval_secs(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.base_url.is_empty() {
            return Err(crate::Error::config("Base URL cannot be empty"));
        }
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "Base URL must use HTTP or HTTPS scheme. Got: {}",
                self.base_url
            )));
        }
        if self.poll_interval_secs == 0 {
            return Err(crate::Error::config("Poll interval must be > 0"));
        }
        if self.request_timeout_secs == 0 {
            return Err(crate::Error::config("Request timeout must be > 0"));
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }

        self.products.validate()?;

        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Vocabulary used to tag incidents with the products they mention
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductTagConfig {
    /// Known product names, matched case-insensitively against incident names
    #[serde(default = "default_vocabulary")]
    pub vocabulary: Vec<String>,

    /// Tag used when no product matches
    #[serde(default = "default_fallback_label")]
    pub fallback_label: String,
}

impl ProductTagConfig {
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.fallback_label.trim().is_empty() {
            return Err(crate::Error::config("Product fallback label cannot be empty"));
        }
        Ok(())
    }
}

impl Default for ProductTagConfig {
    fn default() -> Self {
        Self {
            vocabulary: default_vocabulary(),
            fallback_label: default_fallback_label(),
        }
    }
}

fn default_base_url() -> String {
    "https://status.openai.com".to_string()
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("statuswatch/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_event_channel_capacity() -> usize {
    1000
}

fn default_vocabulary() -> Vec<String> {
    [
        "Chat Completions",
        "Responses",
        "Batch",
        "Files",
        "Fine-tuning",
        "Embeddings",
        "Audio",
        "Images",
        "Realtime",
        "ChatGPT",
        "Sora",
        "Vector stores",
        "Moderation",
        "Assistants",
        "Codex",
        "Login",
        "File uploads",
        "Compliance API",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_fallback_label() -> String {
    "OpenAI Services".to_string()
}
