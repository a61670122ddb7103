use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Complete scriptlink configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScriptLinkConfig {
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Callback key -> callback reference, used as the console's panel map
    #[serde(default)]
    pub callbacks: HashMap<String, String>,
}

/// Script queue configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueueConfig {
    /// Maximum queued invocations; 0 means unbounded
    #[serde(default)]
    pub capacity: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, used when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "scriptlink=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl ScriptLinkConfig {
    /// Build from env vars, falling back to defaults.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env();
        cfg
    }

    /// Override fields from SCRIPTLINK_* env vars; unparsable values are ignored.
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    /// Same overrides as [`apply_env`](Self::apply_env), read through `var`
    pub fn apply_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = var("SCRIPTLINK_QUEUE_CAPACITY") {
            if let Ok(n) = v.parse::<usize>() {
                self.queue.capacity = n;
            }
        }
        if let Some(v) = var("SCRIPTLINK_LOG_FILTER") {
            if !v.is_empty() {
                self.logging.filter = v;
            }
        }
    }
}

/// Load configuration from TOML file
pub fn load_config(path: impl AsRef<Path>) -> Result<ScriptLinkConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    let config: ScriptLinkConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
    Ok(config)
}
