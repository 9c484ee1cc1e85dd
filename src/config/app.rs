//! Application-level configuration.

use serde::Deserialize;

/// Process-wide settings read by the binary at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Name reported in the startup log line; must not be empty.
    pub name: String,
    /// Deployment label reported next to the name. Not interpreted otherwise.
    #[serde(default = "default_env")]
    pub env: String,
    /// Default tracing level ("trace" to "error"). `RUST_LOG` takes
    /// precedence; unknown values fall back to "info".
    pub log_level: Option<String>,
}

fn default_env() -> String {
    "development".to_string()
}
