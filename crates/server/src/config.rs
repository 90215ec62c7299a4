//! Server configuration

use std::net::SocketAddr;

use anyhow::{Context, Result};

use crate::audio::AudioSink;
use crate::term::{ColorProfile, GlyphStyle};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tone sink opened once per connection.
    pub audio: AudioSink,
    pub glyphs: GlyphStyle,
    pub color: ColorProfile,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            audio: AudioSink::Discard,
            glyphs: GlyphStyle::HalfBlock,
            color: ColorProfile::TrueColor,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from a variable lookup; unset or unparsable values keep the
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("OVERWORLD_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = lookup("OVERWORLD_PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let audio = if lookup("OVERWORLD_AUDIO").is_some_and(|v| is_truthy(&v)) {
            AudioSink::Stderr
        } else {
            AudioSink::Discard
        };

        Self {
            host,
            port,
            audio,
            ..Self::default()
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

/// "1", "true", "yes", "on" (any case).
pub fn is_truthy(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn lookup_overrides_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("OVERWORLD_HOST", " 127.0.0.1 "),
            ("OVERWORLD_PORT", "6001"),
            ("OVERWORLD_AUDIO", "yes"),
        ]));
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:6001");
        assert_eq!(config.audio, AudioSink::Stderr);
        assert_eq!(config.glyphs, GlyphStyle::HalfBlock);
    }

    #[test]
    fn bad_values_keep_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("OVERWORLD_HOST", "  "),
            ("OVERWORLD_PORT", "http"),
            ("OVERWORLD_AUDIO", "0"),
        ]));
        assert_eq!(config, ServerConfig::default());
        assert_eq!(ServerConfig::from_lookup(lookup(&[])), ServerConfig::default());
    }

    #[test]
    fn from_env_reads_process_environment() {
        // The only test in this crate touching OVERWORLD_* variables.
        std::env::set_var("OVERWORLD_PORT", "6002");
        let config = ServerConfig::from_env();
        std::env::remove_var("OVERWORLD_PORT");
        assert_eq!(config.port, 6002);
    }

    #[test]
    fn default_listens_on_5000() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().unwrap().port(), 5000);
        assert!(!config.audio.is_enabled());
    }

    #[test]
    fn invalid_host_is_an_error() {
        let config = ServerConfig {
            host: "not an ip".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn truthy_values() {
        assert!(is_truthy("1"));
        assert!(is_truthy(" TRUE "));
        assert!(!is_truthy("0"));
        assert!(!is_truthy(""));
    }
}
