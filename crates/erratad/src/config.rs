//! Daemon configuration
//!
//! TOML file plus environment overrides. Exactly one transport is
//! selected per process; both bindings are never active together.

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

/// Which transport binding this process runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Streaming binding: SSE sessions over HTTP, many callers
    Sse,
    /// Pipe binding: JSON Lines on stdin/stdout, one caller
    Stdio,
}

impl FromStr for Transport {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sse" => Ok(Transport::Sse),
            "stdio" => Ok(Transport::Stdio),
            other => anyhow::bail!("unknown transport '{other}' (expected 'sse' or 'stdio')"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub transport: Transport,
    /// Listen port for the streaming binding; ignored for stdio
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::Sse,
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the Errata Tool API
    pub url: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "https://errata.example.com".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Ticket file maintained by operator tooling; read fresh on
    /// every credential check.
    pub ticket_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            ticket_path: "/run/errata/ticket.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub auth: AuthConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `ERRATA_TRANSPORT` / `ERRATA_PORT` overrides.
    ///
    /// Takes the raw values rather than reading the environment so
    /// the override logic stays deterministic under test.
    pub fn apply_overrides(
        &mut self,
        transport: Option<String>,
        port: Option<String>,
    ) -> anyhow::Result<()> {
        if let Some(transport) = transport {
            self.server.transport = transport.parse()?;
        }
        if let Some(port) = port {
            self.server.port = port
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid port '{port}'"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_select_streaming_binding() {
        let config = Config::default();
        assert_eq!(config.server.transport, Transport::Sse);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.backend.timeout_secs, 30);
    }

    #[test]
    fn parses_partial_file() {
        let config: Config = toml::from_str(
            r#"
            [server]
            transport = "stdio"

            [backend]
            url = "https://errata.internal.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.transport, Transport::Stdio);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.backend.url, "https://errata.internal.example.com");
        assert_eq!(config.auth.ticket_path, "/run/errata/ticket.json");
    }

    #[test]
    fn env_overrides_win() {
        let mut config = Config::default();
        config
            .apply_overrides(Some("stdio".into()), Some("9001".into()))
            .unwrap();
        assert_eq!(config.server.transport, Transport::Stdio);
        assert_eq!(config.server.port, 9001);
    }

    #[test]
    fn bad_override_values_are_rejected() {
        let mut config = Config::default();
        assert!(config.apply_overrides(Some("carrier-pigeon".into()), None).is_err());
        assert!(config.apply_overrides(None, Some("not-a-port".into())).is_err());
    }
}
