//! Layered application configuration.
//!
//! Merge order: defaults -> YAML file (if provided) -> environment
//! (`CALC__*`, `__` separates nesting levels) -> CLI overrides.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use calculator::CalculatorConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "CALC__";

/// Top-level configuration of the server process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub calculator: CalculatorConfig,
}

/// HTTP listener and request limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Requests still running after this long are answered with `408`.
    #[serde(default = "default_request_timeout", with = "crate::humantime_serde")]
    pub request_timeout: Duration,
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            request_timeout: default_request_timeout(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

impl ServerConfig {
    /// Parse `bind_addr` into a socket address.
    ///
    /// # Errors
    /// Returns an error if `bind_addr` is not a valid `ip:port`.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", self.bind_addr))
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_owned()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_body_limit_bytes() -> usize {
    64 * 1024
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `calculator=debug,info`.
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_owned()
}

/// CLI arguments that flow into the configuration merge.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub port: Option<u16>,
    pub verbose: u8,
}

impl AppConfig {
    /// Load configuration from defaults, the optional YAML file and the
    /// environment.
    ///
    /// # Errors
    /// Returns an error if `path` is not an existing file, or if any layer
    /// holds an invalid or unknown key.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.is_file() {
                anyhow::bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment
            .extract()
            .context("Failed to load configuration")
    }

    /// Apply CLI overrides on top of the loaded configuration.
    ///
    /// `--port` replaces the port of `server.bind_addr`, keeping its host;
    /// `-v` raises the log level (`-v` info, `-vv` debug, `-vvv` trace).
    ///
    /// # Errors
    /// Returns an error if the port override is given and `server.bind_addr`
    /// is not a valid socket address.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) -> Result<()> {
        if let Some(port) = args.port {
            let mut addr = self.server.socket_addr()?;
            addr.set_port(port);
            self.server.bind_addr = addr.to_string();
        }

        let level = match args.verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        };
        if let Some(level) = level {
            level.clone_into(&mut self.logging.level);
        }
        Ok(())
    }

    /// Render the effective configuration as YAML.
    ///
    /// # Errors
    /// Returns an error if YAML serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).context("Failed to serialize configuration to YAML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_yaml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn load(path: Option<&Path>) -> Result<AppConfig> {
        temp_env::with_vars_unset(
            [
                "CALC__SERVER__BIND_ADDR",
                "CALC__SERVER__REQUEST_TIMEOUT",
                "CALC__LOGGING__LEVEL",
            ],
            || AppConfig::load_or_default(path),
        )
    }

    #[test]
    fn defaults_without_file() {
        let cfg = load(None).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.server.bind_addr, "127.0.0.1:8080");
        assert_eq!(cfg.server.request_timeout, Duration::from_secs(30));
        assert_eq!(cfg.server.body_limit_bytes, 65536);
        assert_eq!(cfg.logging.format, LogFormat::Text);
        assert_eq!(cfg.calculator.page_title, "Calculator");
    }

    #[test]
    fn yaml_overrides_defaults() {
        let file = write_yaml(
            r#"
server:
  bind_addr: "0.0.0.0:9000"
  request_timeout: "5s"
logging:
  format: json
calculator:
  page_title: "Desk Calculator"
"#,
        );
        let cfg = load(Some(file.path())).unwrap();
        assert_eq!(cfg.server.bind_addr, "0.0.0.0:9000");
        assert_eq!(cfg.server.request_timeout, Duration::from_secs(5));
        assert_eq!(cfg.server.body_limit_bytes, 65536);
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.calculator.page_title, "Desk Calculator");
    }

    #[test]
    fn env_overrides_yaml() {
        let file = write_yaml("server:\n  bind_addr: \"0.0.0.0:9000\"\n");
        let cfg = temp_env::with_vars(
            [
                ("CALC__SERVER__BIND_ADDR", Some("127.0.0.1:7000")),
                ("CALC__LOGGING__LEVEL", Some("debug")),
            ],
            || AppConfig::load_or_default(Some(file.path())),
        )
        .unwrap();
        assert_eq!(cfg.server.bind_addr, "127.0.0.1:7000");
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_yaml("server:\n  bind_adr: \"0.0.0.0:9000\"\n");
        assert!(load(Some(file.path())).is_err());
    }

    #[test]
    fn invalid_duration_is_rejected() {
        let file = write_yaml("server:\n  request_timeout: \"eventually\"\n");
        assert!(load(Some(file.path())).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load(Some(Path::new("/definitely/not/here.yaml"))).is_err());
    }

    #[test]
    fn port_override_keeps_host() {
        let mut cfg = AppConfig::default();
        cfg.apply_cli_overrides(&CliArgs {
            port: Some(9999),
            verbose: 0,
        })
        .unwrap();
        assert_eq!(cfg.server.bind_addr, "127.0.0.1:9999");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn port_override_needs_valid_bind_addr() {
        let mut cfg = AppConfig::default();
        cfg.server.bind_addr = "localhost".to_owned();
        let res = cfg.apply_cli_overrides(&CliArgs {
            port: Some(1),
            verbose: 0,
        });
        assert!(res.is_err());
    }

    #[test]
    fn verbosity_raises_log_level() {
        for (verbose, level) in [(1, "info"), (2, "debug"), (3, "trace"), (7, "trace")] {
            let mut cfg = AppConfig::default();
            cfg.logging.level = "warn".to_owned();
            cfg.apply_cli_overrides(&CliArgs {
                port: None,
                verbose,
            })
            .unwrap();
            assert_eq!(cfg.logging.level, level);
        }
    }

    #[test]
    fn yaml_dump_round_trips() {
        let yaml = AppConfig::default().to_yaml().unwrap();
        assert!(yaml.contains("bind_addr"));
        assert!(yaml.contains("30s"));
        let file = write_yaml(&yaml);
        assert_eq!(load(Some(file.path())).unwrap(), AppConfig::default());
    }
}
