//! Configuration loading with layered overrides.
//!
//! Config is loaded in order (each layer overrides the previous):
//! 1. Default values
//! 2. Config file (TOML)
//! 3. Environment variables
//! 4. CLI arguments
//!
//! The listening port is taken from the first non-empty of `PORT`, `port`
//! and `<PREFIX>_PORT`, matching what container platforms inject.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Configuration shared read-only between request handlers.
pub type SharedConfig = Arc<Config>;

/// Fixture configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub fips: Fips,
    #[serde(default)]
    pub sync: Sync,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Application settings reported by the echo service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct App {
    /// Deployment environment name. `production` turns on production mode.
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            environment: default_environment(),
        }
    }
}

impl App {
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn default_environment() -> String {
    "unknown".to_string()
}

/// Where the FIPS mode flag comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FipsMode {
    /// Read the kernel flag file on every sample.
    System,
    /// Always restricted.
    Enabled,
    /// Never restricted.
    Disabled,
}

impl std::str::FromStr for FipsMode {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "system" => Ok(FipsMode::System),
            "enabled" | "on" | "1" => Ok(FipsMode::Enabled),
            "disabled" | "off" | "0" => Ok(FipsMode::Disabled),
            other => Err(Error::Config(format!(
                "Unknown FIPS mode '{other}' (expected system, enabled or disabled)"
            ))),
        }
    }
}

/// FIPS probe settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fips {
    #[serde(default = "default_fips_mode")]
    pub mode: FipsMode,
    /// Kernel flag file consulted in `system` mode.
    #[serde(default = "default_flag_path")]
    pub flag_path: PathBuf,
}

impl Default for Fips {
    fn default() -> Self {
        Self {
            mode: default_fips_mode(),
            flag_path: default_flag_path(),
        }
    }
}

fn default_fips_mode() -> FipsMode {
    FipsMode::System
}

fn default_flag_path() -> PathBuf {
    PathBuf::from("/proc/sys/crypto/fips_enabled")
}

/// File-watch runner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sync {
    /// Shell command run on change. `{pod}` is replaced with `pod`.
    #[serde(default = "default_sync_command")]
    pub command: String,
    /// Target identifier substituted into `command`.
    #[serde(default)]
    pub pod: String,
    /// Directory to watch.
    #[serde(default = "default_sync_root")]
    pub root: PathBuf,
    /// Explicit files to watch, relative to `root`. Takes precedence over
    /// `patterns` when non-empty.
    #[serde(default)]
    pub files: Vec<PathBuf>,
    /// Glob patterns relative to `root`.
    #[serde(default = "default_sync_patterns")]
    pub patterns: Vec<String>,
    /// Quiet period before running the command.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for Sync {
    fn default() -> Self {
        Self {
            command: default_sync_command(),
            pod: String::new(),
            root: default_sync_root(),
            files: Vec::new(),
            patterns: default_sync_patterns(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_sync_command() -> String {
    "oc rsync . {pod}:/opt/app-root/src".to_string()
}

fn default_sync_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_sync_patterns() -> Vec<String> {
    vec!["*.rs".to_string()]
}

fn default_debounce_ms() -> u64 {
    200
}

/// CLI overrides, applied last.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub environment: Option<String>,
    pub fips_mode: Option<FipsMode>,
    pub pod: Option<String>,
}

/// Builder for loading configuration with customizable options.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Environment variable prefix (e.g., "CANARY" -> CANARY_HOST, CANARY_PORT)
    pub env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            env_prefix: "CANARY".to_string(),
        }
    }
}

impl ConfigLoader {
    /// Create a new config loader with the given environment prefix.
    pub fn new(env_prefix: impl Into<String>) -> Self {
        Self {
            env_prefix: env_prefix.into(),
        }
    }

    /// Environment variables consulted for the port, in priority order.
    pub fn port_vars(&self) -> [String; 3] {
        [
            "PORT".to_string(),
            "port".to_string(),
            format!("{}_PORT", self.env_prefix),
        ]
    }

    /// Load configuration from file, environment, and CLI arguments.
    pub fn load(&self, config_path: Option<&Path>, cli: &Overrides) -> crate::Result<Config> {
        // Start with file config or defaults
        let mut config: Config = if let Some(path) = config_path {
            let content = std::fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;
            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?
        } else {
            Config::default()
        };

        // Override with environment variables
        let prefix = &self.env_prefix;

        if let Ok(host) = std::env::var(format!("{prefix}_HOST")) {
            config.server.host = host;
        }
        if let Some((name, port)) = self
            .port_vars()
            .into_iter()
            .find_map(|name| non_empty_var(&name).map(|v| (name, v)))
        {
            config.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("{name} is not a valid port: {port}")))?;
        }
        if let Ok(env) = std::env::var(format!("{prefix}_ENV")) {
            config.app.environment = env;
        }
        if let Ok(mode) = std::env::var(format!("{prefix}_FIPS_MODE")) {
            config.fips.mode = mode.parse()?;
        }
        if let Ok(pod) = std::env::var(format!("{prefix}_SYNC_POD")) {
            config.sync.pod = pod;
        }

        // Override with CLI arguments
        if let Some(host) = &cli.host {
            config.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            config.server.port = port;
        }
        if let Some(env) = &cli.environment {
            config.app.environment = env.clone();
        }
        if let Some(mode) = cli.fips_mode {
            config.fips.mode = mode;
        }
        if let Some(pod) = &cli.pod {
            config.sync.pod = pod.clone();
        }

        Ok(config)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
