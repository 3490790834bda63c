use std::{
    fmt, fs,
    net::{IpAddr, SocketAddr},
    path::Path,
    str::FromStr,
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// File looked up in the working directory when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "taskflow.toml";

/// Deployment environment the server runs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Environment {
    /// Local development.
    #[default]
    Development,
    /// Production. Internal error details are withheld from clients.
    Production,
    /// Automated tests.
    Test,
}

impl Environment {
    /// Lowercase name as it appears in config and responses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }

    /// Whether internal error messages may be shown to clients.
    #[must_use]
    pub const fn exposes_internal_errors(self) -> bool {
        !matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => bail!("unknown environment '{other}' (expected development, production or test)"),
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Server settings resolved from defaults, an optional TOML file and the environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: IpAddr,
    /// TCP port to bind.
    pub port: u16,
    /// Deployment environment.
    pub environment: Environment,
    /// Default tracing filter directive.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3001,
            environment: Environment::Development,
            log_level: "info".to_owned(),
        }
    }
}

impl ServerConfig {
    /// Resolve configuration from `path` (or [`DEFAULT_CONFIG_FILE`] when it exists)
    /// and the process environment.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or parsed, or when an
    /// override holds an invalid value.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env_with(&mut |key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML file. Missing keys fall back to defaults.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `fetch` to look variables up.
    ///
    /// # Errors
    /// Returns an error when an override cannot be parsed.
    pub fn apply_env_with(
        &mut self,
        fetch: &mut impl FnMut(&'static str) -> Option<String>,
    ) -> Result<()> {
        let mut lookup = |keys: &[&'static str]| {
            keys.iter()
                .find_map(|key| fetch(*key).filter(|value| !value.trim().is_empty()))
        };

        if let Some(host) = lookup(&["TASKFLOW_HOST"]) {
            self.host = host
                .trim()
                .parse()
                .with_context(|| format!("invalid host '{host}'"))?;
        }
        if let Some(port) = lookup(&["TASKFLOW_PORT", "PORT"]) {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("invalid port '{port}'"))?;
        }
        if let Some(environment) = lookup(&["TASKFLOW_ENV"]) {
            self.environment = environment.parse()?;
        }
        if let Some(level) = lookup(&["TASKFLOW_LOG_LEVEL", "LOG_LEVEL"]) {
            self.log_level = level.trim().to_owned();
        }
        self.validate()
    }

    /// Socket address derived from host and port.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            bail!("log_level must not be empty");
        }
        Ok(())
    }
}
