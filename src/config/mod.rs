mod error;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigResult};

use crate::providers::GeminiOptions;

pub const APP_NAME: &str = "gemini-mcp";
pub const ENV_PREFIX: &str = "GEMINI_MCP";

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

pub fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .map(|h| h.join("Library/Application Support").join(APP_NAME))
    }

    #[cfg(target_os = "linux")]
    {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
            .map(|c| c.join(APP_NAME))
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .map(|a| a.join(APP_NAME))
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .map(|h| h.join(".config").join(APP_NAME))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
    pub description: String,
    pub gemini: GeminiOptions,
    pub max_file_size_mb: f64,
    pub max_context_files: usize,
    pub templates_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "Gemini MCP Server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description:
                "MCP server providing Gemini CLI integration for code review and analysis"
                    .to_string(),
            gemini: GeminiOptions::default(),
            max_file_size_mb: 10.0,
            max_context_files: 20,
            templates_dir: None,
        }
    }
}

impl ServerConfig {
    /// Defaults, then the TOML file, then `GEMINI_MCP_*` variables.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        Self::load_with(path, Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn load_with(path: Option<&Path>, environment: Environment) -> ConfigResult<Self> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
            }
            None => {
                if let Some(default_path) = Self::get_config_path() {
                    builder = builder.add_source(
                        File::from(default_path)
                            .format(FileFormat::Toml)
                            .required(false),
                    );
                }
            }
        }

        let config: Self = builder
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.gemini.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "gemini.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.max_file_size_mb.is_nan() || self.max_file_size_mb <= 0.0 {
            return Err(ConfigError::Invalid(
                "max_file_size_mb must be greater than zero".to_string(),
            ));
        }
        if self.gemini.binary.trim().is_empty() {
            return Err(ConfigError::Invalid("gemini.binary must not be empty".to_string()));
        }
        Ok(())
    }

    /// Applies command-line overrides on top of the loaded values.
    pub fn apply_overrides(
        &mut self,
        model: Option<String>,
        sandbox: bool,
        debug: bool,
        timeout_secs: Option<u64>,
    ) -> ConfigResult<()> {
        if let Some(model) = model {
            self.gemini.model = model;
        }
        if sandbox {
            self.gemini.sandbox = true;
        }
        if debug {
            self.gemini.debug = true;
        }
        if let Some(timeout_secs) = timeout_secs {
            self.gemini.timeout_secs = timeout_secs;
        }
        self.validate()
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
    pub fn max_file_size_bytes(&self) -> u64 {
        (self.max_file_size_mb * BYTES_PER_MB) as u64
    }

    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        get_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Writes the commented starter file to `path` or the default location.
    pub fn init_default(path: Option<&Path>) -> ConfigResult<PathBuf> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::get_config_path().ok_or(ConfigError::NoConfigDir)?,
        };

        if path.exists() {
            return Err(ConfigError::AlreadyExists(path));
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, include_str!("config.template.toml"))?;
        tracing::info!("Wrote default config to {}", path.display());
        Ok(path)
    }
}
