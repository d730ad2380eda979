use anyhow::{Context, Result};
use clap::ValueEnum;
use config::{Config, File as ConfigFile};
use hive_nodes_sdk::DEFAULT_API_NODE;
use std::fmt;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "hive-nodes.toml";
/// Prefix for environment overrides (`HIVE_NODES_ACCOUNT`, `HIVE_NODES_API_NODES`, ...).
pub const ENV_PREFIX: &str = "HIVE_NODES";

const DEFAULT_ACCOUNT: &str = "flowerengine";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_config(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("unknown log format '{other}' (expected pretty or json)"),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        };
        f.write_str(value)
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub config_path: Option<PathBuf>,

    // Directory
    pub account: String,

    // Hive API
    pub api_nodes: Vec<String>,
    pub timeout_secs: u64,

    // Logging
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            account: DEFAULT_ACCOUNT.to_string(),
            api_nodes: vec![DEFAULT_API_NODE.to_string()],
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    pub fn load(config_path_override: Option<&Path>) -> Result<Self> {
        Self::load_from(config_path_override, Path::new(DEFAULT_CONFIG_FILE))
    }

    fn load_from(config_path_override: Option<&Path>, default_path: &Path) -> Result<Self> {
        let resolved_path = if let Some(path) = config_path_override {
            if !path.exists() {
                anyhow::bail!(
                    "Configuration file {} not found (specified via --config)",
                    path.display()
                );
            }
            Some(path.to_path_buf())
        } else if default_path.exists() {
            Some(default_path.to_path_buf())
        } else {
            None
        };

        let mut builder = Config::builder();

        if let Some(path) = &resolved_path {
            builder = builder.add_source(ConfigFile::from(path.as_path()));
        }

        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));

        let config = builder.build()?;
        let defaults = Self::default();

        let timeout_secs = match get_string_value(&config, &["timeout_secs", "hive.timeout_secs"]) {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("invalid timeout_secs value '{raw}'"))?,
            None => defaults.timeout_secs,
        };

        let log_format = match get_string_value(&config, &["log_format", "logging.format"]) {
            Some(raw) => LogFormat::from_config(&raw)?,
            None => defaults.log_format,
        };

        Ok(Self {
            config_path: resolved_path,
            account: get_string_value(&config, &["account", "directory.account"])
                .unwrap_or(defaults.account),
            api_nodes: get_list_value(&config, &["api_nodes", "hive.api_nodes"])
                .unwrap_or(defaults.api_nodes),
            timeout_secs,
            log_level: get_string_value(&config, &["log_level", "logging.level"])
                .unwrap_or(defaults.log_level),
            log_format,
        })
    }

    /// Layer command line flags on top of file and environment values.
    pub fn with_overrides(
        mut self,
        api_nodes: Vec<String>,
        timeout_secs: Option<u64>,
        log_level: Option<String>,
        log_format: Option<LogFormat>,
    ) -> Self {
        if !api_nodes.is_empty() {
            self.api_nodes = api_nodes;
        }
        if let Some(timeout_secs) = timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if let Some(log_level) = log_level {
            self.log_level = log_level;
        }
        if let Some(log_format) = log_format {
            self.log_format = log_format;
        }
        self
    }
}

fn get_string_value(config: &Config, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        config
            .get_string(key)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

// Accepts either a TOML array or a comma separated string (the env form).
fn get_list_value(config: &Config, keys: &[&str]) -> Option<Vec<String>> {
    keys.iter().find_map(|key| {
        let values: Vec<String> = if let Ok(array) = config.get_array(key) {
            array
                .into_iter()
                .filter_map(|value| value.into_string().ok())
                .collect()
        } else {
            config
                .get_string(key)
                .ok()?
                .split(',')
                .map(str::to_string)
                .collect()
        };

        let values: Vec<String> = values
            .into_iter()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .collect();
        (!values.is_empty()).then_some(values)
    })
}
