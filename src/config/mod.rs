mod api;
mod defaults;
mod validation;

use crate::cli::Args;
use crate::session::FilesystemSessionStorage;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use api::ApiConfig;
pub use defaults::{default_list_timeout, default_request_timeout, DEFAULT_API_URL};
pub use validation::{expand_env_var_in_string, normalize_api_url};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub request_timeout: Duration,
    pub list_timeout: Duration,
    pub session_dir: PathBuf,
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = FileConfig::load()?;
        Self::from_sources(args, file_config, |key| env::var(key).ok())
    }

    /// Resolve every setting: CLI args > env vars > config file > defaults.
    pub fn from_sources(
        args: &Args,
        file_config: FileConfig,
        env_var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let api_url = args
            .api_url
            .clone()
            .or_else(|| env_var("TALABIA_API_URL"))
            .or(file_config.api.url.clone())
            .map(|url| normalize_api_url(&expand_env_var_in_string(&url)))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let request_timeout = env_var("TALABIA_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .or(file_config.api.timeout)
            .unwrap_or_else(default_request_timeout);

        let list_timeout = env_var("TALABIA_LIST_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .or(file_config.api.list_timeout)
            .unwrap_or_else(default_list_timeout);

        let session_dir = args
            .session_dir
            .clone()
            .or_else(|| env_var("TALABIA_SESSION_DIR").map(PathBuf::from))
            .or(file_config.session.dir.clone())
            .or_else(FilesystemSessionStorage::default_dir)
            .context("Could not determine a session directory; pass --session-dir")?;

        // --verbose wins; otherwise env var > config file > off
        let verbose = args.verbose
            || env_var("TALABIA_VERBOSE")
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .or(file_config.session.verbose)
                .unwrap_or(false);

        Ok(Config {
            api_url,
            request_timeout: Duration::from_secs(request_timeout),
            list_timeout: Duration::from_secs(list_timeout),
            session_dir,
            verbose,
        })
    }
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        // No config file found, return default
        Ok(FileConfig::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_yaml {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))
        }
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".talabia.yaml"),
            PathBuf::from(".talabia.yml"),
            PathBuf::from(".talabia.json"),
        ];

        if let Some(config_dir) = dirs::home_dir().map(|home| home.join(".config").join("talabia")) {
            paths.push(config_dir.join("talabia.yaml"));
            paths.push(config_dir.join("talabia.yml"));
            paths.push(config_dir.join("talabia.json"));
        }

        paths
    }
}
