use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    /// Base path for resolving relative paths (set during loading)
    #[serde(skip)]
    base_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size_mb: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the signature slot file.
    pub path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
                max_request_size_mb: 10,
            },
            storage: StorageConfig {
                path: PathBuf::from("./signatures"),
            },
            base_path: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Try multiple config file locations in order of preference
        let config_candidates = [
            // 1. Current directory (when running from crates/service/)
            ("config/default", Some(".")),
            // 2. Workspace root (when running from project root)
            ("crates/service/config/default", Some("crates/service")),
        ];

        let mut builder = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000_i64)?
            .set_default("server.max_request_size_mb", 10_i64)?
            .set_default("storage.path", "./signatures")?;
        let mut base_path: Option<PathBuf> = None;

        // Check for environment variable override first
        if let Ok(config_path) = std::env::var("SIGNET_SERVICE_CONFIG") {
            if !config_path.is_empty() {
                let config_file = format!("{}.toml", config_path);
                if Path::new(&config_file).exists() {
                    builder = builder.add_source(config::File::with_name(&config_path));
                    // Use parent directory of the config directory as base
                    base_path = Path::new(&config_file)
                        .parent()
                        .and_then(|p| p.parent())
                        .map(|p| p.to_path_buf());
                }
            }
        }

        // If no env override found a config, try the candidates
        if base_path.is_none() {
            for (path, base) in &config_candidates {
                let config_file = format!("{}.toml", path);
                if Path::new(&config_file).exists() {
                    builder = builder.add_source(config::File::with_name(path));
                    base_path = base.map(PathBuf::from);
                    break;
                }
            }
        }

        // Always layer environment variables on top
        builder =
            builder.add_source(config::Environment::with_prefix("SIGNET_SERVICE").separator("__"));

        let mut config: Config = builder.build()?.try_deserialize()?;
        config.base_path = base_path;
        config.resolve_paths();

        Ok(config)
    }

    /// Maximum accepted request body in bytes.
    pub fn body_limit(&self) -> usize {
        self.server.max_request_size_mb.saturating_mul(1024 * 1024)
    }

    /// Resolve relative paths in the config based on the base path
    fn resolve_paths(&mut self) {
        if let Some(ref base) = self.base_path {
            if self.storage.path.is_relative() {
                let storage_path = self
                    .storage
                    .path
                    .strip_prefix("./")
                    .unwrap_or(&self.storage.path);
                self.storage.path = base.join(storage_path);
            }
        }
    }
}
