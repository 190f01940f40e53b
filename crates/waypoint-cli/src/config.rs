//! Configuration file management for waypoint.
//!
//! Provides a TOML-based config file at `~/.config/waypoint/config.toml`
//! and a resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use waypoint_core::cache::{FileStore, ResponseCache};
use waypoint_core::oracle::{CliOracle, OracleGateway};

/// Default provider binary, looked up on `$PATH`.
const DEFAULT_ORACLE_BINARY: &str = "gemini";
const DEFAULT_TIMEOUT_SECS: u64 = 180;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub oracle: OracleSection,
    #[serde(default)]
    pub cache: CacheSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OracleSection {
    /// Provider CLI binary.
    pub binary: String,
    /// Fixed leading arguments for every call.
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OracleSection {
    fn default() -> Self {
        Self {
            binary: DEFAULT_ORACLE_BINARY.to_string(),
            args: vec![],
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CacheSection {
    /// Path of the cache document. Defaults to the XDG cache dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the waypoint config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/waypoint` or
/// `~/.config/waypoint`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("waypoint");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("waypoint")
}

/// Return the path to the waypoint config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Default cache document path: `$XDG_CACHE_HOME/waypoint/oracle-cache.json`.
pub fn default_cache_file() -> PathBuf {
    let base = if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg)
    } else {
        dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."))
    };
    base.join("waypoint").join("oracle-cache.json")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file, or defaults when it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ConfigFile::default()),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("failed to read config file at {}", path.display()));
        }
    };
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;
    Ok(())
}

// -----------------------------------------------------------------------
// Resolution
// -----------------------------------------------------------------------

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct WaypointConfig {
    pub oracle_binary: String,
    pub oracle_args: Vec<String>,
    pub timeout: Duration,
    pub cache_file: PathBuf,
}

impl WaypointConfig {
    /// Resolve from the chain: CLI flag > env var > config file > default.
    pub fn resolve(binary_override: Option<&str>) -> Result<Self> {
        let file = load_config()?;
        Ok(Self::from_parts(
            binary_override,
            std::env::var("WAYPOINT_ORACLE_BIN").ok(),
            std::env::var("WAYPOINT_CACHE_FILE").ok().map(PathBuf::from),
            file,
        ))
    }

    /// Pure resolution step, separated for testing.
    fn from_parts(
        binary_override: Option<&str>,
        env_binary: Option<String>,
        env_cache_file: Option<PathBuf>,
        file: ConfigFile,
    ) -> Self {
        let oracle_binary = binary_override
            .map(str::to_string)
            .or(env_binary)
            .unwrap_or(file.oracle.binary);
        let cache_file = env_cache_file
            .or(file.cache.file)
            .unwrap_or_else(default_cache_file);

        Self {
            oracle_binary,
            oracle_args: file.oracle.args,
            timeout: Duration::from_secs(file.oracle.timeout_secs),
            cache_file,
        }
    }

    /// Build a gateway over the configured transport and cache.
    ///
    /// Sweeps the cache once, per the process-start contract.
    pub fn build_gateway(&self) -> OracleGateway {
        let oracle = CliOracle::with_binary(&self.oracle_binary, self.oracle_args.clone())
            .with_timeout(self.timeout);
        let cache = ResponseCache::new(Box::new(FileStore::open(&self.cache_file)));
        let mut gateway = OracleGateway::new(Box::new(oracle), cache);
        let swept = gateway.cache_mut().sweep();
        if swept > 0 {
            tracing::debug!(swept, "removed stale cache entries at startup");
        }
        gateway
    }

    /// The response cache alone, for cache maintenance commands.
    pub fn open_cache(&self) -> ResponseCache {
        ResponseCache::new(Box::new(FileStore::open(&self.cache_file)))
    }
}
