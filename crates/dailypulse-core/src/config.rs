//! Configuration (`~/.config/dailypulse/config.toml`) and on-disk locations.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// XDG prefix shared by config, data, cache and state directories.
pub const APP_DIR: &str = "dailypulse";

/// Endpoint serving the `DDMMYYYY` version stamp.
pub const DEFAULT_META_URL: &str =
    "https://docs.google.com/uc?export=download&id=1-HEogHoX5A1ikijnNE2uHKyUVw4s2u1K";

/// Endpoint serving the news audio itself.
pub const DEFAULT_PAYLOAD_URL: &str =
    "https://docs.google.com/uc?export=download&id=1oKDx5BHyrEGnganYvCA4mSfmBXeHJxNr";

/// Global configuration loaded from `~/.config/dailypulse/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    /// URL of the metadata stamp file.
    pub meta_url: String,
    /// URL of the audio payload.
    pub payload_url: String,
    /// Local file name of the cached stamp.
    pub meta_file_name: String,
    /// Local file name of the cached audio.
    pub payload_file_name: String,
    /// Connect timeout for each GET, in seconds.
    pub connect_timeout_secs: u64,
    /// Maximum time without receiving data before a GET is abandoned, in seconds.
    pub read_timeout_secs: u64,
    /// Pause after publishing `Checking` so a watcher can see it, in milliseconds.
    pub checking_delay_ms: u64,
    /// Pause after a terminal status before reverting to `None`, in milliseconds.
    pub settle_delay_ms: u64,
    /// Override for the directory holding the cached stamp and audio.
    pub data_dir: Option<PathBuf>,
    /// Override for the scratch directory used while downloading.
    pub cache_dir: Option<PathBuf>,
    /// Program launched with the audio path once a file is ready (e.g. "mpv").
    pub player_command: Option<String>,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            meta_url: DEFAULT_META_URL.to_string(),
            payload_url: DEFAULT_PAYLOAD_URL.to_string(),
            meta_file_name: "DigitalDailyPulse.meta".to_string(),
            payload_file_name: "DigitalDailyPulse.mp3".to_string(),
            connect_timeout_secs: 15,
            read_timeout_secs: 15,
            checking_delay_ms: 1000,
            settle_delay_ms: 3000,
            data_dir: None,
            cache_dir: None,
            player_command: None,
        }
    }
}

impl PulseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn checking_delay(&self) -> Duration {
        Duration::from_millis(self.checking_delay_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Reject endpoints that are not http(s) and empty or nested file names.
    pub fn validate(&self) -> Result<()> {
        check_url("meta_url", &self.meta_url)?;
        check_url("payload_url", &self.payload_url)?;
        check_file_name("meta_file_name", &self.meta_file_name)?;
        check_file_name("payload_file_name", &self.payload_file_name)?;
        if self.meta_file_name == self.payload_file_name {
            anyhow::bail!("meta_file_name and payload_file_name must differ");
        }
        Ok(())
    }
}

fn check_url(field: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value).with_context(|| format!("{field}: invalid URL {value:?}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => anyhow::bail!("{field}: unsupported scheme {other:?}"),
    }
}

fn check_file_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{field} must not be empty");
    }
    if value.contains('/') || value.contains('\\') || value == "." || value == ".." {
        anyhow::bail!("{field} must be a plain file name, got {value:?}");
    }
    Ok(())
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_DIR)?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PulseConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PulseConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Load and validate a configuration file at an explicit path.
pub fn load_from_path(path: &Path) -> Result<PulseConfig> {
    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: PulseConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Where the cached files and the scratch files live.
#[derive(Debug, Clone)]
pub struct PulsePaths {
    data_dir: PathBuf,
    cache_dir: PathBuf,
    meta_file_name: String,
    payload_file_name: String,
}

impl PulsePaths {
    /// Build from explicit directories (tests, overrides).
    pub fn new(data_dir: &Path, cache_dir: &Path, cfg: &PulseConfig) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            cache_dir: cache_dir.to_path_buf(),
            meta_file_name: cfg.meta_file_name.clone(),
            payload_file_name: cfg.payload_file_name.clone(),
        }
    }

    /// Resolve directories from the config overrides, else XDG data/cache homes,
    /// and create them.
    pub fn resolve(cfg: &PulseConfig) -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_DIR)?;
        let data_dir = cfg
            .data_dir
            .clone()
            .unwrap_or_else(|| xdg_dirs.get_data_home().join(APP_DIR));
        let cache_dir = cfg
            .cache_dir
            .clone()
            .unwrap_or_else(|| xdg_dirs.get_cache_home().join(APP_DIR));
        let paths = Self::new(&data_dir, &cache_dir, cfg);
        paths.ensure_dirs()?;
        Ok(paths)
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("create data dir {}", self.data_dir.display()))?;
        fs::create_dir_all(&self.cache_dir)
            .with_context(|| format!("create cache dir {}", self.cache_dir.display()))?;
        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn meta_file(&self) -> PathBuf {
        self.data_dir.join(&self.meta_file_name)
    }

    pub fn payload_file(&self) -> PathBuf {
        self.data_dir.join(&self.payload_file_name)
    }
}
