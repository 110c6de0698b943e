use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Operating mode for a run: populate the local mirror from the network,
/// or answer requests from it and fail anything not mirrored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Capture,
    Serve,
}

/// Defaults loaded from `~/.config/webfreeze/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebfreezeConfig {
    /// Directory the page snapshot and its assets are stored under.
    pub save_dir: PathBuf,
    /// Leading URL path segment merged directly into the save root
    /// (e.g. `/_next/static/x.js` is stored at `<save_dir>/static/x.js`).
    pub asset_prefix: String,
    /// Upper bound on page navigation, in seconds.
    pub navigation_timeout_secs: u64,
    /// Run the browser headless. Disable to watch the page load.
    pub headless: bool,
}

impl Default for WebfreezeConfig {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from("./files"),
            asset_prefix: "/_next".to_string(),
            navigation_timeout_secs: 60,
            headless: true,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("webfreeze")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<WebfreezeConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = WebfreezeConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: WebfreezeConfig = toml::from_str(&data)?;
    Ok(cfg)
}

/// Immutable configuration for one capture or serve run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub site_url: String,
    pub save_dir: PathBuf,
    pub mode: Mode,
    pub asset_prefix: String,
    pub navigation_timeout: Duration,
    pub headless: bool,
}

impl RunConfig {
    /// Combine file-level defaults with per-invocation overrides.
    pub fn from_parts(
        cfg: &WebfreezeConfig,
        site_url: &str,
        mode: Mode,
        save_dir: Option<&Path>,
        headful: bool,
    ) -> Self {
        Self {
            site_url: site_url.to_string(),
            save_dir: save_dir.map(Path::to_path_buf).unwrap_or_else(|| cfg.save_dir.clone()),
            mode,
            asset_prefix: cfg.asset_prefix.clone(),
            navigation_timeout: Duration::from_secs(cfg.navigation_timeout_secs),
            headless: cfg.headless && !headful,
        }
    }
}
