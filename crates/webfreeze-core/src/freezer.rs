//! One capture or serve run, end to end.

use crate::browser::BrowserSession;
use crate::config::RunConfig;
use crate::intercept::Interceptor;
use anyhow::{Context, Result};
use std::fs;
use std::sync::Arc;

/// Drive the browser through one run: intercept subresource requests per the
/// configured mode, navigate to the target page, and save its rendered
/// markup as `index.html` under the save directory.
///
/// Per-request failures never surface here; launch and navigation failures
/// do, and abort the run.
pub async fn run(cfg: &RunConfig) -> Result<()> {
    fs::create_dir_all(&cfg.save_dir).with_context(|| {
        format!("failed to create save directory: {}", cfg.save_dir.display())
    })?;

    let session = BrowserSession::launch(cfg.headless).await?;

    let interceptor = Arc::new(Interceptor::new(
        cfg.mode,
        cfg.save_dir.clone(),
        cfg.asset_prefix.clone(),
    ));
    let _interception = session.install_interceptor(interceptor).await?;

    tracing::info!("navigating to {} ({:?} mode)", cfg.site_url, cfg.mode);
    session.navigate(&cfg.site_url, cfg.navigation_timeout).await?;

    let html = session.content().await?;
    let html_path = cfg.save_dir.join("index.html");
    fs::write(&html_path, html)
        .with_context(|| format!("failed to write {}", html_path.display()))?;
    tracing::info!("saved page markup to {}", html_path.display());

    session.close().await?;
    Ok(())
}
