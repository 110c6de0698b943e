//! `webfreeze serve <url>` – render a page from a previous capture.

use anyhow::Result;
use std::path::Path;
use webfreeze_core::config::{Mode, RunConfig, WebfreezeConfig};
use webfreeze_core::freezer;

pub async fn run_serve(
    cfg: &WebfreezeConfig,
    url: &str,
    save_dir: Option<&Path>,
    headful: bool,
) -> Result<()> {
    let run = RunConfig::from_parts(cfg, url, Mode::Serve, save_dir, headful);
    freezer::run(&run).await?;
    println!("Served {} from {}", url, run.save_dir.display());
    Ok(())
}
