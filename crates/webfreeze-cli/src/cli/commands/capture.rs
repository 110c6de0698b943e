//! `webfreeze capture <url>` – mirror a page and its assets to disk.

use anyhow::Result;
use std::path::Path;
use webfreeze_core::config::{Mode, RunConfig, WebfreezeConfig};
use webfreeze_core::freezer;

pub async fn run_capture(
    cfg: &WebfreezeConfig,
    url: &str,
    save_dir: Option<&Path>,
    headful: bool,
) -> Result<()> {
    let run = RunConfig::from_parts(cfg, url, Mode::Capture, save_dir, headful);
    freezer::run(&run).await?;
    println!("Captured {} into {}", url, run.save_dir.display());
    Ok(())
}
