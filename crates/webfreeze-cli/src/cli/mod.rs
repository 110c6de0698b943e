//! CLI for the webfreeze page capture tool.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use webfreeze_core::config;

use commands::{run_capture, run_completions, run_serve};

/// Top-level CLI for webfreeze.
#[derive(Debug, Parser)]
#[command(name = "webfreeze")]
#[command(about = "webfreeze: capture and serve frozen snapshots of dynamic web pages", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Capture a page: mirror its stylesheets, scripts, and images to disk.
    Capture {
        /// Page URL to freeze.
        url: String,

        /// Directory to store the snapshot under (defaults to the configured
        /// save dir).
        #[arg(long, value_name = "DIR")]
        save_dir: Option<PathBuf>,

        /// Show the browser window instead of running headless.
        #[arg(long)]
        headful: bool,
    },

    /// Render a page against a previous capture, blocking any resource that
    /// was never captured.
    Serve {
        /// Page URL to render.
        url: String,

        /// Directory holding the snapshot (defaults to the configured save
        /// dir).
        #[arg(long, value_name = "DIR")]
        save_dir: Option<PathBuf>,

        /// Show the browser window instead of running headless.
        #[arg(long)]
        headful: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Capture {
                url,
                save_dir,
                headful,
            } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_capture(&cfg, &url, save_dir.as_deref(), headful).await?;
            }
            CliCommand::Serve {
                url,
                save_dir,
                headful,
            } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_serve(&cfg, &url, save_dir.as_deref(), headful).await?;
            }
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}
