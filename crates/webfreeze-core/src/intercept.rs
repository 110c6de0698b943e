//! Per-request interception decisions.
//!
//! One [`Decision`] per intercepted subresource request. In capture mode the
//! interceptor mirrors cacheable resources to disk as they are requested; in
//! serve mode it answers cacheable requests from the mirror and fails any
//! resource that was never captured.

use crate::asset_path::local_asset_path;
use crate::config::Mode;
use crate::fetch;
use crate::resource::ResourceKind;
use std::fs;
use std::path::{Path, PathBuf};

/// A subresource request paused by the browser.
#[derive(Debug, Clone)]
pub struct SubresourceRequest {
    pub url: String,
    pub kind: ResourceKind,
    /// Declared content type, when the request carries one.
    pub content_type: Option<String>,
}

/// Completion action for an intercepted request. Exactly one is issued per
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Let the network request proceed unmodified.
    Continue,
    /// Answer the request directly with the given response.
    Fulfill {
        status: u16,
        content_type: Option<String>,
        body: Vec<u8>,
    },
    /// Fail the request as if the network were unreachable.
    Abort,
}

/// Decides the fate of every intercepted request for one run.
///
/// `handle` is infallible: filesystem and network errors are logged and
/// folded into the per-mode fallback (capture lets the request through,
/// serve aborts it).
pub struct Interceptor {
    mode: Mode,
    save_dir: PathBuf,
    asset_prefix: String,
}

impl Interceptor {
    pub fn new(mode: Mode, save_dir: PathBuf, asset_prefix: String) -> Self {
        Self {
            mode,
            save_dir,
            asset_prefix,
        }
    }

    /// Decide how to complete `req`.
    ///
    /// File I/O and the capture download are synchronous; call from a
    /// blocking thread when driving from async code.
    pub fn handle(&self, req: &SubresourceRequest) -> Decision {
        if !req.kind.is_cacheable() {
            return Decision::Continue;
        }

        let Some(path) = local_asset_path(&self.save_dir, &req.url, &self.asset_prefix) else {
            tracing::debug!("unmappable url: {}", req.url);
            return match self.mode {
                Mode::Capture => Decision::Continue,
                Mode::Serve => Decision::Abort,
            };
        };

        match self.mode {
            Mode::Capture => self.capture(req, &path),
            Mode::Serve => self.serve(req, &path),
        }
    }

    fn capture(&self, req: &SubresourceRequest, path: &Path) -> Decision {
        if path.exists() {
            // Capture once: an existing file is never re-fetched or compared
            // against the live response.
            tracing::debug!("already mirrored: {}", path.display());
            return Decision::Continue;
        }

        match fetch::download_to_file(&req.url, path) {
            Ok(bytes) => {
                tracing::info!("downloaded {} ({} bytes) to {}", req.url, bytes, path.display());
            }
            Err(e) => {
                tracing::warn!("failed to download {}: {}", req.url, e);
            }
        }
        Decision::Continue
    }

    fn serve(&self, req: &SubresourceRequest, path: &Path) -> Decision {
        match fs::read(path) {
            Ok(body) => {
                tracing::info!("serving {} from {}", req.url, path.display());
                Decision::Fulfill {
                    status: 200,
                    content_type: req.content_type.clone(),
                    body,
                }
            }
            Err(e) => {
                tracing::info!("blocked {} ({}: {})", req.url, path.display(), e);
                Decision::Abort
            }
        }
    }
}
