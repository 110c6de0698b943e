//! Cache-populating HTTP GET.
//!
//! Streams the response body into a `.part` temp file and renames it into
//! place once the transfer completes with a 2xx status. On any failure the
//! temp file is removed so the mirror never holds partial assets.

use crate::storage;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Download failure, classified so callers can log the cause.
#[derive(Debug, Error)]
pub enum FetchError {
    /// curl reported an error (timeout, connection refused, TLS, ...).
    #[error(transparent)]
    Curl(#[from] curl::Error),
    /// Response completed with a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Disk write failed (e.g. disk full, permission denied).
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
}

/// Downloads `url` into `dest`, creating parent directories as needed.
/// Returns the number of body bytes written.
///
/// Runs in the current thread; call from `spawn_blocking` if used from
/// async code.
pub fn download_to_file(url: &str, dest: &Path) -> Result<u64, FetchError> {
    storage::ensure_parent_dir(dest)?;
    let tmp = storage::temp_path(dest);

    let written = Arc::new(AtomicU64::new(0));

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(Duration::from_secs(15))?;
    easy.timeout(Duration::from_secs(60))?;

    let perform_result = {
        let mut file = File::create(&tmp)?;
        let written_cb = Arc::clone(&written);
        let tmp_display = tmp.display().to_string();
        let mut transfer = easy.transfer();
        transfer.write_function(move |data| match file.write_all(data) {
            Ok(()) => {
                written_cb.fetch_add(data.len() as u64, Ordering::Relaxed);
                Ok(data.len())
            }
            Err(e) => {
                tracing::warn!("write to {} failed: {}", tmp_display, e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };

    if let Err(e) = perform_result {
        let _ = fs::remove_file(&tmp);
        return Err(FetchError::Curl(e));
    }

    let code = match easy.response_code() {
        Ok(code) => code,
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            return Err(FetchError::Curl(e));
        }
    };
    if !(200..300).contains(&code) {
        let _ = fs::remove_file(&tmp);
        return Err(FetchError::Http(code));
    }

    storage::finalize(&tmp, dest)?;
    Ok(written.load(Ordering::Relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write as _};
    use std::net::TcpListener;
    use std::thread;

    /// One-shot loopback HTTP server; returns the base URL.
    fn serve_once(status_line: &'static str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let _ = write!(
                    stream,
                    "{}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status_line,
                    body.len()
                );
                let _ = stream.write_all(body);
            }
        });
        format!("http://{}", addr)
    }

    #[test]
    fn downloads_body_to_dest() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("assets/app.js");
        let base = serve_once("HTTP/1.1 200 OK", b"console.log(1);");

        let written = download_to_file(&format!("{base}/assets/app.js"), &dest).unwrap();

        assert_eq!(written, 15);
        assert_eq!(fs::read(&dest).unwrap(), b"console.log(1);");
        assert!(!storage::temp_path(&dest).exists());
    }

    #[test]
    fn non_2xx_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing.css");
        let base = serve_once("HTTP/1.1 404 Not Found", b"nope");

        let err = download_to_file(&format!("{base}/missing.css"), &dest).unwrap_err();

        match err {
            FetchError::Http(404) => {}
            other => panic!("expected HTTP 404, got {other}"),
        }
        assert!(!dest.exists());
        assert!(!storage::temp_path(&dest).exists());
    }

    #[test]
    fn unreachable_host_reports_curl_error() {
        // Bind then drop to get a loopback port that refuses connections.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("x.js");

        let err = download_to_file(&format!("http://127.0.0.1:{port}/x.js"), &dest).unwrap_err();

        assert!(matches!(err, FetchError::Curl(_)));
        assert!(!dest.exists());
        assert!(!storage::temp_path(&dest).exists());
    }
}
