//! Disk layout helpers for mirrored assets.
//!
//! Downloads land in a `.part` temp file next to their final path and are
//! renamed into place once complete, so a mirrored file is either absent or
//! whole. Concurrent captures of the same path are last-writer-wins; the
//! rename is the only corruption guard.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before the atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the in-flight download: appends `.part` to the final path.
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Create the parent directory chain for `path`, if any.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Atomically rename a completed temp file to its final path.
pub fn finalize(temp_path: &Path, final_path: &Path) -> io::Result<()> {
    fs::rename(temp_path, final_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_appends_part() {
        let p = temp_path(Path::new("app.js"));
        assert_eq!(p.to_string_lossy(), "app.js.part");
        let p2 = temp_path(Path::new("/srv/frozen/static/app.js"));
        assert_eq!(p2.to_string_lossy(), "/srv/frozen/static/app.js.part");
    }

    #[test]
    fn ensure_parent_dir_creates_chain() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a/b/c/site.css");
        ensure_parent_dir(&target).unwrap();
        assert!(dir.path().join("a/b/c").is_dir());
        assert!(!target.exists());
    }

    #[test]
    fn finalize_renames_temp_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("logo.png");
        let tp = temp_path(&final_path);
        fs::write(&tp, b"png bytes").unwrap();

        finalize(&tp, &final_path).unwrap();

        assert!(!tp.exists());
        assert_eq!(fs::read(&final_path).unwrap(), b"png bytes");
    }
}
