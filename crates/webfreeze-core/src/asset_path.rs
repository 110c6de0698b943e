//! URL to local-path mapping for mirrored assets.

use std::path::{Path, PathBuf};

/// Maps a resource URL to its location under the save root.
///
/// The mapping is purely positional: only the URL's path component is used,
/// so two URLs differing only in query string or host land on the same file.
/// When the path starts with `strip_prefix` as a whole segment, that leading
/// segment is omitted and the remainder is merged directly under the root.
///
/// The mapper itself performs no traversal or collision checks; dot segments
/// only stay out of the result because URL parsing normalizes them away.
///
/// Returns `None` if the URL cannot be parsed.
pub fn local_asset_path(root: &Path, url: &str, strip_prefix: &str) -> Option<PathBuf> {
    let parsed = url::Url::parse(url).ok()?;
    let mut path = parsed.path();

    if !strip_prefix.is_empty() {
        if let Some(rest) = path.strip_prefix(strip_prefix) {
            if rest.is_empty() || rest.starts_with('/') {
                path = rest;
            }
        }
    }

    Some(root.join(path.trim_start_matches('/')))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "/_next";

    fn map(url: &str) -> PathBuf {
        local_asset_path(Path::new("/srv/frozen"), url, PREFIX).unwrap()
    }

    #[test]
    fn plain_path_lands_under_root() {
        assert_eq!(
            map("https://example.com/css/site.css"),
            PathBuf::from("/srv/frozen/css/site.css")
        );
        assert_eq!(
            map("https://example.com/logo.png"),
            PathBuf::from("/srv/frozen/logo.png")
        );
    }

    #[test]
    fn prefix_segment_is_omitted() {
        assert_eq!(
            map("https://example.com/_next/static/chunks/app.js"),
            PathBuf::from("/srv/frozen/static/chunks/app.js")
        );
        assert_eq!(map("https://example.com/_next"), PathBuf::from("/srv/frozen"));
    }

    #[test]
    fn prefix_match_respects_segment_boundary() {
        assert_eq!(
            map("https://example.com/_nextgen/app.js"),
            PathBuf::from("/srv/frozen/_nextgen/app.js")
        );
    }

    #[test]
    fn query_and_fragment_are_ignored() {
        assert_eq!(
            map("https://example.com/app.js?v=123#frag"),
            map("https://example.com/app.js")
        );
    }

    #[test]
    fn host_does_not_affect_mapping() {
        assert_eq!(
            map("https://cdn-a.example.com/app.js"),
            map("https://cdn-b.example.net/app.js")
        );
    }

    #[test]
    fn paths_without_dot_segments_stay_within_root() {
        let root = Path::new("/srv/frozen");
        for url in [
            "https://example.com/a/b/c.js",
            "https://example.com/_next/x.css",
            "https://example.com/deep/ly/nested/img.png",
            "https://example.com/",
        ] {
            let mapped = local_asset_path(root, url, PREFIX).unwrap();
            assert!(mapped.starts_with(root), "{} escaped root: {}", url, mapped.display());
        }
    }

    // The mapper joins whatever path the parser hands it; only WHATWG dot
    // segment normalization keeps `..` out of the result.
    #[test]
    fn dot_segments_are_normalized_by_url_parsing() {
        assert_eq!(
            map("https://example.com/../etc/passwd"),
            PathBuf::from("/srv/frozen/etc/passwd")
        );
        assert_eq!(
            map("https://example.com/a/../b.css"),
            PathBuf::from("/srv/frozen/b.css")
        );
    }

    #[test]
    fn unparseable_url_maps_to_none() {
        assert!(local_asset_path(Path::new("/srv/frozen"), "not a url", PREFIX).is_none());
    }

    #[test]
    fn empty_prefix_disables_stripping() {
        let mapped = local_asset_path(
            Path::new("/srv/frozen"),
            "https://example.com/_next/app.js",
            "",
        )
        .unwrap();
        assert_eq!(mapped, PathBuf::from("/srv/frozen/_next/app.js"));
    }
}
