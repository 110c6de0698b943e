//! Resource classification for intercepted requests.

/// Classification the browser assigns to each outgoing request.
///
/// Variants the interceptor never treats specially are folded into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Document,
    Stylesheet,
    Script,
    Image,
    Font,
    Media,
    Xhr,
    Fetch,
    Other,
}

impl ResourceKind {
    /// Whether this kind of resource is mirrored to disk. Everything else
    /// passes through to the network untouched in both modes.
    pub fn is_cacheable(self) -> bool {
        matches!(
            self,
            ResourceKind::Stylesheet | ResourceKind::Script | ResourceKind::Image
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cacheable_set() {
        assert!(ResourceKind::Stylesheet.is_cacheable());
        assert!(ResourceKind::Script.is_cacheable());
        assert!(ResourceKind::Image.is_cacheable());
    }

    #[test]
    fn passthrough_set() {
        for kind in [
            ResourceKind::Document,
            ResourceKind::Font,
            ResourceKind::Media,
            ResourceKind::Xhr,
            ResourceKind::Fetch,
            ResourceKind::Other,
        ] {
            assert!(!kind.is_cacheable(), "{kind:?} must not be cached");
        }
    }
}
