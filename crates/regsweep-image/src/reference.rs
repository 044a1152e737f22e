//! Digest-pinned image references.

/// An image pinned by digest within a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Fully qualified repository (e.g. `gcr.io/project/app`).
    pub repository: String,
    /// Content digest (e.g. `sha256:abc123...`).
    pub digest: String,
}

impl ImageRef {
    /// Characters of the digest shown in reports.
    pub const SHORT_DIGEST_LEN: usize = 15;

    /// Create a reference.
    pub fn new(repository: impl Into<String>, digest: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            digest: digest.into(),
        }
    }

    /// Digest prefix used in report lines (`sha256:` plus 8 hex digits).
    #[must_use]
    pub fn short_digest(&self) -> &str {
        short_digest(&self.digest)
    }
}

/// First [`ImageRef::SHORT_DIGEST_LEN`] characters of a digest.
#[must_use]
pub fn short_digest(digest: &str) -> &str {
    digest
        .char_indices()
        .nth(ImageRef::SHORT_DIGEST_LEN)
        .map_or(digest, |(idx, _)| &digest[..idx])
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.repository, self.digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_pins_digest() {
        let image = ImageRef::new("gcr.io/o1labs-192920/mina-daemon", "sha256:abcdef0123456789");
        assert_eq!(
            image.to_string(),
            "gcr.io/o1labs-192920/mina-daemon@sha256:abcdef0123456789"
        );
    }

    #[test]
    fn short_digest_prefix() {
        let image = ImageRef::new("r", "sha256:0123456789abcdef");
        assert_eq!(image.short_digest(), "sha256:01234567");
        assert_eq!(short_digest("sha256:01"), "sha256:01");
    }
}
