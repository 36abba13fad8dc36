//! Canonical byte encoding for signed records.
//!
//! Every signed record type (`Attestation`, `RevocationEntry`, `Delegation`,
//! `KeyRotation`) needs a deterministic, domain-separated byte string to
//! sign and hash. This is frozen here, once, rather than left to each
//! record's `Serialize` impl -- field order or serializer changes must
//! never silently change what gets signed.
//!
//! The encoding is pipe-separated, ordered fields after a type tag:
//! `"<type>|field1|field2|..."`. An absent optional field is encoded as the
//! literal marker `-`, which is never a valid value for any field in this
//! scheme (every real field is either non-empty or itself pipe-escaped),
//! so it can't collide with a present-but-empty field.

use sha2::{Digest, Sha256};

/// Builds a canonical, domain-tagged byte string for a signed record.
///
/// ```
/// use isnad_core::canonical::CanonicalBuilder;
///
/// let bytes = CanonicalBuilder::new("attestation")
///     .field("subject")
///     .field("witness")
///     .optional(Some("deploy"))
///     .finish();
/// assert_eq!(bytes, b"attestation|subject|witness|deploy");
/// ```
pub struct CanonicalBuilder {
    parts: Vec<String>,
}

/// Marker used in place of an absent optional field.
pub const ABSENT: &str = "-";

impl CanonicalBuilder {
    /// Start a new canonical encoding for the given record type tag.
    pub fn new(type_tag: &str) -> Self {
        Self {
            parts: vec![escape(type_tag)],
        }
    }

    /// Append a required field.
    pub fn field(mut self, value: impl AsRef<str>) -> Self {
        self.parts.push(escape(value.as_ref()));
        self
    }

    /// Append an optional field, encoded as [`ABSENT`] when `None`.
    pub fn optional(mut self, value: Option<impl AsRef<str>>) -> Self {
        match value {
            Some(v) => self.parts.push(escape(v.as_ref())),
            None => self.parts.push(ABSENT.to_string()),
        }
        self
    }

    /// Append a required numeric field.
    pub fn number(mut self, value: impl std::fmt::Display) -> Self {
        self.parts.push(value.to_string());
        self
    }

    /// Finish and return the canonical bytes.
    pub fn finish(self) -> Vec<u8> {
        self.parts.join("|").into_bytes()
    }
}

/// Pipe and backslash are the only characters that could create ambiguity
/// in the join; escape them so a field's content can never be mistaken for
/// a field separator.
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('|', "\\|")
}

/// Hex-encoded SHA-256 digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Hex-encoded SHA-256 digest of `data`, truncated to `len` hex characters.
pub fn sha256_hex_prefix(data: &[u8], len: usize) -> String {
    let full = sha256_hex(data);
    full.chars().take(len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prop_assert_ne;

    #[test]
    fn deterministic_for_same_fields() {
        let a = CanonicalBuilder::new("x").field("a").field("b").finish();
        let b = CanonicalBuilder::new("x").field("a").field("b").finish();
        assert_eq!(a, b);
    }

    #[test]
    fn absent_marker_does_not_collide_with_empty_field() {
        let with_none = CanonicalBuilder::new("x")
            .field("a")
            .optional(None::<&str>)
            .finish();
        let with_empty = CanonicalBuilder::new("x").field("a").field("").finish();
        assert_ne!(with_none, with_empty);
    }

    #[test]
    fn type_tag_domain_separates() {
        let a = CanonicalBuilder::new("attestation").field("x").finish();
        let b = CanonicalBuilder::new("revocation").field("x").finish();
        assert_ne!(a, b);
    }

    #[test]
    fn escapes_pipe_in_field_content() {
        let a = CanonicalBuilder::new("x").field("a|b").field("c").finish();
        let b = CanonicalBuilder::new("x").field("a").field("b|c").finish();
        assert_ne!(a, b);
    }

    #[test]
    fn sha256_hex_prefix_truncates() {
        let full = sha256_hex(b"hello");
        let truncated = sha256_hex_prefix(b"hello", 16);
        assert_eq!(truncated.len(), 16);
        assert!(full.starts_with(&truncated));
    }

    proptest::proptest! {
        #[test]
        fn never_panics_on_arbitrary_field_content(a in ".*", b in ".*") {
            let bytes = CanonicalBuilder::new("x").field(&a).field(&b).finish();
            let _ = sha256_hex(&bytes);
        }

        #[test]
        fn distinct_two_field_splits_never_collide(a in "[a-z]{0,5}", b in "[a-z]{0,5}", c in "[a-z]{0,5}") {
            // "a|bc" and "ab|c" must canonicalize differently even though the
            // concatenation "abc" is the same, because escape() protects the
            // separator itself.
            let first = CanonicalBuilder::new("x").field(&a).field(format!("{b}{c}")).finish();
            let second = CanonicalBuilder::new("x").field(format!("{a}{b}")).field(&c).finish();
            if !a.is_empty() && !b.is_empty() && !c.is_empty() {
                prop_assert_ne!(first, second);
            }
        }
    }
}
