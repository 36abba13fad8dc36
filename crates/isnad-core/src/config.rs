//! Configuration for the isnad trust substrate.
//!
//! Holds the reference scoring constants so the chain, delegation and
//! policy crates don't hardcode magic numbers, and so a
//! deployment can tune them (e.g. a stricter `chain_decay`) without a
//! recompile.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reference constants governing direct and transitive trust scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustConfig {
    /// Contribution of a witness's first attestation toward a subject's score.
    pub base: f64,
    /// Geometric decay applied to each repeated attestation from the same witness.
    pub repeat_decay: f64,
    /// Per-hop multiplicative decay used by `chain_trust`.
    pub chain_decay: f64,
    /// Default BFS hop bound for `chain_trust` when the caller doesn't override it.
    pub default_max_hops: usize,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            base: 0.2,
            repeat_decay: 0.5,
            chain_decay: 0.7,
            default_max_hops: 5,
        }
    }
}

impl TrustConfig {
    /// Load configuration from a TOML file, falling back to
    /// [`TrustConfig::default`] on any read or parse error.
    #[cfg(feature = "toml-config")]
    pub fn load_with_defaults<P: AsRef<Path>>(path: Option<P>) -> Self {
        if let Some(p) = path {
            if p.as_ref().exists() {
                if let Ok(config) = Self::from_file(p) {
                    return config;
                }
            }
        }
        Self::default()
    }

    /// Load configuration from a TOML file.
    #[cfg(feature = "toml-config")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::CoreError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_published_scenarios() {
        let c = TrustConfig::default();
        assert_eq!(c.base, 0.2);
        assert_eq!(c.repeat_decay, 0.5);
        assert_eq!(c.chain_decay, 0.7);
        assert_eq!(c.default_max_hops, 5);
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn load_with_defaults_falls_back_when_missing() {
        let config = TrustConfig::load_with_defaults(Some("/nonexistent/isnad.toml"));
        assert_eq!(config, TrustConfig::default());
    }
}
