//! Request scope and cache key derivation

use crate::error::{OffcacheError, OffcacheResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Cache key for a request: the absolute URL with any fragment removed
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestKey(String);

impl RequestKey {
    pub fn from_url(url: &Url) -> Self {
        let mut url = url.clone();
        url.set_fragment(None);
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The URL space the agent controls.
///
/// Relative request URLs (`./index.html`) are resolved against the scope
/// base, which always ends in `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    base: Url,
}

impl Scope {
    /// Parse a scope from an absolute URL
    pub fn parse(raw: &str) -> OffcacheResult<Self> {
        let mut base = Url::parse(raw).map_err(|e| OffcacheError::InvalidScope {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        if base.cannot_be_a_base() {
            return Err(OffcacheError::InvalidScope {
                url: raw.to_string(),
                reason: "scope must be a hierarchical URL".to_string(),
            });
        }

        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.set_query(None);
        base.set_fragment(None);

        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve a possibly-relative URL against the scope
    pub fn resolve(&self, raw: &str) -> OffcacheResult<Url> {
        self.base.join(raw).map_err(|e| OffcacheError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })
    }

    /// Cache key for a possibly-relative URL
    pub fn key_for(&self, raw: &str) -> OffcacheResult<RequestKey> {
        Ok(RequestKey::from_url(&self.resolve(raw)?))
    }

    /// Whether `url` shares the scope's origin
    pub fn is_same_origin(&self, url: &Url) -> bool {
        url.origin() == self.base.origin()
    }
}
