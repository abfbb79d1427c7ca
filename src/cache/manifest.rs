//! Pre-cache manifest classification
//!
//! Local entries belong to the application origin and must all be cached
//! for install to succeed. Remote entries (CDN scripts and libraries) are
//! cached best-effort.

use crate::fetch::Scope;
use url::Url;

/// Resources pre-cached into every new generation
pub const DEFAULT_MANIFEST: &[&str] = &[
    "./",
    "./index.html",
    "./manifest.json",
    "./android-chrome-192x192.png",
    "./android-chrome-512x512.png",
    "https://cdn.tailwindcss.com",
    "https://unpkg.com/react@18/umd/react.production.min.js",
    "https://unpkg.com/react-dom@18/umd/react-dom.production.min.js",
    "https://unpkg.com/@babel/standalone/babel.min.js",
    "https://cdnjs.cloudflare.com/ajax/libs/pdf.js/3.11.174/pdf.min.js",
    "https://cdnjs.cloudflare.com/ajax/libs/pdf.js/3.11.174/pdf.worker.min.js",
];

/// A single manifest entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestEntry {
    /// Same-origin resource; failure aborts install
    Local(String),
    /// Cross-origin resource; failure is tolerated
    Remote(String),
}

impl ManifestEntry {
    pub fn url(&self) -> &str {
        match self {
            Self::Local(url) | Self::Remote(url) => url,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

/// Ordered pre-cache manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Classify raw entries relative to `scope`.
    ///
    /// Absolute URLs on a foreign origin are remote; relative paths and
    /// same-origin URLs are local. Order is preserved.
    pub fn classify<S: AsRef<str>>(raw: &[S], scope: &Scope) -> Self {
        let entries = raw
            .iter()
            .map(|entry| {
                let entry = entry.as_ref().to_string();
                match Url::parse(&entry) {
                    Ok(url) if !scope.is_same_origin(&url) => ManifestEntry::Remote(entry),
                    _ => ManifestEntry::Local(entry),
                }
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn local(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| !e.is_remote())
            .map(ManifestEntry::url)
    }

    pub fn remote(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.is_remote())
            .map(ManifestEntry::url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
