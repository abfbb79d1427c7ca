//! Cache generations and their contents
//!
//! A generation is a named set of request-key → response entries. Exactly
//! one generation is current; activation deletes every other one.
//!
//! # Entry lifecycle
//!
//! | Event | Effect |
//! |-------|--------|
//! | Install | Manifest entries stored into the new generation |
//! | Fetch (200, basic) | Response duplicate stored under the request key |
//! | Newer fetch | Entry replaced wholesale, never mutated in place |
//! | Activate | Stale generations deleted with all their entries |

pub mod entry;
pub mod manifest;

pub use entry::{CachedEntry, ResponseSnapshot};
pub use manifest::{Manifest, ManifestEntry, DEFAULT_MANIFEST};
