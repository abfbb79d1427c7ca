//! Fetch interception: cache first, network second, shell on navigation failure

use super::events::Lifetime;
use super::OfflineAgent;
use crate::cache::CachedEntry;
use crate::error::OffcacheResult;
use crate::fetch::{Method, Request, RequestKey, Response};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Where a served response came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Cache,
    Network,
    /// Cached application shell substituted for a failed navigation
    ShellFallback,
}

impl fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cache => write!(f, "cache"),
            Self::Network => write!(f, "network"),
            Self::ShellFallback => write!(f, "shell-fallback"),
        }
    }
}

/// Result of intercepting a request
#[derive(Debug)]
pub enum FetchOutcome {
    /// The agent declined; the request proceeds untouched
    Passthrough,
    Respond {
        response: Response,
        source: ResponseSource,
    },
}

impl FetchOutcome {
    pub fn source(&self) -> Option<ResponseSource> {
        match self {
            Self::Passthrough => None,
            Self::Respond { source, .. } => Some(*source),
        }
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, Self::Passthrough)
    }

    pub fn into_response(self) -> Option<Response> {
        match self {
            Self::Passthrough => None,
            Self::Respond { response, .. } => Some(response),
        }
    }
}

impl OfflineAgent {
    fn is_excluded(&self, url: &Url) -> bool {
        self.config
            .excluded_schemes
            .iter()
            .any(|scheme| scheme.eq_ignore_ascii_case(url.scheme()))
    }

    /// Answer a request from the current generation, falling back to the
    /// network.
    ///
    /// A cacheable network response (status 200, basic) is duplicated: the
    /// copy is stored by a task registered on `lifetime`, the original is
    /// returned immediately.
    pub async fn handle_fetch(
        &self,
        request: Request,
        lifetime: &Lifetime,
    ) -> OffcacheResult<FetchOutcome> {
        if request.method() != &Method::Get {
            debug!("Passing through {} {}", request.method(), request.url());
            return Ok(FetchOutcome::Passthrough);
        }

        let url = self.config.scope.resolve(request.url())?;
        if self.is_excluded(&url) {
            debug!("Passing through excluded URL {}", url);
            return Ok(FetchOutcome::Passthrough);
        }

        let generation = &self.config.generation;
        let key = RequestKey::from_url(&url);

        if let Some(entry) = self.host.caches.lookup(generation, &key).await? {
            info!("Serving from cache: {}", url);
            return Ok(FetchOutcome::Respond {
                response: entry.into_response(),
                source: ResponseSource::Cache,
            });
        }

        info!("Fetching from network: {}", url);
        let request = request.with_url(url.as_str());

        match self.host.network.fetch(&request).await {
            Ok(response) => {
                if response.is_cacheable() {
                    self.store_in_background(lifetime, key, response.duplicate());
                } else {
                    debug!(
                        "Not caching {} (status {}, type {})",
                        url,
                        response.status(),
                        response.response_type()
                    );
                }
                Ok(FetchOutcome::Respond {
                    response,
                    source: ResponseSource::Network,
                })
            }
            Err(error) => {
                warn!("Network fetch failed: {}", error);

                if request.is_navigation() {
                    if let Some(shell) = self.cached_shell().await? {
                        info!("Serving app shell for {}", url);
                        return Ok(FetchOutcome::Respond {
                            response: shell,
                            source: ResponseSource::ShellFallback,
                        });
                    }
                    warn!("App shell not cached, cannot serve {} offline", url);
                }

                Err(error)
            }
        }
    }

    async fn cached_shell(&self) -> OffcacheResult<Option<Response>> {
        let key = self.config.scope.key_for(&self.config.shell_document)?;
        Ok(self
            .host
            .caches
            .lookup(&self.config.generation, &key)
            .await?
            .map(CachedEntry::into_response))
    }

    /// Store `response` under `key` without holding up the caller
    fn store_in_background(&self, lifetime: &Lifetime, key: RequestKey, response: Response) {
        let caches = Arc::clone(&self.host.caches);
        let generation = self.config.generation.clone();

        lifetime.wait_until(async move {
            let label = key.to_string();
            let stored = async {
                caches.open(&generation).await?;
                caches.put(&generation, CachedEntry::new(key, response)).await
            };
            match stored.await {
                Ok(()) => debug!("Cached {} in {}", label, generation),
                Err(e) => warn!("Failed to cache {}: {}", label, e),
            }
        });
    }
}
