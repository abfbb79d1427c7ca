//! Network access over HTTP using ureq

use super::Network;
use crate::error::{OffcacheError, OffcacheResult};
use crate::fetch::{Method, Request, Response, ResponseType, Scope};
use async_trait::async_trait;
use tracing::debug;
use ureq::ResponseExt;
use url::Url;

/// What came back from the blocking call: final URI after redirects, status,
/// headers and body
type Fetched = (String, u16, Vec<(String, String)>, Vec<u8>);

/// Network backed by a blocking ureq agent on tokio's blocking pool.
///
/// HTTP error statuses are returned as responses; only transport failures
/// (DNS, refused connection, TLS) become errors.
#[derive(Debug, Clone)]
pub struct HttpNetwork {
    agent: ureq::Agent,
    scope: Scope,
    user_agent: String,
}

impl HttpNetwork {
    pub fn new(scope: Scope, user_agent: impl Into<String>) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            scope,
            user_agent: user_agent.into(),
        }
    }

    /// URL the response was actually served from.
    ///
    /// Redirects are followed, so this can differ from the request URL.
    fn landed_url(requested: &Url, final_uri: &str) -> Url {
        Url::parse(final_uri).unwrap_or_else(|_| requested.clone())
    }

    /// Classify a response the way a browser would for this scope
    fn response_type(&self, url: &Url, allow_origin: Option<&str>) -> ResponseType {
        if self.scope.is_same_origin(url) {
            ResponseType::Basic
        } else if allow_origin.is_some() {
            ResponseType::Cors
        } else {
            ResponseType::Opaque
        }
    }
}

fn blocking_fetch(
    agent: &ureq::Agent,
    method: &Method,
    url: &str,
    user_agent: &str,
    headers: &[(String, String)],
) -> Result<Fetched, String> {
    let mut response = match method {
        Method::Get => {
            let mut builder = agent.get(url).header("User-Agent", user_agent);
            for (name, value) in headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.call()
        }
        Method::Head => {
            let mut builder = agent.head(url).header("User-Agent", user_agent);
            for (name, value) in headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.call()
        }
        other => return Err(format!("unsupported method {}", other)),
    }
    .map_err(|e| e.to_string())?;

    let final_uri = response.get_uri().to_string();
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = if matches!(method, Method::Head) {
        vec![]
    } else {
        response.body_mut().read_to_vec().map_err(|e| e.to_string())?
    };

    Ok((final_uri, status, headers, body))
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &Request) -> OffcacheResult<Response> {
        let url = self.scope.resolve(request.url())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(OffcacheError::network(
                url.as_str(),
                format!("unsupported scheme {}", url.scheme()),
            ));
        }

        debug!("{} {}", request.method(), url);

        let agent = self.agent.clone();
        let method = request.method().clone();
        let target = url.to_string();
        let user_agent = self.user_agent.clone();
        let headers = request.headers().to_vec();

        let (final_uri, status, headers, body) = tokio::task::spawn_blocking(move || {
            blocking_fetch(&agent, &method, &target, &user_agent, &headers)
        })
        .await
        .map_err(|e| OffcacheError::Internal(format!("fetch task failed: {}", e)))?
        .map_err(|reason| OffcacheError::network(url.as_str(), reason))?;

        let allow_origin = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("access-control-allow-origin"))
            .map(|(_, v)| v.as_str());
        let landed = Self::landed_url(&url, &final_uri);
        if landed != url {
            debug!("{} redirected to {}", url, landed);
        }
        let response_type = self.response_type(&landed, allow_origin);

        Ok(Response::new(landed.as_str(), status, response_type)
            .with_headers(headers)
            .with_body(body))
    }
}
