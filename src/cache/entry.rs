//! Stored response snapshots

use crate::fetch::{Headers, RequestKey, Response, ResponseType};
use chrono::{DateTime, Utc};

/// Immutable copy of a response as held by cache storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSnapshot {
    pub url: String,
    pub status: u16,
    pub response_type: ResponseType,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl ResponseSnapshot {
    /// Materialize a fresh response; the snapshot stays intact
    pub fn to_response(&self) -> Response {
        Response::new(self.url.clone(), self.status, self.response_type)
            .with_headers(self.headers.clone())
            .with_body(self.body.clone())
    }

    pub fn into_response(self) -> Response {
        Response::new(self.url, self.status, self.response_type)
            .with_headers(self.headers)
            .with_body(self.body)
    }
}

impl From<Response> for ResponseSnapshot {
    fn from(response: Response) -> Self {
        let (url, status, response_type, headers, body) = response.into_parts();
        Self {
            url,
            status,
            response_type,
            headers,
            body,
        }
    }
}

/// A (request key, response) pair owned by one generation
#[derive(Debug, Clone)]
pub struct CachedEntry {
    pub key: RequestKey,
    pub response: ResponseSnapshot,
    pub stored_at: DateTime<Utc>,
}

impl CachedEntry {
    /// Capture a response under `key`, consuming it
    pub fn new(key: RequestKey, response: Response) -> Self {
        Self {
            key,
            response: response.into(),
            stored_at: Utc::now(),
        }
    }

    pub fn into_response(self) -> Response {
        self.response.into_response()
    }
}
