//! Response model with a single-consumption body

use serde::{Deserialize, Serialize};
use std::fmt;

/// Header list in received order
pub type Headers = Vec<(String, String)>;

/// Origin classification of a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Same-origin response, fully readable
    Basic,
    /// Cross-origin response the server explicitly allowed
    Cors,
    /// Cross-origin response without permission; contents must not be trusted
    Opaque,
    /// Network-level error response
    Error,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Cors => "cors",
            Self::Opaque => "opaque",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A response whose body can be consumed once.
///
/// Not `Clone`: storing a response and handing it back to the caller
/// requires an explicit [`Response::duplicate`].
#[derive(Debug)]
pub struct Response {
    url: String,
    status: u16,
    response_type: ResponseType,
    headers: Headers,
    body: Vec<u8>,
}

impl Response {
    pub fn new(url: impl Into<String>, status: u16, response_type: ResponseType) -> Self {
        Self {
            url: url.into(),
            status,
            response_type,
            headers: vec![],
            body: vec![],
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn response_type(&self) -> ResponseType {
        self.response_type
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First header value matching `name`, case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// Status in the 200-299 range
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Only direct (same-origin), status-200 responses are worth keeping
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.response_type == ResponseType::Basic
    }

    /// Produce an independent copy, leaving `self` unconsumed
    pub fn duplicate(&self) -> Response {
        Self {
            url: self.url.clone(),
            status: self.status,
            response_type: self.response_type,
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }

    /// Consume the response, yielding its body
    pub fn bytes(self) -> Vec<u8> {
        self.body
    }

    /// Consume the response, yielding its body as text
    pub fn text(self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Consume the response, yielding every part
    pub(crate) fn into_parts(self) -> (String, u16, ResponseType, Headers, Vec<u8>) {
        (
            self.url,
            self.status,
            self.response_type,
            self.headers,
            self.body,
        )
    }
}
