//! Fetch primitives shared by the agent and its hosts
//!
//! Requests are resolved against the agent [`Scope`] before they reach the
//! cache or the network, so every [`RequestKey`] is an absolute URL.
//!
//! A [`Response`] owns its body exactly once: it is deliberately not `Clone`.
//! Anything that needs to both store and return a response must call
//! [`Response::duplicate`] first.

mod request;
mod response;
mod scope;

pub use request::{Destination, Method, Request};
pub use response::{Headers, Response, ResponseType};
pub use scope::{RequestKey, Scope};
