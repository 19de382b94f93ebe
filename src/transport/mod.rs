//! Transports perform the network call behind a request controller
//!
//! The controller only needs "send this descriptor, give me a payload or an
//! error". `HttpTransport` does that over HTTP with reqwest; tests substitute
//! their own implementations.

mod http;

pub use http::{HttpConfig, HttpTransport, TransportError};

use futures::future::BoxFuture;

use crate::request::RequestDescriptor;

/// Performs a request and yields a decoded payload of type `T`
pub trait Transport<T>: Send + Sync {
    /// Error produced when the call fails; stored as-is in the request state
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends `request`, resolving to the payload or the transport's error
    fn send<'a>(&'a self, request: &'a RequestDescriptor) -> BoxFuture<'a, Result<T, Self::Error>>;
}
