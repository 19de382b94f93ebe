//! fetchstate library
//!
//! A request controller that issues an HTTP request, tracks loading/error/data
//! state, and memoizes successful GET responses in a shared cache keyed by URL.

pub mod cache;
pub mod cli;
pub mod controller;
pub mod request;
pub mod state;
pub mod transport;

pub use cache::{MemoryCache, ResponseCache};
pub use controller::RequestController;
pub use request::{RequestDescriptor, RequestOptions};
pub use state::{Phase, RequestState};
pub use transport::{HttpConfig, HttpTransport, Transport, TransportError};
