//! Fetch interception.
//!
//! Every outbound request passes through [`FetchInterceptor::handle`]. The
//! [`FetchHost`] wraps it in a channel so a host environment can deliver
//! requests as messages and await responses.

mod host;
mod interceptor;
mod request;

pub use host::{FetchEvent, FetchHandle, FetchHost, FetchHostError, DEFAULT_CHANNEL_CAPACITY};
pub use interceptor::{FetchInterceptor, Route};
pub use request::{Request, Response, ResponseSource};
