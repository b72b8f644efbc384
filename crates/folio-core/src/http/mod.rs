//! Minimal HTTP layer over hyper.
//!
//! Owned [`Request`]/[`Response`] types, the [`Handler`] and
//! [`Middleware`] traits with a [`MiddlewareChain`], and a
//! segment-matching [`Router`] with `{param}` patterns.

mod handler;
mod request;
mod response;
mod router;

pub use handler::{Handler, Middleware, MiddlewareChain};
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use router::{Route, Router, path, prefix};
