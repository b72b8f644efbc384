//! Core primitives shared by every folio crate.
//!
//! This crate holds the pieces with no opinion about the site itself:
//! environment-driven [`Settings`], the central [`Error`] taxonomy, the
//! [`slugify`] rule used by every slug-bearing entity, and a small HTTP
//! layer (owned request/response types, handler and middleware traits,
//! and a segment-matching router) on top of hyper.

pub mod config;
pub mod error;
pub mod http;
pub mod text;

pub use config::Settings;
pub use error::{Error, Result};
pub use http::{
	Handler, Middleware, MiddlewareChain, Request, RequestBuilder, Response, Route, Router, path,
	prefix,
};
pub use text::slugify;
