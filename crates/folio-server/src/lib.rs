//! The site itself: application context, public views, the route table
//! and the hyper serving loop. The `folio` binary in this crate wires it
//! all together.

pub mod auth_views;
pub mod context;
pub mod routes;
pub mod server;
pub mod views;

pub use context::AppContext;
pub use routes::build_router;
pub use server::HttpServer;
