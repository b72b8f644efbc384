use std::sync::Arc;

use async_trait::async_trait;

use super::{Handler, Middleware, MiddlewareChain, Request, Response};
use crate::error::Result;

/// Route definition: a path pattern bound to a handler.
///
/// Patterns are matched segment by segment; a `{name}` segment captures
/// the request segment into `request.path_params`. Trailing slashes are
/// not significant. A prefix route matches everything at or below its
/// path and leaves the rest of the path to its handler.
pub struct Route {
	pub pattern: String,
	pub name: Option<String>,
	handler: Arc<dyn Handler>,
	middleware: Vec<Arc<dyn Middleware>>,
	is_prefix: bool,
}

/// Shorthand for `Route::new`
///
/// # Examples
///
/// ```
/// use folio_core::http::path;
/// # use async_trait::async_trait;
/// # use folio_core::{Handler, Request, Response, Result};
/// # struct DummyHandler;
/// # #[async_trait]
/// # impl Handler for DummyHandler {
/// #     async fn handle(&self, _req: Request) -> Result<Response> {
/// #         Ok(Response::ok())
/// #     }
/// # }
/// let route = path("/blog/", DummyHandler).with_name("blog");
/// assert_eq!(route.pattern, "/blog/");
/// ```
pub fn path<H: Handler + 'static>(pattern: impl Into<String>, handler: H) -> Route {
	Route::new(pattern, Arc::new(handler))
}

/// A route that matches its path and everything below it
pub fn prefix<H: Handler + 'static>(pattern: impl Into<String>, handler: H) -> Route {
	let mut route = Route::new(pattern, Arc::new(handler));
	route.is_prefix = true;
	route
}

impl Route {
	pub fn new(pattern: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
		Self {
			pattern: pattern.into(),
			name: None,
			handler,
			middleware: Vec::new(),
			is_prefix: false,
		}
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Attach route-level middleware, applied outermost-first
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middleware.push(middleware);
		self
	}

	/// Final handler with any route-level middleware applied
	fn build_handler(&self) -> Arc<dyn Handler> {
		if self.middleware.is_empty() {
			return self.handler.clone();
		}
		let mut chain = MiddlewareChain::new(self.handler.clone());
		for middleware in &self.middleware {
			chain.add_middleware(middleware.clone());
		}
		Arc::new(chain)
	}
}

struct CompiledRoute {
	segments: Vec<String>,
	is_prefix: bool,
	handler: Arc<dyn Handler>,
}

/// Dispatches requests to the first matching route
pub struct Router {
	routes: Vec<CompiledRoute>,
}

impl Default for Router {
	fn default() -> Self {
		Self::new()
	}
}

impl Router {
	pub fn new() -> Self {
		Self { routes: Vec::new() }
	}

	pub fn add_route(&mut self, route: Route) {
		self.routes.push(CompiledRoute {
			segments: split_segments(&route.pattern),
			is_prefix: route.is_prefix,
			handler: route.build_handler(),
		});
	}

	pub fn with_route(mut self, route: Route) -> Self {
		self.add_route(route);
		self
	}

	fn find(&self, path: &str) -> Option<(&CompiledRoute, Vec<(String, String)>)> {
		let request_segments = split_segments(path);
		for route in &self.routes {
			if let Some(params) = match_segments(&route.segments, &request_segments, route.is_prefix)
			{
				return Some((route, params));
			}
		}
		None
	}
}

#[async_trait]
impl Handler for Router {
	async fn handle(&self, mut request: Request) -> Result<Response> {
		match self.find(request.path()) {
			Some((route, params)) => {
				for (key, value) in params {
					request.set_path_param(key, value);
				}
				route.handler.handle(request).await
			}
			None => Ok(Response::not_found()),
		}
	}
}

fn split_segments(path: &str) -> Vec<String> {
	path.split('/')
		.filter(|s| !s.is_empty())
		.map(|s| s.to_string())
		.collect()
}

fn match_segments(
	pattern: &[String],
	request: &[String],
	is_prefix: bool,
) -> Option<Vec<(String, String)>> {
	if is_prefix {
		if request.len() < pattern.len() {
			return None;
		}
	} else if pattern.len() != request.len() {
		return None;
	}

	let mut params = Vec::new();
	for (expected, actual) in pattern.iter().zip(request.iter()) {
		if let Some(name) = expected
			.strip_prefix('{')
			.and_then(|rest| rest.strip_suffix('}'))
		{
			params.push((name.to_string(), actual.clone()));
		} else if expected != actual {
			return None;
		}
	}
	Some(params)
}

#[cfg(test)]
mod tests {
	use super::*;
	use hyper::Method;

	struct TagHandler;

	#[async_trait]
	impl Handler for TagHandler {
		async fn handle(&self, request: Request) -> Result<Response> {
			let slug = request.path_param("slug").unwrap_or("none").to_string();
			Ok(Response::ok().with_body(slug))
		}
	}

	struct NamedHandler(&'static str);

	#[async_trait]
	impl Handler for NamedHandler {
		async fn handle(&self, _request: Request) -> Result<Response> {
			Ok(Response::ok().with_body(self.0))
		}
	}

	async fn dispatch(router: &Router, uri: &str) -> Response {
		let request = Request::builder()
			.method(Method::GET)
			.uri(uri)
			.build()
			.unwrap();
		router.handle(request).await.unwrap()
	}

	#[tokio::test]
	async fn matches_exact_and_param_routes() {
		let router = Router::new()
			.with_route(path("/blog/", NamedHandler("blog")))
			.with_route(path("/blog/tag/{slug}/", TagHandler));

		let response = dispatch(&router, "/blog/").await;
		assert_eq!(&response.body[..], b"blog");

		let response = dispatch(&router, "/blog/tag/rust+sqlite/").await;
		assert_eq!(&response.body[..], b"rust+sqlite");
	}

	#[tokio::test]
	async fn trailing_slash_is_not_significant() {
		let router = Router::new().with_route(path("/download", NamedHandler("dl")));
		let response = dispatch(&router, "/download/").await;
		assert_eq!(&response.body[..], b"dl");
	}

	#[tokio::test]
	async fn prefix_routes_swallow_subpaths() {
		let router = Router::new().with_route(prefix("/admin", NamedHandler("admin")));
		let response = dispatch(&router, "/admin/posts/3/edit").await;
		assert_eq!(&response.body[..], b"admin");

		let response = dispatch(&router, "/administrator").await;
		assert_eq!(response.status, hyper::StatusCode::NOT_FOUND);
	}

	#[tokio::test]
	async fn unknown_path_is_404() {
		let router = Router::new().with_route(path("/", NamedHandler("index")));
		let response = dispatch(&router, "/nope").await;
		assert_eq!(response.status, hyper::StatusCode::NOT_FOUND);
	}
}
