use std::sync::Arc;

use async_trait::async_trait;

use super::{Request, Response};
use crate::error::Result;

/// Anything that can turn a request into a response
#[async_trait]
pub trait Handler: Send + Sync {
	async fn handle(&self, request: Request) -> Result<Response>;
}

/// Wraps a handler; runs before and/or after it
#[async_trait]
pub trait Middleware: Send + Sync {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response>;
}

/// Composes middlewares around an inner handler.
///
/// Middlewares run in the order they were added: the first added is the
/// outermost.
pub struct MiddlewareChain {
	handler: Arc<dyn Handler>,
	middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			handler,
			middlewares: Vec::new(),
		}
	}

	pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
		self.middlewares.push(middleware);
	}

	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}
}

/// One middleware bound to the rest of the chain
struct ChainLink {
	middleware: Arc<dyn Middleware>,
	next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for ChainLink {
	async fn handle(&self, request: Request) -> Result<Response> {
		self.middleware.process(request, self.next.clone()).await
	}
}

#[async_trait]
impl Handler for MiddlewareChain {
	async fn handle(&self, request: Request) -> Result<Response> {
		let mut next = self.handler.clone();
		for middleware in self.middlewares.iter().rev() {
			next = Arc::new(ChainLink {
				middleware: middleware.clone(),
				next,
			});
		}
		next.handle(request).await
	}
}
