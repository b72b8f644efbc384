//! Role-gating middleware for the admin surface.

use std::sync::Arc;

use async_trait::async_trait;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::debug;

use folio_core::{Handler, Middleware, Request, Response, Result};

use crate::service::AuthService;

/// Redirects to the login page unless the session user holds a role.
///
/// Anonymous users and users without the role are both sent to
/// `/login?next=<original url>` so they land back where they started
/// after signing in.
pub struct RoleGuard {
	auth: Arc<AuthService>,
	role: String,
}

impl RoleGuard {
	pub fn new(auth: Arc<AuthService>, role: impl Into<String>) -> Self {
		Self {
			auth,
			role: role.into(),
		}
	}

	fn login_redirect(&self, request: &Request) -> Response {
		let next = request.path_and_query();
		let encoded = utf8_percent_encode(&next, NON_ALPHANUMERIC).to_string();
		Response::redirect(&format!("/login?next={}", encoded))
	}
}

#[async_trait]
impl Middleware for RoleGuard {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let user = match self.auth.current_user(&request).await? {
			Some(user) => user,
			None => {
				debug!(path = %request.path(), "anonymous request to gated route");
				return Ok(self.login_redirect(&request));
			}
		};
		if !self.auth.has_role(user.id, &self.role).await? {
			debug!(user = user.id, role = %self.role, "user lacks required role");
			return Ok(self.login_redirect(&request));
		}
		next.handle(request).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use folio_core::MiddlewareChain;
	use hyper::{Method, StatusCode};

	use crate::sessions::SESSION_COOKIE;

	struct OkHandler;

	#[async_trait]
	impl Handler for OkHandler {
		async fn handle(&self, _request: Request) -> Result<Response> {
			Ok(Response::ok().with_body("admin page"))
		}
	}

	async fn guarded_chain() -> (Arc<AuthService>, MiddlewareChain) {
		let pool = folio_db::connect_in_memory().await.unwrap();
		let auth = Arc::new(AuthService::new(pool));
		let chain = MiddlewareChain::new(Arc::new(OkHandler))
			.with_middleware(Arc::new(RoleGuard::new(auth.clone(), "admin")));
		(auth, chain)
	}

	#[tokio::test]
	async fn anonymous_requests_redirect_to_login_with_next() {
		let (_auth, chain) = guarded_chain().await;
		let request = Request::builder()
			.method(Method::GET)
			.uri("/admin/posts/?page=2")
			.build()
			.unwrap();

		let response = chain.handle(request).await.unwrap();
		assert_eq!(response.status, StatusCode::FOUND);
		assert_eq!(
			response.header("location"),
			Some("/login?next=%2Fadmin%2Fposts%2F%3Fpage%3D2")
		);
	}

	#[tokio::test]
	async fn users_without_the_role_are_redirected_too() {
		let (auth, chain) = guarded_chain().await;
		let user = auth
			.create_user("reader@example.com", "pw", true)
			.await
			.unwrap();
		let session_id = auth.login(&user).await;

		let request = Request::builder()
			.uri("/admin/")
			.header("cookie", &format!("{}={}", SESSION_COOKIE, session_id))
			.build()
			.unwrap();
		let response = chain.handle(request).await.unwrap();
		assert_eq!(response.status, StatusCode::FOUND);
	}

	#[tokio::test]
	async fn role_holders_pass_through() {
		let (auth, chain) = guarded_chain().await;
		let user = auth.create_admin("root@example.com", "pw").await.unwrap();
		let session_id = auth.login(&user).await;

		let request = Request::builder()
			.uri("/admin/")
			.header("cookie", &format!("{}={}", SESSION_COOKIE, session_id))
			.build()
			.unwrap();
		let response = chain.handle(request).await.unwrap();
		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(&response.body[..], b"admin page");
	}
}
