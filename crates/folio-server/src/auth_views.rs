//! Login and logout.

use async_trait::async_trait;
use folio_core::{Handler, Request, Response, Result};
use folio_auth::SESSION_COOKIE;
use hyper::Method;
use tracing::{info, warn};

use crate::context::AppContext;

const DEFAULT_NEXT: &str = "/admin/";

/// Where to send the user after login: the `next` parameter when it is a
/// site-local path, the admin dashboard otherwise
fn next_target(raw: Option<String>) -> String {
	match raw {
		Some(next) if next.starts_with('/') && !next.starts_with("//") => next,
		_ => DEFAULT_NEXT.to_string(),
	}
}

pub struct LoginView {
	ctx: AppContext,
}

impl LoginView {
	pub fn new(ctx: AppContext) -> Self {
		Self { ctx }
	}

	fn render(&self, next: &str, csrf_token: &str, error: Option<&str>) -> Result<Response> {
		let mut context = tera::Context::new();
		context.insert("next", next);
		context.insert("csrf_token", csrf_token);
		context.insert("error", &error);
		self.ctx.render("login.html", &context)
	}
}

#[async_trait]
impl Handler for LoginView {
	async fn handle(&self, request: Request) -> Result<Response> {
		if request.method != Method::POST {
			let next = next_target(request.query_param("next"));
			// an anonymous session carries the CSRF token for the form
			let (csrf_token, new_session) = self.ctx.auth.csrf_for(&request).await;
			let response = self.render(&next, &csrf_token, None)?;
			return Ok(match new_session {
				Some(session_id) => response.with_cookie(&format!(
					"{}={}; Path=/; HttpOnly",
					SESSION_COOKIE, session_id
				)),
				None => response,
			});
		}

		let form = request.form_data()?;
		let csrf_token = form.get("csrf_token").map(String::as_str).unwrap_or("");
		if !self.ctx.auth.verify_csrf(&request, csrf_token).await {
			warn!(path = %request.path(), "rejected login post with bad csrf token");
			return Ok(Response::forbidden().with_body("CSRF token missing or invalid"));
		}

		let next = next_target(form.get("next").cloned());
		let email = form.get("email").map(String::as_str).unwrap_or("");
		let password = form.get("password").map(String::as_str).unwrap_or("");

		match self.ctx.auth.authenticate(email, password).await? {
			Some(user) => {
				// rotate: drop the anonymous session, issue a fresh one
				if let Some(old) = request.cookie(SESSION_COOKIE) {
					self.ctx.auth.logout(&old).await;
				}
				let session_id = self.ctx.auth.login(&user).await;
				info!(user = user.id, "login");
				Ok(Response::redirect(&next).with_cookie(&format!(
					"{}={}; Path=/; HttpOnly",
					SESSION_COOKIE, session_id
				)))
			}
			None => self.render(&next, csrf_token, Some("Invalid email or password.")),
		}
	}
}

pub struct LogoutView {
	ctx: AppContext,
}

impl LogoutView {
	pub fn new(ctx: AppContext) -> Self {
		Self { ctx }
	}
}

#[async_trait]
impl Handler for LogoutView {
	async fn handle(&self, request: Request) -> Result<Response> {
		if let Some(session_id) = request.cookie(SESSION_COOKIE) {
			self.ctx.auth.logout(&session_id).await;
		}
		Ok(Response::redirect("/")
			.with_cookie(&format!("{}=; Path=/; Max-Age=0", SESSION_COOKIE)))
	}
}
