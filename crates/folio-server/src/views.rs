//! Public views: the landing page with its two intake forms, the blog
//! listing and the resume download.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_core::{Error, Handler, Request, Response, Result};
use folio_db::models::NewSignup;
use folio_db::repo::{categories, posts, signups, subscribers, tags};
use hyper::Method;
use tracing::{error, warn};

use crate::context::AppContext;

/// `GET /` renders the landing page; `POST /` takes the contact form
/// (`form_type=formOne`) or the newsletter form (`form_type=formTwo`).
/// Either way the visitor lands back on the same page: intake failures
/// are logged, never shown as an error page.
pub struct IndexView {
	ctx: AppContext,
}

impl IndexView {
	pub fn new(ctx: AppContext) -> Self {
		Self { ctx }
	}

	fn render(&self) -> Result<Response> {
		self.ctx.render("index.html", &tera::Context::new())
	}

	async fn submit(&self, form: &HashMap<String, String>) {
		let optional = |name: &str| form.get(name).cloned().filter(|v| !v.is_empty());

		match form.get("form_type").map(String::as_str) {
			Some("formOne") => {
				// name/subject bind NULL when absent so the schema's
				// NOT NULL columns can reject the row; that is the only
				// validation this endpoint performs
				let new = NewSignup {
					name: form.get("name").cloned(),
					email: optional("email"),
					subject: form.get("subject").cloned(),
					timestamp: parse_timestamp(form.get("timestamp").map(String::as_str)),
					message: optional("message"),
				};
				if let Err(e) = signups::create(&self.ctx.pool, &new).await {
					error!(error = %e, "failed to record contact submission");
				}
			}
			Some("formTwo") => {
				if let Err(e) = subscribers::create(&self.ctx.pool, optional("email").as_deref()).await
				{
					error!(error = %e, "failed to record subscription");
				}
			}
			other => {
				warn!(form_type = ?other, "intake post with unknown form type");
			}
		}
	}
}

/// RFC 3339 when the browser sent one, otherwise the arrival time
fn parse_timestamp(raw: Option<&str>) -> DateTime<Utc> {
	raw.and_then(|r| DateTime::parse_from_rfc3339(r).ok())
		.map(|dt| dt.with_timezone(&Utc))
		.unwrap_or_else(Utc::now)
}

#[async_trait]
impl Handler for IndexView {
	async fn handle(&self, request: Request) -> Result<Response> {
		if request.method == Method::POST {
			match request.form_data() {
				Ok(form) => self.submit(&form).await,
				Err(e) => warn!(error = %e, "unreadable intake form body"),
			}
		}
		self.render()
	}
}

/// `GET /blog/` lists every post together with the category and tag
/// vocabulary for the topbar.
pub struct BlogView {
	ctx: AppContext,
}

impl BlogView {
	pub fn new(ctx: AppContext) -> Self {
		Self { ctx }
	}
}

#[async_trait]
impl Handler for BlogView {
	async fn handle(&self, _request: Request) -> Result<Response> {
		let posts = posts::list(&self.ctx.pool).await?;
		let categories = categories::list(&self.ctx.pool).await?;
		let tags = tags::list(&self.ctx.pool).await?;

		let mut context = tera::Context::new();
		context.insert("posts", &posts);
		context.insert("categories", &categories);
		context.insert("tags", &tags);
		self.ctx.render("blog/blog-topbar.html", &context)
	}
}

/// `GET /download` streams the configured resume file as an attachment.
pub struct DownloadView {
	ctx: AppContext,
}

impl DownloadView {
	pub fn new(ctx: AppContext) -> Self {
		Self { ctx }
	}
}

#[async_trait]
impl Handler for DownloadView {
	async fn handle(&self, _request: Request) -> Result<Response> {
		let path = &self.ctx.settings.resume_path;
		let bytes = tokio::fs::read(path).await.map_err(|e| {
			if e.kind() == std::io::ErrorKind::NotFound {
				Error::NotFound("resume".to_string())
			} else {
				Error::Io(e)
			}
		})?;
		let filename = path
			.file_name()
			.and_then(|n| n.to_str())
			.unwrap_or("resume.pdf");
		Ok(Response::ok()
			.with_header("content-type", "application/octet-stream")
			.with_body(bytes)
			.as_attachment(filename))
	}
}
