//! The `/admin` request handler.
//!
//! Routes `/admin/{entity}[/new | /{id}/edit | /{id}/delete]` to the
//! registered [`ModelAdmin`] implementations. Uniqueness violations from
//! a save re-render the form with a message instead of surfacing as an
//! error page. Access control is not handled here; the site is expected
//! to be mounted behind a role-gating middleware. Every POST must carry
//! the session's CSRF token as a `csrf_token` field or it is refused.

use std::sync::Arc;

use async_trait::async_trait;
use folio_auth::AuthService;
use folio_core::{Error, Handler, Request, Response, Result};
use hyper::Method;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use sqlx::SqlitePool;
use tera::Tera;
use tracing::{info, warn};

use crate::entities::{
	CategoryAdmin, PhotoAdmin, PostAdmin, SignupAdmin, SubscriberAdmin, TagAdmin,
};
use crate::forms::{FormData, refill};
use crate::media::MediaStorage;
use crate::model::ModelAdmin;

pub struct AdminSite {
	pool: SqlitePool,
	templates: Arc<Tera>,
	storage: MediaStorage,
	auth: Arc<AuthService>,
	models: Vec<Arc<dyn ModelAdmin>>,
}

impl AdminSite {
	pub fn new(
		pool: SqlitePool,
		templates: Arc<Tera>,
		storage: MediaStorage,
		auth: Arc<AuthService>,
	) -> Self {
		Self {
			pool,
			templates,
			storage,
			auth,
			models: vec![
				Arc::new(PostAdmin),
				Arc::new(CategoryAdmin),
				Arc::new(TagAdmin),
				Arc::new(PhotoAdmin),
				Arc::new(SignupAdmin),
				Arc::new(SubscriberAdmin),
			],
		}
	}

	fn model(&self, slug: &str) -> Option<&Arc<dyn ModelAdmin>> {
		self.models.iter().find(|m| m.slug() == slug)
	}

	fn render(&self, template: &str, context: &tera::Context) -> Result<Response> {
		let html = self.templates.render(template, context)?;
		Ok(Response::ok().with_html(html))
	}

	fn list_url(slug: &str, notice: Option<&str>) -> String {
		match notice {
			Some(notice) => format!(
				"/admin/{}/?notice={}",
				slug,
				utf8_percent_encode(notice, NON_ALPHANUMERIC)
			),
			None => format!("/admin/{}/", slug),
		}
	}

	async fn dashboard(&self) -> Result<Response> {
		let mut entries = Vec::new();
		for model in &self.models {
			entries.push(serde_json::json!({
				"slug": model.slug(),
				"title": model.title(),
				"append_only": model.append_only(),
			}));
		}
		let mut context = tera::Context::new();
		context.insert("models", &entries);
		self.render("admin/index.html", &context)
	}

	async fn list(&self, model: &Arc<dyn ModelAdmin>, request: &Request) -> Result<Response> {
		let rows = model.rows(&self.pool).await?;
		let mut context = tera::Context::new();
		context.insert("title", model.title());
		context.insert("slug", model.slug());
		context.insert("columns", model.columns());
		context.insert("rows", &rows);
		context.insert("append_only", &model.append_only());
		context.insert("notice", &request.query_param("notice"));
		self.render("admin/list.html", &context)
	}

	fn form_page(
		&self,
		model: &Arc<dyn ModelAdmin>,
		fields: &[crate::forms::FormField],
		action: &str,
		csrf_token: &str,
		error: Option<String>,
	) -> Result<Response> {
		let mut context = tera::Context::new();
		context.insert("title", model.title());
		context.insert("slug", model.slug());
		context.insert("fields", fields);
		context.insert("action", action);
		context.insert("csrf_token", csrf_token);
		context.insert("error", &error);
		self.render("admin/form.html", &context)
	}

	/// The session's CSRF token; behind the role gate a session always
	/// exists, so this never has a cookie to hand back
	async fn csrf_token(&self, request: &Request) -> String {
		self.auth.csrf_for(request).await.0
	}

	/// Shared by create and edit: check the CSRF token, run the save,
	/// turn a uniqueness violation into a re-rendered form, flash any
	/// notice on the list
	async fn submit(
		&self,
		model: &Arc<dyn ModelAdmin>,
		id: Option<i64>,
		request: &Request,
		action: &str,
	) -> Result<Response> {
		let form = FormData::from_request(request).await?;
		if !self.auth.verify_csrf(request, form.value("csrf_token")).await {
			warn!(entity = model.slug(), "rejected admin post with bad csrf token");
			return Ok(Response::forbidden().with_body("CSRF token missing or invalid"));
		}
		match model.save(&self.pool, id, &form, &self.storage).await {
			Ok(notice) => {
				info!(entity = model.slug(), ?id, "admin save");
				Ok(Response::redirect(&Self::list_url(
					model.slug(),
					notice.as_deref(),
				)))
			}
			Err(e) if e.is_unique_violation() => {
				let fields = match id {
					None => model.blank_form(&self.pool).await?,
					Some(id) => model.edit_form(&self.pool, id).await?,
				};
				let fields = refill(fields, &form);
				let token = self.csrf_token(request).await;
				self.form_page(model, &fields, action, &token, Some(e.to_string()))
			}
			Err(e) => Err(e),
		}
	}

	async fn entity_route(
		&self,
		model: &Arc<dyn ModelAdmin>,
		rest: &[&str],
		request: &Request,
	) -> Result<Response> {
		let get = request.method == Method::GET;
		let post = request.method == Method::POST;

		match rest {
			[] if get => self.list(model, request).await,
			[] => Ok(Response::method_not_allowed()),

			["new"] if model.append_only() => Ok(Response::not_found()),
			["new"] if get => {
				let fields = model.blank_form(&self.pool).await?;
				let action = format!("/admin/{}/new", model.slug());
				let token = self.csrf_token(request).await;
				self.form_page(model, &fields, &action, &token, None)
			}
			["new"] if post => {
				let action = format!("/admin/{}/new", model.slug());
				self.submit(model, None, request, &action).await
			}

			[id, verb @ ("edit" | "delete")] => {
				let id: i64 = id
					.parse()
					.map_err(|_| Error::BadRequest(format!("invalid id: {}", id)))?;
				match *verb {
					"edit" if model.append_only() => Ok(Response::not_found()),
					"edit" if get => {
						let fields = model.edit_form(&self.pool, id).await?;
						let action = format!("/admin/{}/{}/edit", model.slug(), id);
						let token = self.csrf_token(request).await;
						self.form_page(model, &fields, &action, &token, None)
					}
					"edit" if post => {
						let action = format!("/admin/{}/{}/edit", model.slug(), id);
						self.submit(model, Some(id), request, &action).await
					}
					"delete" if get => {
						let mut context = tera::Context::new();
						context.insert("title", model.title());
						context.insert("slug", model.slug());
						context.insert("id", &id);
						context.insert("csrf_token", &self.csrf_token(request).await);
						self.render("admin/confirm_delete.html", &context)
					}
					"delete" if post => {
						let form = FormData::from_request(request).await?;
						if !self.auth.verify_csrf(request, form.value("csrf_token")).await {
							warn!(
								entity = model.slug(),
								id, "rejected admin delete with bad csrf token"
							);
							return Ok(Response::forbidden()
								.with_body("CSRF token missing or invalid"));
						}
						model.delete(&self.pool, id, &self.storage).await?;
						info!(entity = model.slug(), id, "admin delete");
						Ok(Response::redirect(&Self::list_url(model.slug(), None)))
					}
					_ => Ok(Response::method_not_allowed()),
				}
			}
			_ => Ok(Response::not_found()),
		}
	}
}

#[async_trait]
impl Handler for AdminSite {
	async fn handle(&self, request: Request) -> Result<Response> {
		let segments: Vec<&str> = request
			.path()
			.split('/')
			.filter(|s| !s.is_empty())
			.collect();

		// mounted under /admin; anything else is a routing bug upstream
		let rest = match segments.split_first() {
			Some((&"admin", rest)) => rest,
			_ => return Ok(Response::not_found()),
		};

		match rest.split_first() {
			None => self.dashboard().await,
			Some((slug, tail)) => match self.model(slug) {
				Some(model) => {
					let model = model.clone();
					self.entity_route(&model, tail, &request).await
				}
				None => Ok(Response::not_found()),
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use folio_auth::{SESSION_COOKIE, Session};
	use hyper::StatusCode;

	fn templates() -> Arc<Tera> {
		let mut tera = Tera::default();
		tera.add_raw_templates(vec![
			("admin/index.html", "{% for m in models %}{{ m.slug }} {% endfor %}"),
			(
				"admin/list.html",
				"{{ title }}|{% if notice %}notice:{{ notice }}|{% endif %}\
				 {% for row in rows %}{{ row.cells | join(sep=\",\") }};{% endfor %}",
			),
			(
				"admin/form.html",
				"{% if error %}error:{{ error }}|{% endif %}\
				 {% for f in fields %}{{ f.name }}={{ f.value }};{% endfor %}",
			),
			("admin/confirm_delete.html", "delete {{ slug }}/{{ id }}?"),
		])
		.unwrap();
		Arc::new(tera)
	}

	async fn site() -> (SqlitePool, AdminSite, tempfile::TempDir) {
		let pool = folio_db::connect_in_memory().await.unwrap();
		let dir = tempfile::tempdir().unwrap();
		let storage = MediaStorage::new(dir.path(), Default::default());
		let auth = Arc::new(AuthService::new(pool.clone()));
		let site = AdminSite::new(pool.clone(), templates(), storage, auth);
		(pool, site, dir)
	}

	/// Open a session and hand back its cookie header and CSRF token
	async fn session(site: &AdminSite) -> (String, String) {
		let session = Session::new();
		let token = session.csrf_token.clone();
		let id = site.auth.sessions().create(session).await;
		(format!("{}={}", SESSION_COOKIE, id), token)
	}

	fn body_text(response: &Response) -> String {
		String::from_utf8(response.body.to_vec()).unwrap()
	}

	#[tokio::test]
	async fn dashboard_lists_every_entity() {
		let (_pool, site, _dir) = site().await;
		let request = Request::builder().uri("/admin/").build().unwrap();
		let response = site.handle(request).await.unwrap();
		let body = body_text(&response);
		for slug in ["posts", "categories", "tags", "photos", "signups", "subscribers"] {
			assert!(body.contains(slug), "missing {slug} in {body}");
		}
	}

	#[tokio::test]
	async fn create_flow_redirects_to_the_list() {
		let (pool, site, _dir) = site().await;
		let (cookie, token) = session(&site).await;
		let request = Request::builder()
			.method(Method::POST)
			.uri("/admin/categories/new")
			.header("cookie", &cookie)
			.form(&[("title", "Essays"), ("csrf_token", &token)])
			.build()
			.unwrap();
		let response = site.handle(request).await.unwrap();
		assert_eq!(response.status, StatusCode::FOUND);
		assert_eq!(response.header("location"), Some("/admin/categories/"));

		let list = site
			.handle(Request::builder().uri("/admin/categories/").build().unwrap())
			.await
			.unwrap();
		assert!(body_text(&list).contains("Essays,Essays"));
		assert_eq!(
			folio_db::repo::categories::list(&pool).await.unwrap().len(),
			1
		);
	}

	#[tokio::test]
	async fn duplicate_slug_re_renders_the_form() {
		let (pool, site, _dir) = site().await;
		folio_db::repo::categories::create(&pool, "a b").await.unwrap();

		let (cookie, token) = session(&site).await;
		let request = Request::builder()
			.method(Method::POST)
			.uri("/admin/categories/new")
			.header("cookie", &cookie)
			.form(&[("title", "a.b"), ("csrf_token", &token)])
			.build()
			.unwrap();
		let response = site.handle(request).await.unwrap();
		assert_eq!(response.status, StatusCode::OK);
		let body = body_text(&response);
		assert!(body.contains("error:"));
		// the rejected submission stays in the field
		assert!(body.contains("title=a.b"));
	}

	#[tokio::test]
	async fn append_only_entities_have_no_forms() {
		let (_pool, site, _dir) = site().await;
		let response = site
			.handle(Request::builder().uri("/admin/signups/new").build().unwrap())
			.await
			.unwrap();
		assert_eq!(response.status, StatusCode::NOT_FOUND);
	}

	#[tokio::test]
	async fn delete_flow_confirms_then_removes() {
		let (pool, site, _dir) = site().await;
		let tag = folio_db::repo::tags::create(&pool, "stale").await.unwrap();

		let confirm = site
			.handle(
				Request::builder()
					.uri(&format!("/admin/tags/{}/delete", tag.id))
					.build()
					.unwrap(),
			)
			.await
			.unwrap();
		assert!(body_text(&confirm).contains("delete tags/"));

		let (cookie, token) = session(&site).await;
		let response = site
			.handle(
				Request::builder()
					.method(Method::POST)
					.uri(&format!("/admin/tags/{}/delete", tag.id))
					.header("cookie", &cookie)
					.form(&[("csrf_token", &token)])
					.build()
					.unwrap(),
			)
			.await
			.unwrap();
		assert_eq!(response.status, StatusCode::FOUND);
		assert!(folio_db::repo::tags::list(&pool).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn posts_without_the_session_token_are_refused() {
		let (pool, site, _dir) = site().await;
		let (cookie, _token) = session(&site).await;

		// no token at all
		let request = Request::builder()
			.method(Method::POST)
			.uri("/admin/categories/new")
			.header("cookie", &cookie)
			.form(&[("title", "Essays")])
			.build()
			.unwrap();
		let response = site.handle(request).await.unwrap();
		assert_eq!(response.status, StatusCode::FORBIDDEN);

		// a token from some other session
		let (_, foreign) = session(&site).await;
		let request = Request::builder()
			.method(Method::POST)
			.uri("/admin/categories/new")
			.header("cookie", &cookie)
			.form(&[("title", "Essays"), ("csrf_token", &foreign)])
			.build()
			.unwrap();
		let response = site.handle(request).await.unwrap();
		assert_eq!(response.status, StatusCode::FORBIDDEN);

		assert!(
			folio_db::repo::categories::list(&pool)
				.await
				.unwrap()
				.is_empty()
		);
	}

	#[tokio::test]
	async fn unknown_entities_are_not_found() {
		let (_pool, site, _dir) = site().await;
		let response = site
			.handle(Request::builder().uri("/admin/widgets/").build().unwrap())
			.await
			.unwrap();
		assert_eq!(response.status, StatusCode::NOT_FOUND);
	}

	#[tokio::test]
	async fn save_notice_is_flashed_on_the_list_page() {
		// a storage root blocked by a regular file makes every write
		// fail; the row still saves and the failure becomes a notice
		let pool = folio_db::connect_in_memory().await.unwrap();
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join("blocked"), b"").unwrap();
		let storage = MediaStorage::new(dir.path().join("blocked"), Default::default());
		let auth = Arc::new(AuthService::new(pool.clone()));
		let site = AdminSite::new(pool.clone(), templates(), storage, auth);
		let (cookie, token) = session(&site).await;

		let boundary = "XB";
		let body = format!(
			"--{b}\r\nContent-Disposition: form-data; name=\"csrf_token\"\r\n\r\n{token}\r\n\
			 --{b}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nbroken\r\n\
			 --{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"x.jpg\"\r\n\r\nbytes\r\n\
			 --{b}--\r\n",
			b = boundary
		)
		.into_bytes();
		let request = Request::builder()
			.method(Method::POST)
			.uri("/admin/photos/new")
			.header("cookie", &cookie)
			.header(
				"content-type",
				&format!("multipart/form-data; boundary={}", boundary),
			)
			.body(body)
			.build()
			.unwrap();

		let response = site.handle(request).await.unwrap();
		assert_eq!(response.status, StatusCode::FOUND);
		let location = response.header("location").unwrap().to_string();
		assert!(location.starts_with("/admin/photos/?notice="));

		let list = site
			.handle(Request::builder().uri(&location).build().unwrap())
			.await
			.unwrap();
		assert!(body_text(&list).contains("notice:"));
	}
}
