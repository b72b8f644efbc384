//! Shared application state, built once at startup and cloned into every
//! view. There is no global state; anything a handler needs travels in
//! the context.

use std::sync::Arc;

use folio_admin::MediaStorage;
use folio_auth::AuthService;
use folio_core::{Response, Result, Settings};
use sqlx::SqlitePool;
use tera::Tera;

#[derive(Clone)]
pub struct AppContext {
	pub settings: Settings,
	pub pool: SqlitePool,
	pub templates: Arc<Tera>,
	pub auth: Arc<AuthService>,
	pub storage: MediaStorage,
}

impl AppContext {
	/// Assemble a context from already-constructed parts; used by tests
	/// that bring their own templates and pool
	pub fn new(settings: Settings, pool: SqlitePool, templates: Arc<Tera>) -> Self {
		let storage = MediaStorage::from_settings(&settings);
		let auth = Arc::new(AuthService::new(pool.clone()));
		Self {
			settings,
			pool,
			templates,
			auth,
			storage,
		}
	}

	/// Connect the database, run migrations and load templates from disk
	pub async fn from_settings(settings: Settings) -> Result<Self> {
		let pool = folio_db::connect(&settings.database_url).await?;
		let glob = format!("{}/**/*.html", settings.template_dir);
		let templates = Arc::new(Tera::new(&glob)?);
		Ok(Self::new(settings, pool, templates))
	}

	pub fn render(&self, template: &str, context: &tera::Context) -> Result<Response> {
		let html = self.templates.render(template, context)?;
		Ok(Response::ok().with_html(html))
	}
}
