//! The route table.

use std::sync::Arc;

use folio_admin::AdminSite;
use folio_auth::RoleGuard;
use folio_core::{Router, path, prefix};

use crate::auth_views::{LoginView, LogoutView};
use crate::context::AppContext;
use crate::views::{BlogView, DownloadView, IndexView};

/// Admin access is gated on this role
pub const ADMIN_ROLE: &str = "admin";

pub fn build_router(ctx: &AppContext) -> Router {
	let admin = AdminSite::new(
		ctx.pool.clone(),
		ctx.templates.clone(),
		ctx.storage.clone(),
		ctx.auth.clone(),
	);
	Router::new()
		.with_route(path("/", IndexView::new(ctx.clone())).with_name("index"))
		.with_route(path("/blog/", BlogView::new(ctx.clone())).with_name("blog"))
		.with_route(path("/download", DownloadView::new(ctx.clone())).with_name("download"))
		.with_route(path("/login", LoginView::new(ctx.clone())).with_name("login"))
		.with_route(path("/logout", LogoutView::new(ctx.clone())).with_name("logout"))
		.with_route(
			prefix("/admin", admin)
				.with_middleware(Arc::new(RoleGuard::new(ctx.auth.clone(), ADMIN_ROLE)))
				.with_name("admin"),
		)
}
