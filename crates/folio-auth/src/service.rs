//! Login, logout and user lookup over the identity tables.

use folio_core::{Error, Result};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::debug;

use folio_db::models::User;
use folio_db::repo::users;

use crate::hasher::{Argon2Hasher, PasswordHasher};
use crate::sessions::{SESSION_COOKIE, Session, SessionStore};

/// Authentication facade shared by the login views and the admin gate.
///
/// Owns the session store and a password hasher; everything else is a
/// query against the user/role tables.
pub struct AuthService {
	pool: SqlitePool,
	hasher: Box<dyn PasswordHasher>,
	sessions: SessionStore,
}

impl AuthService {
	pub fn new(pool: SqlitePool) -> Self {
		Self {
			pool,
			hasher: Box::new(Argon2Hasher::new()),
			sessions: SessionStore::new(),
		}
	}

	pub fn with_hasher(pool: SqlitePool, hasher: Box<dyn PasswordHasher>) -> Self {
		Self {
			pool,
			hasher,
			sessions: SessionStore::new(),
		}
	}

	pub fn sessions(&self) -> &SessionStore {
		&self.sessions
	}

	/// Create an account with a hashed password
	pub async fn create_user(&self, email: &str, password: &str, active: bool) -> Result<User> {
		let hash = self.hasher.hash(password)?;
		users::create(&self.pool, email, &hash, active).await
	}

	/// Grant a named role to a user, creating the role when absent
	pub async fn grant_role(&self, user_id: i64, role_name: &str) -> Result<()> {
		let role = users::ensure_role(&self.pool, role_name, "").await?;
		users::add_role(&self.pool, user_id, role.id).await
	}

	/// Check credentials; inactive accounts never authenticate
	pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>> {
		let Some(user) = users::by_email(&self.pool, email).await? else {
			return Ok(None);
		};
		if !user.active {
			debug!(email, "login attempt for inactive account");
			return Ok(None);
		}
		if self.hasher.verify(password, &user.password)? {
			Ok(Some(user))
		} else {
			Ok(None)
		}
	}

	/// Open a session for a user, returning the session id to set as a
	/// cookie
	pub async fn login(&self, user: &User) -> String {
		let mut session = Session::new();
		session.set("user_id", json!(user.id));
		self.sessions.create(session).await
	}

	pub async fn logout(&self, session_id: &str) {
		self.sessions.destroy(session_id).await;
	}

	/// Resolve the logged-in user from a request's session cookie
	pub async fn current_user(
		&self,
		request: &folio_core::Request,
	) -> Result<Option<User>> {
		let Some(session_id) = request.cookie(SESSION_COOKIE) else {
			return Ok(None);
		};
		let Some(session) = self.sessions.load(&session_id).await else {
			return Ok(None);
		};
		let Some(user_id) = session.get("user_id").and_then(|v| v.as_i64()) else {
			return Ok(None);
		};
		users::by_id(&self.pool, user_id).await
	}

	/// CSRF token for the request's session, creating an anonymous
	/// session when there is none yet. The second value is a fresh
	/// session id the caller must set as a cookie when one was created.
	pub async fn csrf_for(&self, request: &folio_core::Request) -> (String, Option<String>) {
		if let Some(session_id) = request.cookie(SESSION_COOKIE)
			&& let Some(session) = self.sessions.load(&session_id).await
		{
			return (session.csrf_token, None);
		}
		let session = Session::new();
		let token = session.csrf_token.clone();
		let session_id = self.sessions.create(session).await;
		(token, Some(session_id))
	}

	/// Compare a submitted token with the session's. Missing cookie,
	/// missing session and empty token all fail.
	pub async fn verify_csrf(&self, request: &folio_core::Request, submitted: &str) -> bool {
		if submitted.is_empty() {
			return false;
		}
		let Some(session_id) = request.cookie(SESSION_COOKIE) else {
			return false;
		};
		match self.sessions.load(&session_id).await {
			Some(session) => session.csrf_token == submitted,
			None => false,
		}
	}

	pub async fn has_role(&self, user_id: i64, role_name: &str) -> Result<bool> {
		users::has_role(&self.pool, user_id, role_name).await
	}

	/// `create_user` plus the admin role grant, used by the CLI
	pub async fn create_admin(&self, email: &str, password: &str) -> Result<User> {
		let user = self.create_user(email, password, true).await.map_err(|e| {
			if e.is_unique_violation() {
				Error::BadRequest(format!("account {} already exists", email))
			} else {
				e
			}
		})?;
		self.grant_role(user.id, "admin").await?;
		Ok(user)
	}
}
