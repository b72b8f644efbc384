//! Cookie-backed session state, kept in process memory.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "sessionid";

/// Session data stored in the backend.
///
/// Every session carries a CSRF token from birth; forms embed it as a
/// hidden field and state-changing handlers compare it on POST.
#[derive(Debug, Clone)]
pub struct Session {
	pub data: HashMap<String, serde_json::Value>,
	pub csrf_token: String,
}

impl Default for Session {
	fn default() -> Self {
		Self::new()
	}
}

impl Session {
	pub fn new() -> Self {
		Self {
			data: HashMap::new(),
			csrf_token: Uuid::new_v4().to_string(),
		}
	}

	pub fn set(&mut self, key: impl Into<String>, value: serde_json::Value) {
		self.data.insert(key.into(), value);
	}

	pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
		self.data.get(key)
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}
}

/// In-memory session store keyed by opaque ids.
///
/// Sessions do not survive a restart; the admin surface is the only
/// consumer and re-login is cheap.
#[derive(Clone, Default)]
pub struct SessionStore {
	inner: Arc<Mutex<HashMap<String, Session>>>,
}

impl SessionStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Persist a session under a fresh random id
	pub async fn create(&self, session: Session) -> String {
		let id = Uuid::new_v4().to_string();
		self.inner.lock().await.insert(id.clone(), session);
		id
	}

	pub async fn load(&self, id: &str) -> Option<Session> {
		self.inner.lock().await.get(id).cloned()
	}

	pub async fn destroy(&self, id: &str) {
		self.inner.lock().await.remove(id);
	}
}
