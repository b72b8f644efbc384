//! Accounts, roles and the membership join used to gate admin access.

use folio_core::Result;
use sqlx::SqlitePool;

use crate::models::{Role, User};

pub async fn create(
	pool: &SqlitePool,
	email: &str,
	password_hash: &str,
	active: bool,
) -> Result<User> {
	let user = sqlx::query_as::<_, User>(
		"INSERT INTO user (email, password, active) VALUES (?, ?, ?) \
		 RETURNING id, email, password, active",
	)
	.bind(email)
	.bind(password_hash)
	.bind(active)
	.fetch_one(pool)
	.await?;
	Ok(user)
}

pub async fn by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
	let user =
		sqlx::query_as::<_, User>("SELECT id, email, password, active FROM user WHERE email = ?")
			.bind(email)
			.fetch_optional(pool)
			.await?;
	Ok(user)
}

pub async fn by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
	let user =
		sqlx::query_as::<_, User>("SELECT id, email, password, active FROM user WHERE id = ?")
			.bind(id)
			.fetch_optional(pool)
			.await?;
	Ok(user)
}

/// Fetch a role by name, creating it when absent
pub async fn ensure_role(pool: &SqlitePool, name: &str, description: &str) -> Result<Role> {
	sqlx::query("INSERT INTO role (name, description) VALUES (?, ?) ON CONFLICT(name) DO NOTHING")
		.bind(name)
		.bind(description)
		.execute(pool)
		.await?;
	let role =
		sqlx::query_as::<_, Role>("SELECT id, name, description FROM role WHERE name = ?")
			.bind(name)
			.fetch_one(pool)
			.await?;
	Ok(role)
}

pub async fn add_role(pool: &SqlitePool, user_id: i64, role_id: i64) -> Result<()> {
	sqlx::query("INSERT OR IGNORE INTO roles_users (user_id, role_id) VALUES (?, ?)")
		.bind(user_id)
		.bind(role_id)
		.execute(pool)
		.await?;
	Ok(())
}

/// Membership check through the roles_users join; this is the entire
/// admin access predicate
pub async fn has_role(pool: &SqlitePool, user_id: i64, role_name: &str) -> Result<bool> {
	let count: i64 = sqlx::query_scalar(
		"SELECT COUNT(*) FROM roles_users ru \
		 JOIN role r ON r.id = ru.role_id \
		 WHERE ru.user_id = ? AND r.name = ?",
	)
	.bind(user_id)
	.bind(role_name)
	.fetch_one(pool)
	.await?;
	Ok(count > 0)
}

pub async fn roles_for(pool: &SqlitePool, user_id: i64) -> Result<Vec<Role>> {
	let roles = sqlx::query_as::<_, Role>(
		"SELECT r.id, r.name, r.description FROM role r \
		 JOIN roles_users ru ON ru.role_id = r.id \
		 WHERE ru.user_id = ? ORDER BY r.id",
	)
	.bind(user_id)
	.fetch_all(pool)
	.await?;
	Ok(roles)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn email_uniqueness_is_enforced() {
		let pool = crate::connect_in_memory().await.unwrap();
		create(&pool, "a@example.com", "hash", true).await.unwrap();
		let err = create(&pool, "a@example.com", "hash2", true)
			.await
			.unwrap_err();
		assert!(err.is_unique_violation());
	}

	#[tokio::test]
	async fn role_membership_gates_access() {
		let pool = crate::connect_in_memory().await.unwrap();
		let user = create(&pool, "admin@example.com", "hash", true)
			.await
			.unwrap();
		let admin = ensure_role(&pool, "admin", "full access").await.unwrap();

		assert!(!has_role(&pool, user.id, "admin").await.unwrap());
		add_role(&pool, user.id, admin.id).await.unwrap();
		assert!(has_role(&pool, user.id, "admin").await.unwrap());
		// adding twice is harmless
		add_role(&pool, user.id, admin.id).await.unwrap();
		assert_eq!(roles_for(&pool, user.id).await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn ensure_role_returns_the_existing_row() {
		let pool = crate::connect_in_memory().await.unwrap();
		let first = ensure_role(&pool, "admin", "desc").await.unwrap();
		let second = ensure_role(&pool, "admin", "other desc").await.unwrap();
		assert_eq!(first.id, second.id);
		assert_eq!(second.description.as_deref(), Some("desc"));
	}
}
