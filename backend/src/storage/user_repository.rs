use anyhow::Result;
use sqlx::{sqlite::SqliteRow, Row};

use crate::storage::db::DbConnection;
use shared::{CreateUserRequest, User};

/// Repository for user operations
#[derive(Clone)]
pub struct UserRepository {
    db: DbConnection,
}

impl UserRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// List all users ordered by id
    pub async fn find_all(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, phone, comment, client_id
            FROM users
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(row_to_user).collect())
    }

    /// Get a user by id
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, phone, comment, client_id
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(row_to_user))
    }

    /// Get a user by email (the only field the service queries by)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, phone, comment, client_id
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(row_to_user))
    }

    /// Insert a new user and return the assigned id.
    ///
    /// A duplicate email surfaces as a unique-constraint error from the
    /// store; the domain layer inspects and maps it.
    pub async fn insert(&self, user: &CreateUserRequest) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, phone, comment, client_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.comment)
        .bind(&user.client_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Persist all mutable fields of an existing user
    pub async fn update(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = ?, email = ?, phone = ?, comment = ?, client_id = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.comment)
        .bind(&user.client_id)
        .bind(user.id)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Delete a user by id; returns whether a row was removed
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM users WHERE id = ?
            "#,
        )
        .bind(id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_user(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        comment: row.get("comment"),
        client_id: row.get("client_id"),
    }
}
