use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{fs, path::Path, str::FromStr};

use shared::domain::ContactId;

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredContact {
    pub contact_id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn list_contacts(&self) -> Result<Vec<StoredContact>> {
        let rows = sqlx::query(
            "SELECT id, first_name, last_name, email FROM contacts ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| StoredContact {
                contact_id: ContactId(row.get::<i64, _>("id")),
                first_name: row.get::<String, _>("first_name"),
                last_name: row.get::<String, _>("last_name"),
                email: row.get::<String, _>("email"),
            })
            .collect())
    }

    pub async fn contact_by_id(&self, contact_id: ContactId) -> Result<Option<StoredContact>> {
        let row = sqlx::query("SELECT id, first_name, last_name, email FROM contacts WHERE id = ?")
            .bind(contact_id.0)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| StoredContact {
            contact_id: ContactId(row.get::<i64, _>("id")),
            first_name: row.get::<String, _>("first_name"),
            last_name: row.get::<String, _>("last_name"),
            email: row.get::<String, _>("email"),
        }))
    }

    /// Fails on duplicate email; the column carries a UNIQUE constraint.
    pub async fn insert_contact(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<ContactId> {
        let rec = sqlx::query(
            "INSERT INTO contacts (first_name, last_name, email) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(ContactId(rec.get::<i64, _>(0)))
    }

    /// Returns false when no contact with the id exists. Fields passed as
    /// `None` keep their stored value.
    pub async fn update_contact(
        &self,
        contact_id: ContactId,
        first_name: Option<&str>,
        last_name: Option<&str>,
        email: Option<&str>,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE contacts
             SET first_name = COALESCE(?1, first_name),
                 last_name  = COALESCE(?2, last_name),
                 email      = COALESCE(?3, email)
             WHERE id = ?4",
        )
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(contact_id.0)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns false when no contact with the id exists.
    pub async fn delete_contact(&self, contact_id: ContactId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = ?")
            .bind(contact_id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// True when the error is a database UNIQUE constraint violation, such as an
/// insert reusing an existing email.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    match err.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
        _ => false,
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return Ok(());
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();
    if path.is_empty() {
        return Ok(());
    }

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!(
                    "failed to create parent directory '{}' for database url '{database_url}'",
                    parent.display()
                )
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
