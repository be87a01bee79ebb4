//! Repository for the `faculties` table.

use campusdocs_core::types::DbId;
use sqlx::PgPool;

use crate::models::faculty::{CreateFaculty, Faculty, UpdateFaculty};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, name, department, created_at, updated_at";

/// Provides CRUD operations for faculty accounts.
pub struct FacultyRepo;

impl FacultyRepo {
    /// Insert a new faculty account, returning the created row.
    ///
    /// A duplicate email surfaces as a `uq_faculties_email` violation.
    pub async fn create(pool: &PgPool, input: &CreateFaculty) -> Result<Faculty, sqlx::Error> {
        let query = format!(
            "INSERT INTO faculties (email, password_hash, name, department)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Faculty>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.name)
            .bind(&input.department)
            .fetch_one(pool)
            .await
    }

    /// Find a faculty account by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Faculty>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM faculties WHERE id = $1");
        sqlx::query_as::<_, Faculty>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a faculty account by its normalized email.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Faculty>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM faculties WHERE email = $1");
        sqlx::query_as::<_, Faculty>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Update profile fields. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFaculty,
    ) -> Result<Option<Faculty>, sqlx::Error> {
        let query = format!(
            "UPDATE faculties SET
                email = COALESCE($2, email),
                name = COALESCE($3, name),
                department = COALESCE($4, department),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Faculty>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.name)
            .bind(&input.department)
            .fetch_optional(pool)
            .await
    }

    /// Replace the stored password hash. Callers hash first; this is the only
    /// path through which a password changes.
    ///
    /// Returns `true` if the row was updated.
    pub async fn set_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE faculties SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an account. Posts attributed to it are left untouched.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM faculties WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
