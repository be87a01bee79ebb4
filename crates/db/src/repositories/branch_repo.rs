//! Repository for the `branches` table.
//!
//! Each row is a whole branch document. Mutations go through
//! [`BranchRepo::update_with`], which loads the document, applies a pure
//! in-memory change, and writes it back only if nobody else wrote in
//! between (compare-and-swap on `revision`).

use campusdocs_core::error::CoreError;
use campusdocs_core::hierarchy::{Branch, Year};
use campusdocs_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::error::RepoError;
use crate::models::branch::{BranchRow, CreateBranch};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, branch_name, years, revision, created_at, updated_at";

/// How many load / mutate / write cycles to attempt before giving up.
pub const MAX_WRITE_ATTEMPTS: usize = 5;

/// Provides document operations for branches.
pub struct BranchRepo;

impl BranchRepo {
    /// Insert a new branch document, returning it.
    ///
    /// A duplicate name surfaces as a `uq_branches_branch_name` violation.
    pub async fn create(pool: &PgPool, input: &CreateBranch) -> Result<Branch, sqlx::Error> {
        let query = format!(
            "INSERT INTO branches (branch_name, years)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, BranchRow>(&query)
            .bind(&input.branch_name)
            .bind(Json(&input.years))
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }

    /// Find a branch by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Branch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM branches WHERE id = $1");
        let row = sqlx::query_as::<_, BranchRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Find a branch by its exact name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Branch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM branches WHERE branch_name = $1");
        let row = sqlx::query_as::<_, BranchRow>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// List every branch document in creation order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Branch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM branches ORDER BY id");
        let rows = sqlx::query_as::<_, BranchRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Overwrite the embedded years if the stored revision still equals
    /// `expected_revision`, bumping the revision.
    ///
    /// Returns `None` when the row is gone or was written concurrently.
    pub async fn replace_years(
        pool: &PgPool,
        id: DbId,
        expected_revision: i64,
        years: &[Year],
    ) -> Result<Option<Branch>, sqlx::Error> {
        let query = format!(
            "UPDATE branches SET
                years = $3,
                revision = revision + 1,
                updated_at = NOW()
             WHERE id = $1 AND revision = $2
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, BranchRow>(&query)
            .bind(id)
            .bind(expected_revision)
            .bind(Json(years))
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Apply `apply` to the current document and persist the result.
    ///
    /// `apply` may run more than once if a concurrent writer wins the race;
    /// each run sees a freshly loaded document, so uniqueness checks made
    /// inside it hold at commit time. A domain error from `apply` aborts
    /// without writing.
    pub async fn update_with<T, F>(pool: &PgPool, id: DbId, mut apply: F) -> Result<T, RepoError>
    where
        F: FnMut(&mut Branch) -> Result<T, CoreError>,
    {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let mut branch = Self::find_by_id(pool, id)
                .await?
                .ok_or_else(|| CoreError::not_found("Branch", id))?;

            let value = apply(&mut branch)?;

            if Self::replace_years(pool, id, branch.revision, &branch.years)
                .await?
                .is_some()
            {
                return Ok(value);
            }
            tracing::debug!(branch_id = id, attempt, "Branch write lost a race, retrying");
        }

        tracing::warn!(branch_id = id, "Giving up on contended branch write");
        Err(CoreError::Conflict("Branch was modified concurrently, please retry".into()).into())
    }
}
