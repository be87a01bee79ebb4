//! Branch document row and DTOs.

use campusdocs_core::hierarchy::{Branch, Year};
use campusdocs_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `branches` table. `years` is the embedded hierarchy.
#[derive(Debug, Clone, FromRow)]
pub struct BranchRow {
    pub id: DbId,
    pub branch_name: String,
    pub years: Json<Vec<Year>>,
    pub revision: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<BranchRow> for Branch {
    fn from(row: BranchRow) -> Self {
        Branch {
            id: row.id,
            branch_name: row.branch_name,
            years: row.years.0,
            revision: row.revision,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for creating a branch with its year skeletons.
#[derive(Debug)]
pub struct CreateBranch {
    pub branch_name: String,
    pub years: Vec<Year>,
}
