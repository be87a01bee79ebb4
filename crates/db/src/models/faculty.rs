//! Faculty account entity model and DTOs.

use campusdocs_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full faculty row from the `faculties` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`FacultyResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Faculty {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub department: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe faculty representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyResponse {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub department: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Faculty> for FacultyResponse {
    fn from(f: Faculty) -> Self {
        Self {
            id: f.id,
            email: f.email,
            name: f.name,
            department: f.department,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

/// DTO for creating a new faculty account. The password is already hashed.
#[derive(Debug)]
pub struct CreateFaculty {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub department: String,
}

/// DTO for a partial profile update. `None` fields are left unchanged.
///
/// The password is deliberately absent: it changes only through
/// `FacultyRepo::set_password`.
#[derive(Debug, Default)]
pub struct UpdateFaculty {
    pub email: Option<String>,
    pub name: Option<String>,
    pub department: Option<String>,
}

impl UpdateFaculty {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none() && self.department.is_none()
    }
}
