//! Handlers for the `/faculty` resource (signup, signin, profile).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use campusdocs_core::error::CoreError;
use campusdocs_core::faculty::{normalize_email, normalize_text};
use campusdocs_core::types::DbId;
use campusdocs_db::models::faculty::{CreateFaculty, Faculty, FacultyResponse, UpdateFaculty};
use campusdocs_db::repositories::FacultyRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{issue_token, ProfileClaims};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthFaculty;
use crate::middleware::validated_json::ValidatedJson;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /faculty`.
///
/// Fields are optional only so that absent keys reach the validator and are
/// reported together with every other violation; `required` rejects `None`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(
        required(message = "Email is required"),
        email(message = "Invalid email format"),
        length(min = 3, max = 50)
    )]
    pub email: Option<String>,
    #[validate(required(message = "Name is required"), length(min = 1, max = 30))]
    pub name: Option<String>,
    #[validate(required(message = "Password is required"), length(min = 5, max = 60))]
    pub password: Option<String>,
    #[validate(required(message = "Department is required"), length(min = 1))]
    pub department: Option<String>,
}

/// Request body for `POST /faculty/signin`.
#[derive(Debug, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(
        required(message = "Email is required"),
        email(message = "Invalid email format"),
        length(min = 3, max = 50)
    )]
    pub email: Option<String>,
    #[validate(required(message = "Password is required"), length(min = 5, max = 50))]
    pub password: Option<String>,
}

/// Request body for `PATCH /faculty`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(email(message = "Invalid email format"), length(min = 3, max = 50))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 30))]
    pub name: Option<String>,
    #[validate(length(min = 5, max = 50))]
    pub password: Option<String>,
    #[validate(length(min = 1, max = 30))]
    pub department: Option<String>,
}

/// Minimal account reference returned alongside a token.
#[derive(Debug, Serialize)]
pub struct FacultyRef {
    pub id: DbId,
}

/// Response for signup and signin.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub message: &'static str,
    pub token: String,
    pub faculty: FacultyRef,
}

/// Response carrying a profile.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub message: &'static str,
    pub faculty: FacultyResponse,
}

/// Response carrying only a message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/faculty
///
/// Register a new faculty account and return a token for it.
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    // Presence was checked by `required`.
    let email = normalize_email(input.email.as_deref().unwrap_or_default());

    if FacultyRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Faculty already exists".into(),
        )));
    }

    let password_hash = hash_password(input.password.as_deref().unwrap_or_default())
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let faculty = FacultyRepo::create(
        &state.pool,
        &CreateFaculty {
            email,
            password_hash,
            name: normalize_text(input.name.as_deref().unwrap_or_default()),
            department: normalize_text(input.department.as_deref().unwrap_or_default()),
        },
    )
    .await?;

    let profile = ProfileClaims {
        email: Some(faculty.email.clone()),
        name: Some(faculty.name.clone()),
        department: Some(faculty.department.clone()),
    };
    let token = token_for(&state, faculty.id, &profile)?;

    tracing::info!(faculty_id = faculty.id, "Faculty registered");

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            message: "Faculty created successfully",
            token,
            faculty: FacultyRef { id: faculty.id },
        }),
    ))
}

/// POST /api/faculty/signin
///
/// Authenticate with email + password. Unknown emails are reported as 404,
/// wrong passwords as 401.
pub async fn signin(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SigninRequest>,
) -> AppResult<Json<TokenResponse>> {
    let email = normalize_email(input.email.as_deref().unwrap_or_default());

    let faculty = FacultyRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Faculty", &email)))?;

    let password = input.password.as_deref().unwrap_or_default();
    let password_valid = verify_password(password, &faculty.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid password".into(),
        )));
    }

    let token = token_for(&state, faculty.id, &ProfileClaims::default())?;

    Ok(Json(TokenResponse {
        message: "Welcome, you are logged in",
        token,
        faculty: FacultyRef { id: faculty.id },
    }))
}

/// GET /api/faculty/faculty-details
///
/// Profile of the authenticated caller.
pub async fn get_current(
    State(state): State<AppState>,
    auth: AuthFaculty,
) -> AppResult<Json<ProfileResponse>> {
    let faculty = find_faculty(&state, auth.faculty_id).await?;
    Ok(Json(ProfileResponse {
        message: "Faculty found",
        faculty: faculty.into(),
    }))
}

/// GET /api/faculty/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProfileResponse>> {
    let faculty = find_faculty(&state, id).await?;
    Ok(Json(ProfileResponse {
        message: "Faculty found",
        faculty: faculty.into(),
    }))
}

/// PATCH /api/faculty
///
/// Apply a partial profile update to the caller's account. The password is
/// rehashed and stored only when the body carries one, and only after the
/// profile fields were accepted.
pub async fn update_current(
    State(state): State<AppState>,
    auth: AuthFaculty,
    ValidatedJson(input): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let id = auth.faculty_id;
    let existing = find_faculty(&state, id).await?;

    let changes = UpdateFaculty {
        email: input.email.as_deref().map(normalize_email),
        name: input.name.as_deref().map(normalize_text),
        department: input.department.as_deref().map(normalize_text),
    };

    if let Some(email) = changes.email.as_deref() {
        if email != existing.email
            && FacultyRepo::find_by_email(&state.pool, email).await?.is_some()
        {
            return Err(AppError::Core(CoreError::Conflict(
                "Email is already in use".into(),
            )));
        }
    }

    let updated = if changes.is_empty() {
        FacultyRepo::find_by_id(&state.pool, id).await?
    } else {
        FacultyRepo::update(&state.pool, id, &changes).await?
    };
    let updated =
        updated.ok_or_else(|| AppError::Core(CoreError::not_found("Faculty", id)))?;

    // Written last so a rejected profile change leaves the password alone.
    if let Some(password) = input.password.as_deref() {
        let password_hash = hash_password(password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
        if !FacultyRepo::set_password(&state.pool, id, &password_hash).await? {
            return Err(AppError::Core(CoreError::not_found("Faculty", id)));
        }
    }

    tracing::info!(faculty_id = id, "Faculty profile updated");

    Ok(Json(ProfileResponse {
        message: "Faculty updated successfully",
        faculty: updated.into(),
    }))
}

/// DELETE /api/faculty
///
/// Delete the caller's account. Their posts stay in the hierarchy.
pub async fn delete_current(
    State(state): State<AppState>,
    auth: AuthFaculty,
) -> AppResult<Json<MessageResponse>> {
    if !FacultyRepo::delete(&state.pool, auth.faculty_id).await? {
        return Err(AppError::Core(CoreError::not_found(
            "Faculty",
            auth.faculty_id,
        )));
    }

    tracing::info!(faculty_id = auth.faculty_id, "Faculty deleted");

    Ok(Json(MessageResponse {
        message: "Faculty deleted successfully",
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_faculty(state: &AppState, id: DbId) -> AppResult<Faculty> {
    FacultyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Faculty", id)))
}

fn token_for(state: &AppState, id: DbId, profile: &ProfileClaims) -> AppResult<String> {
    issue_token(id, profile, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))
}
