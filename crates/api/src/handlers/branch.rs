//! Handlers for the branch hierarchy: branches, subjects and their content.
//!
//! Branches are addressed by integer id; years and subjects inside a branch
//! by their embedded UUIDs.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use campusdocs_core::error::CoreError;
use campusdocs_core::faculty::normalize_text;
use campusdocs_core::hierarchy::{posts_by_author, AuthorPosts, Branch, Posts, Year, YearLabel};
use campusdocs_core::types::DbId;
use campusdocs_core::validation::parse_embedded_id;
use campusdocs_db::models::branch::CreateBranch;
use campusdocs_db::repositories::BranchRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthFaculty;
use crate::middleware::validated_json::ValidatedJson;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

// Absent keys default to empty values so the validators report them
// alongside every other violation instead of failing deserialization.

/// One year skeleton in a create-branch body.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct YearSkeletonRequest {
    #[validate(custom(function = "campusdocs_core::validation::year_label"))]
    pub label: String,
}

/// Request body for `POST /upload/branches`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateBranchRequest {
    #[validate(
        length(max = 50),
        custom(function = "campusdocs_core::validation::not_blank")
    )]
    pub branch_name: String,
    #[validate(nested)]
    pub years: Vec<YearSkeletonRequest>,
}

/// Request body for `POST /upload/branches/{branch_id}/subjects`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct AddSubjectRequest {
    #[validate(custom(function = "campusdocs_core::validation::embedded_id"))]
    pub year_id: String,
    #[validate(
        length(max = 50),
        custom(function = "campusdocs_core::validation::not_blank")
    )]
    pub subject_name: String,
}

/// Request body for `POST /upload/subject-Content`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SubjectContentRequest {
    #[validate(range(min = 1))]
    pub branch_id: DbId,
    #[validate(custom(function = "campusdocs_core::validation::embedded_id"))]
    pub year_id: String,
    #[validate(custom(function = "campusdocs_core::validation::embedded_id"))]
    pub subject_id: String,
}

#[derive(Debug, Serialize)]
pub struct BranchCreatedResponse {
    pub message: &'static str,
    pub branch: Branch,
}

#[derive(Debug, Serialize)]
pub struct SubjectAddedResponse {
    pub message: &'static str,
    pub year: Year,
}

#[derive(Debug, Serialize)]
pub struct AuthorPostsResponse {
    pub message: &'static str,
    pub results: Vec<AuthorPosts>,
}

// ---------------------------------------------------------------------------
// Branches
// ---------------------------------------------------------------------------

/// POST /api/upload/branches
///
/// Create a branch with one empty year per requested label. Branch names are
/// unique.
pub async fn create_branch(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateBranchRequest>,
) -> AppResult<(StatusCode, Json<BranchCreatedResponse>)> {
    let branch_name = normalize_text(&input.branch_name);

    if BranchRepo::find_by_name(&state.pool, &branch_name)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "Branch already exists".into(),
        )));
    }

    let years = input
        .years
        .iter()
        .map(|y| y.label.parse::<YearLabel>().map(Year::skeleton))
        .collect::<Result<Vec<_>, _>>()?;

    let branch = BranchRepo::create(&state.pool, &CreateBranch { branch_name, years }).await?;

    tracing::info!(branch_id = branch.id, branch_name = %branch.branch_name, "Branch created");

    Ok((
        StatusCode::CREATED,
        Json(BranchCreatedResponse {
            message: "Branch created",
            branch,
        }),
    ))
}

/// GET /api/upload/branches
pub async fn list_branches(State(state): State<AppState>) -> AppResult<Json<Vec<Branch>>> {
    let branches = BranchRepo::list(&state.pool).await?;
    Ok(Json(branches))
}

/// GET /api/upload/branches/{branch_id}
pub async fn get_branch(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Branch>> {
    let branch = BranchRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Branch", id)))?;
    Ok(Json(branch))
}

// ---------------------------------------------------------------------------
// Subjects
// ---------------------------------------------------------------------------

/// POST /api/upload/branches/{branch_id}/subjects
///
/// Append an empty subject to one year of a branch. The duplicate-name check
/// and the write happen against the same branch revision, so two concurrent
/// requests for the same name cannot both succeed.
pub async fn add_subject(
    State(state): State<AppState>,
    auth: AuthFaculty,
    Path(branch_id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<AddSubjectRequest>,
) -> AppResult<(StatusCode, Json<SubjectAddedResponse>)> {
    let year_id = parse_embedded_id("yearId", &input.year_id)?;

    let year = BranchRepo::update_with(&state.pool, branch_id, |branch| {
        branch
            .add_subject(year_id, &input.subject_name, auth.faculty_id)
            .cloned()
    })
    .await?;

    tracing::info!(
        branch_id,
        year_id = %year_id,
        faculty_id = auth.faculty_id,
        "Subject added",
    );

    Ok((
        StatusCode::CREATED,
        Json(SubjectAddedResponse {
            message: "Subject added successfully",
            year,
        }),
    ))
}

/// POST /api/upload/subject-Content
///
/// Both post lists of one subject, in the order they were added.
pub async fn subject_content(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SubjectContentRequest>,
) -> AppResult<Json<Posts>> {
    let year_id = parse_embedded_id("yearId", &input.year_id)?;
    let subject_id = parse_embedded_id("subjectId", &input.subject_id)?;

    let branch = BranchRepo::find_by_id(&state.pool, input.branch_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Branch", input.branch_id)))?;

    let posts = branch.subject_content(year_id, subject_id)?.clone();
    Ok(Json(posts))
}

// ---------------------------------------------------------------------------
// Posts by author
// ---------------------------------------------------------------------------

/// GET /api/upload/posts/faculty
///
/// Every post the caller has made, grouped by branch, year and subject.
pub async fn posts_by_faculty(
    State(state): State<AppState>,
    auth: AuthFaculty,
) -> AppResult<Json<AuthorPostsResponse>> {
    let branches = BranchRepo::list(&state.pool).await?;
    let results = posts_by_author(&branches, auth.faculty_id);

    Ok(Json(AuthorPostsResponse {
        message: "Posts fetched successfully",
        results,
    }))
}
