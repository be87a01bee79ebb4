//! Multipart post upload: `POST /upload/branches/{branch_id}/upload`.
//!
//! The form carries a `data` field holding the post metadata as JSON and,
//! for file posts, a `file` field. File bytes are written to the upload
//! store before the branch document is touched; if the document write then
//! fails, the stored file is removed again.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use campusdocs_core::error::CoreError;
use campusdocs_core::hierarchy::{PostAuthor, PostDraft, PostKind, Subject};
use campusdocs_core::types::DbId;
use campusdocs_core::upload::check_size;
use campusdocs_core::validation::{parse_embedded_id, validate_input};
use campusdocs_db::repositories::BranchRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthFaculty;
use crate::state::AppState;

/// Post metadata carried in the `data` form field.
///
/// Absent keys default to empty values so the validators report every
/// missing field together.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct PostMetadata {
    #[validate(custom(function = "campusdocs_core::validation::embedded_id"))]
    pub year_id: String,
    #[validate(custom(function = "campusdocs_core::validation::embedded_id"))]
    pub subject_id: String,
    #[serde(rename = "type")]
    #[validate(custom(function = "campusdocs_core::validation::post_kind"))]
    pub kind: String,
    pub content: Option<String>,
    #[validate(
        required(message = "Posted by name is required"),
        length(min = 1, max = 50)
    )]
    pub posted_by_name: Option<String>,
    #[validate(
        required(message = "Posted by branch is required"),
        length(min = 1, max = 50)
    )]
    pub posted_by_branch: Option<String>,
    #[validate(length(max = 100))]
    pub file_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostUploadedResponse {
    pub message: String,
    pub subject: Subject,
}

/// A file part read fully into memory.
struct UploadedPart {
    file_name: String,
    bytes: Vec<u8>,
}

/// POST /api/upload/branches/{branch_id}/upload
///
/// Append an article or file post to a subject. The author id is always
/// the authenticated caller; display name and branch come from the form.
pub async fn upload_post(
    State(state): State<AppState>,
    auth: AuthFaculty,
    Path(branch_id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<PostUploadedResponse>)> {
    let (metadata, upload) = read_form(multipart, state.uploads.max_bytes()).await?;

    let metadata = metadata
        .ok_or_else(|| AppError::BadRequest("Missing required 'data' field".into()))?;
    let metadata = parse_metadata(&metadata)?;

    let year_id = parse_embedded_id("yearId", &metadata.year_id)?;
    let subject_id = parse_embedded_id("subjectId", &metadata.subject_id)?;
    let kind: PostKind = metadata.kind.parse()?;

    let stored = match (kind, upload) {
        (PostKind::File, Some(part)) => {
            Some(state.uploads.store(&part.bytes, &part.file_name).await?)
        }
        _ => None,
    };

    let draft = PostDraft {
        kind,
        content: metadata.content,
        file: stored.clone(),
        display_name: metadata.file_name,
        author: PostAuthor {
            id: auth.faculty_id,
            name: metadata.posted_by_name.unwrap_or_default(),
            branch: metadata.posted_by_branch.unwrap_or_default(),
        },
    };
    let now = chrono::Utc::now();

    let result = BranchRepo::update_with(&state.pool, branch_id, |branch| {
        branch
            .add_post(year_id, subject_id, draft.clone(), now)
            .cloned()
    })
    .await;

    let subject = match result {
        Ok(subject) => subject,
        Err(err) => {
            if let Some(file) = &stored {
                state.uploads.remove(&file.stored_name).await;
            }
            return Err(err.into());
        }
    };

    tracing::info!(
        branch_id,
        subject_id = %subject_id,
        faculty_id = auth.faculty_id,
        kind = kind.as_str(),
        "Post uploaded",
    );

    Ok((
        StatusCode::CREATED,
        Json(PostUploadedResponse {
            message: format!("{} uploaded successfully", kind.as_str()),
            subject,
        }),
    ))
}

/// Parse and validate the `data` field.
///
/// Only a JSON syntax error is reported as invalid JSON; a well-formed
/// document that breaks the schema yields the usual field error list.
fn parse_metadata(raw: &str) -> AppResult<PostMetadata> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|_| AppError::BadRequest("Invalid JSON format in form data".into()))?;
    let metadata: PostMetadata = serde_json::from_value(value)
        .map_err(|e| AppError::BadRequest(format!("Invalid form data: {e}")))?;
    validate_input(&metadata)?;
    Ok(metadata)
}

/// Read the `data` and `file` parts; other parts are ignored.
///
/// File chunks are counted as they arrive so an oversized part is rejected
/// without buffering all of it.
async fn read_form(
    mut multipart: Multipart,
    max_bytes: usize,
) -> AppResult<(Option<String>, Option<UploadedPart>)> {
    let mut metadata = None;
    let mut upload = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "data" => {
                metadata = Some(field.text().await.map_err(multipart_error)?);
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let mut bytes = Vec::new();
                while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
                    bytes.extend_from_slice(&chunk);
                    check_size(bytes.len(), max_bytes)?;
                }
                upload = Some(UploadedPart { file_name, bytes });
            }
            _ => {}
        }
    }

    Ok((metadata, upload))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Core(CoreError::PayloadTooLarge(err.body_text()))
    } else {
        AppError::BadRequest(err.body_text())
    }
}
