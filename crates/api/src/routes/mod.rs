pub mod faculty;
pub mod health;
pub mod upload;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /faculty                                 signup, update, delete
/// /faculty/signin                          signin (public)
/// /faculty/faculty-details                 caller's profile
/// /faculty/{id}                            profile by id
///
/// /upload/branches                         create, list
/// /upload/branches/{branch_id}             get
/// /upload/branches/{branch_id}/subjects    add subject
/// /upload/branches/{branch_id}/upload      upload article or file (multipart)
/// /upload/subject-Content                  posts of one subject
/// /upload/posts/faculty                    caller's posts
/// ```
pub fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .nest("/faculty", faculty::router())
        .nest("/upload", upload::router(max_upload_bytes))
}
