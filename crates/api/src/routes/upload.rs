//! Route definitions for the `/upload` resource: the branch hierarchy and
//! post uploads.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{branch, post as post_handlers};
use crate::state::AppState;

/// Room left for the `data` part and multipart framing on top of the file.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Routes mounted at `/upload`.
///
/// ```text
/// POST /branches                        -> create_branch
/// GET  /branches                        -> list_branches
/// GET  /branches/{branch_id}            -> get_branch
/// POST /subject-Content                 -> subject_content
/// GET  /posts/faculty                   -> posts_by_faculty (requires auth)
/// POST /branches/{branch_id}/subjects   -> add_subject (requires auth)
/// POST /branches/{branch_id}/upload     -> upload_post (requires auth, multipart)
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/branches",
            post(branch::create_branch).get(branch::list_branches),
        )
        .route("/branches/{branch_id}", get(branch::get_branch))
        .route("/subject-Content", post(branch::subject_content))
        .route("/posts/faculty", get(branch::posts_by_faculty))
        .route("/branches/{branch_id}/subjects", post(branch::add_subject))
        .route(
            "/branches/{branch_id}/upload",
            post(post_handlers::upload_post).layer(DefaultBodyLimit::max(
                max_upload_bytes.saturating_add(FORM_OVERHEAD_BYTES),
            )),
        )
}
