//! Route definitions for the `/faculty` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::faculty;
use crate::state::AppState;

/// Routes mounted at `/faculty`.
///
/// ```text
/// POST   /                  -> signup
/// PATCH  /                  -> update_current (requires auth)
/// DELETE /                  -> delete_current (requires auth)
/// POST   /signin            -> signin
/// GET    /faculty-details   -> get_current (requires auth)
/// GET    /{id}              -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(faculty::signup)
                .patch(faculty::update_current)
                .delete(faculty::delete_current),
        )
        .route("/signin", post(faculty::signin))
        .route("/faculty-details", get(faculty::get_current))
        .route("/{id}", get(faculty::get_by_id))
}
