//! Request handlers.
//!
//! Each submodule holds the async handler functions for one resource.
//! Handlers delegate persistence to the repositories in `campusdocs_db`,
//! domain rules to `campusdocs_core`, and map errors via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod branch;
pub mod faculty;
pub mod fallback;
pub mod post;
