//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod branch_repo;
pub mod faculty_repo;

pub use branch_repo::BranchRepo;
pub use faculty_repo::FacultyRepo;
