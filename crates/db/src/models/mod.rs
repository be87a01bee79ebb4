pub mod branch;
pub mod faculty;
