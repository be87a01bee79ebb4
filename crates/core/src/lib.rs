//! Domain layer for campusdocs.
//!
//! Pure types and rules with no I/O: the Branch → Year → Subject hierarchy
//! and its mutations, upload naming rules, account field normalization, and
//! field-level validation reporting.

pub mod error;
pub mod faculty;
pub mod hierarchy;
pub mod types;
pub mod upload;
pub mod validation;
