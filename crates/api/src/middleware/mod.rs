//! Request extractors shared by handlers.
//!
//! - [`auth::AuthFaculty`] -- Extracts the authenticated faculty from a Bearer token.
//! - [`validated_json::ValidatedJson`] -- Deserializes and schema-checks a JSON body.

pub mod auth;
pub mod validated_json;
