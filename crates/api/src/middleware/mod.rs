//! Request extractors.
//!
//! - [`auth::AuthUser`] -- the organizer behind a JWT Bearer token.

pub mod auth;
