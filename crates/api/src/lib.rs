//! HTTP surface of Evently: organizer dashboard API, public pages,
//! check-in scanner, checkout and the email relay.
//!
//! `main.rs` and the integration tests both go through
//! [`router::build_app_router`].

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
