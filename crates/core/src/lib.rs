//! Pure domain logic for the Evently platform.
//!
//! Nothing in this crate performs I/O. The database, HTTP and email layers
//! call into these modules for validation, page-tree bookkeeping, template
//! instantiation, block rendering and checkout arithmetic.

pub mod access_code;
pub mod blocks;
pub mod checkout;
pub mod email_template;
pub mod error;
pub mod event;
pub mod page_template;
pub mod page_tree;
pub mod participant;
pub mod qr;
pub mod render;
pub mod sender;
pub mod slug;
pub mod types;
