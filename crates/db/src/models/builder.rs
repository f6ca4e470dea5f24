//! Page-builder sites and pages.
//!
//! A page's `tree` column holds the editor document as JSONB. It is
//! validated by `evently_core::page_tree` before every write.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use evently_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Sites
// ---------------------------------------------------------------------------

/// A row from the `builder_sites` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Site {
    pub id: DbId,
    pub owner_id: DbId,
    pub event_id: Option<DbId>,
    pub name: String,
    pub slug: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateSite {
    pub name: String,
    /// Derived from `name` when absent.
    pub slug: Option<String>,
    pub event_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSite {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub event_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

pub const PAGE_STATUS_DRAFT: &str = "draft";
pub const PAGE_STATUS_PUBLISHED: &str = "published";

/// Page type of pages not created from a template.
pub const PAGE_TYPE_CUSTOM: &str = "custom";

/// A row from the `builder_pages` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Page {
    pub id: DbId,
    pub site_id: DbId,
    pub event_id: Option<DbId>,
    pub name: String,
    pub slug: String,
    pub tree: serde_json::Value,
    pub status: String,
    pub page_type: String,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Page listing entry without the (potentially large) tree.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PageSummary {
    pub id: DbId,
    pub site_id: DbId,
    pub event_id: Option<DbId>,
    pub name: String,
    pub slug: String,
    pub status: String,
    pub page_type: String,
    pub published_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreatePage {
    pub name: String,
    pub slug: Option<String>,
    pub event_id: Option<DbId>,
    pub page_type: Option<String>,
    /// Starts as the empty document when absent.
    pub tree: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePage {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub event_id: Option<DbId>,
    pub page_type: Option<String>,
}

/// Body of `PUT /pages/{id}/tree`.
#[derive(Debug, Deserialize)]
pub struct SaveTree {
    pub tree: serde_json::Value,
}

/// Body of `POST /builder/templates/{key}/instantiate`.
#[derive(Debug, Deserialize)]
pub struct InstantiateTemplate {
    pub event_id: DbId,
    /// Existing site to add the page to; a site for the event is created
    /// when absent.
    pub site_id: Option<DbId>,
    pub name: Option<String>,
    pub slug: Option<String>,
}
