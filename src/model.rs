//! Data models for the link shortener
//!
//! This module defines the persisted link record and the request bodies
//! accepted by the admin API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short code and its destination, with click analytics
///
/// Stored as JSON in the links table and returned as-is by the admin API.
///
/// # Example
/// ```json
/// {
///   "id": "0b5f1c3e-8a1d-4f63-9a55-3c2a9b7d2e10",
///   "code": "aZ3k9Q",
///   "targetUrl": "https://example.com/a",
///   "clicks": 1,
///   "createdAt": "2026-01-17T13:40:00Z",
///   "lastClicked": "2026-01-17T13:41:07Z",
///   "updatedAt": "2026-01-17T13:41:07Z"
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Unique record identifier (UUID v4), assigned at creation
    pub id: String,

    /// Short code the link is reachable under
    pub code: String,

    /// Destination URL, stored exactly as submitted
    pub target_url: String,

    /// Number of successful redirects
    #[serde(default)]
    pub clicks: u64,

    pub created_at: DateTime<Utc>,

    /// Time of the most recent redirect; `None` until the first click
    pub last_clicked: Option<DateTime<Utc>>,

    /// Bumped whenever any field changes, click increments included
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a link
///
/// Both fields are optional at the type level so that a missing `targetUrl`
/// is reported as a validation error rather than a deserialization failure.
///
/// # Example
/// ```json
/// {
///   "targetUrl": "https://example.com/very/long/url",
///   "code": "myLink1"
/// }
/// ```
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    /// Destination URL
    pub target_url: Option<String>,

    /// Optional caller-chosen code; a random 6-character code is generated if absent
    pub code: Option<String>,
}
