//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;

/// A blog post. The identifier is opaque text assigned by whichever
/// backend created the record and is never reassigned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Set once at creation. Always present on the fallback path; the
    /// primary store populates it from the row default.
    #[serde(with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}
