use serde::{Deserialize, Serialize};

/// No field is required at the API layer; the UI form is the only place
/// a title is enforced. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PostCreateRequest {
    pub title: String,
    pub content: String,
}

/// Partial payload with "set" semantics: omitted fields stay untouched.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PostUpdateRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}
