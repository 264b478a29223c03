//! Form definitions backing the row action routes.

use serde::Deserialize;
use validator::Validate;

/// Status switch submitted from a list row.
#[derive(Debug, Deserialize, Validate)]
pub struct StatusForm {
    #[validate(length(min = 1, max = 64))]
    pub status: String,
    /// List query to return to after the action.
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub query: String,
}

/// Row deletion confirmed from a list row.
#[derive(Debug, Deserialize, Validate)]
pub struct DeleteForm {
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub query: String,
}
