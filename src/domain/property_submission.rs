use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{RecordId, lenient_number, lenient_timestamp};

/// Property offered by an owner and waiting for moderation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct PropertySubmission {
    pub id: RecordId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, alias = "ownerName")]
    pub owner_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<f64>,
    /// `pending`, `approved` or `rejected`.
    #[serde(default)]
    pub status: String,
    #[serde(default, alias = "submittedAt", deserialize_with = "lenient_timestamp")]
    pub submitted_at: Option<NaiveDateTime>,
}
