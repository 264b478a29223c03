use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{RecordId, lenient_count, lenient_timestamp};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct ShortLink {
    pub id: RecordId,
    #[serde(default, alias = "slug")]
    pub code: String,
    #[serde(default, alias = "targetUrl", alias = "url")]
    pub target_url: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub clicks: u64,
    #[serde(default)]
    pub status: String,
    #[serde(default, alias = "createdAt", deserialize_with = "lenient_timestamp")]
    pub created_at: Option<NaiveDateTime>,
}
