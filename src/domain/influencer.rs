use serde::{Deserialize, Serialize};

use crate::domain::types::{RecordId, lenient_count};

/// Social media partner promoting listings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Influencer {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub handle: Option<String>,
    /// `instagram`, `tiktok`, `youtube` or `telegram`.
    #[serde(default)]
    pub platform: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub followers: u64,
    #[serde(default)]
    pub status: String,
}
