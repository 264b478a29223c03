use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{RecordId, lenient_timestamp};

/// Referral partner (agency, developer, mortgage broker).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Partner {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default, rename = "type", alias = "partner_type")]
    pub partner_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "createdAt", deserialize_with = "lenient_timestamp")]
    pub created_at: Option<NaiveDateTime>,
}
