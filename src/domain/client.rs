use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{RecordId, lenient_timestamp};

/// Customer of the brokerage as listed on the clients page.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Client {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// `active` or `suspended`.
    #[serde(default)]
    pub status: String,
    #[serde(default, alias = "agentName")]
    pub agent_name: Option<String>,
    #[serde(default, alias = "createdAt", deserialize_with = "lenient_timestamp")]
    pub created_at: Option<NaiveDateTime>,
}
