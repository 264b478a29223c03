use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{RecordId, lenient_number, lenient_timestamp};

/// Marketing campaign promoting a set of listings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Campaign {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub channel: String,
    /// `draft`, `active` or `finished`.
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub budget: Option<f64>,
    #[serde(default, alias = "startsAt", deserialize_with = "lenient_timestamp")]
    pub starts_at: Option<NaiveDateTime>,
    #[serde(default, alias = "endsAt", deserialize_with = "lenient_timestamp")]
    pub ends_at: Option<NaiveDateTime>,
}
