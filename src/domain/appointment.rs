use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{RecordId, lenient_timestamp};

/// Viewing or consultation booked between a client and an agent.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Appointment {
    pub id: RecordId,
    #[serde(default, alias = "clientName")]
    pub client_name: String,
    #[serde(default, alias = "propertyTitle")]
    pub property_title: Option<String>,
    #[serde(default, alias = "agentName")]
    pub agent_name: Option<String>,
    #[serde(default, alias = "scheduledAt", deserialize_with = "lenient_timestamp")]
    pub scheduled_at: Option<NaiveDateTime>,
    /// `scheduled`, `completed` or `cancelled`.
    #[serde(default)]
    pub status: String,
}
