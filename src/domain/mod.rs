//! Domain row types shown in the dashboard lists and the query model.

pub mod appointment;
pub mod campaign;
pub mod client;
pub mod influencer;
pub mod partner;
pub mod property_submission;
pub mod query;
pub mod short_link;
pub mod types;
