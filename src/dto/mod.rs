//! DTO modules that bridge services with templates and APIs.

pub mod listing;
pub mod table;
