//! Services orchestrating list loading, row actions and exports.

use std::collections::HashMap;

use thiserror::Error;

use crate::api::ApiError;
use crate::providers::{ListingKind, ProviderError};
use crate::refresh::RefreshBridge;
use crate::session::SessionError;

pub mod actions;
pub mod export;
pub mod listing;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Form(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("backend error: {0}")]
    Api(ApiError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl From<ApiError> for ServiceError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => ServiceError::Unauthorized,
            ApiError::Status { status: 404, .. } => ServiceError::NotFound,
            other => ServiceError::Api(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// One refresh bridge per list page, shared by the action handlers.
#[derive(Debug)]
pub struct RefreshBridges {
    bridges: HashMap<ListingKind, RefreshBridge>,
}

impl Default for RefreshBridges {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshBridges {
    pub fn new() -> Self {
        let bridges = ListingKind::ALL
            .into_iter()
            .map(|kind| {
                let bridge = RefreshBridge::new().with_callback(move |key| {
                    log::info!("{} list marked stale, refresh key {key}", kind.name());
                });
                (kind, bridge)
            })
            .collect();
        Self { bridges }
    }

    pub fn get(&self, kind: ListingKind) -> &RefreshBridge {
        &self.bridges[&kind]
    }
}
