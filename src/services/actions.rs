//! Row mutations. A successful mutation bumps the list's refresh bridge so
//! that open views re-fetch; failures leave the bridge untouched.

use serde_json::json;
use validator::Validate;

use crate::api::{ApiClient, Mutation};
use crate::domain::types::RecordId;
use crate::forms::{DeleteForm, StatusForm};
use crate::providers::ListingKind;
use crate::refresh::RefreshBridge;
use crate::services::listing::status_options;
use crate::services::{ServiceError, ServiceResult};

fn record_path(kind: ListingKind, id: &str) -> ServiceResult<String> {
    let id = RecordId::new(id).map_err(|err| {
        log::error!("Invalid record id: {err}");
        ServiceError::Form("Некорректный идентификатор записи".to_string())
    })?;
    Ok(format!("{}/{}", kind.path(), id))
}

/// Switches a row to one of the statuses its list filters by.
pub async fn change_status<A>(
    api: &A,
    bridge: &RefreshBridge,
    kind: ListingKind,
    id: &str,
    form: &StatusForm,
) -> ServiceResult<()>
where
    A: ApiClient,
{
    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form("Ошибка валидации формы".to_string()));
    }

    let status = form.status.trim();
    if !status_options(&kind.schema())
        .iter()
        .any(|option| option.value == status)
    {
        return Err(ServiceError::Form(format!("Недопустимый статус: {status}")));
    }

    let path = record_path(kind, id)?;
    api.send_json(&Mutation::patch(path, json!({ "status": status })))
        .await
        .map_err(|err| {
            log::error!("Failed to change status of {} {id}: {err}", kind.name());
            ServiceError::from(err)
        })?;

    bridge.bump();
    Ok(())
}

pub async fn delete_record<A>(
    api: &A,
    bridge: &RefreshBridge,
    kind: ListingKind,
    id: &str,
    form: &DeleteForm,
) -> ServiceResult<()>
where
    A: ApiClient,
{
    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form("Ошибка валидации формы".to_string()));
    }

    let path = record_path(kind, id)?;
    api.send_json(&Mutation::delete(path)).await.map_err(|err| {
        log::error!("Failed to delete {} {id}: {err}", kind.name());
        ServiceError::from(err)
    })?;

    bridge.bump();
    Ok(())
}
