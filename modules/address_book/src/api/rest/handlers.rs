use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::{StatusCode, Uri},
    response::Json,
    Extension,
};
use problem_details::ProblemResponse;
use tracing::{debug, info};

use crate::api::rest::auth::CurrentOwner;
use crate::api::rest::dto::{ContactDto, ContactReq, ListContactsQuery};
use crate::api::rest::error::map_domain_error;
use crate::contract::model::ContactId;
use crate::domain::service::Service;

/// List the caller's contacts with optional filters and pagination
pub async fn list_contacts(
    Extension(svc): Extension<Arc<Service>>,
    CurrentOwner(owner): CurrentOwner,
    uri: Uri,
    Query(query): Query<ListContactsQuery>,
) -> Result<Json<Vec<ContactDto>>, ProblemResponse> {
    debug!("Listing contacts with query: {:?}", query);

    let contacts = svc
        .list_contacts(owner, query.into())
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;

    Ok(Json(contacts.into_iter().map(ContactDto::from).collect()))
}

/// Get a specific contact by ID
pub async fn get_contact(
    Extension(svc): Extension<Arc<Service>>,
    CurrentOwner(owner): CurrentOwner,
    uri: Uri,
    Path(contact_id): Path<ContactId>,
) -> Result<Json<ContactDto>, ProblemResponse> {
    svc.get_contact(owner, contact_id)
        .await
        .map(|c| Json(ContactDto::from(c)))
        .map_err(|e| map_domain_error(&e, uri.path()))
}

/// Create a new contact
pub async fn create_contact(
    Extension(svc): Extension<Arc<Service>>,
    CurrentOwner(owner): CurrentOwner,
    uri: Uri,
    Json(req): Json<ContactReq>,
) -> Result<(StatusCode, Json<ContactDto>), ProblemResponse> {
    info!("Creating contact for owner {}", owner);

    let contact = svc
        .create_contact(owner, req.into())
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;

    Ok((StatusCode::CREATED, Json(ContactDto::from(contact))))
}

/// Replace every field of an existing contact
pub async fn update_contact(
    Extension(svc): Extension<Arc<Service>>,
    CurrentOwner(owner): CurrentOwner,
    uri: Uri,
    Path(contact_id): Path<ContactId>,
    Json(req): Json<ContactReq>,
) -> Result<Json<ContactDto>, ProblemResponse> {
    info!("Updating contact {}", contact_id);

    svc.update_contact(owner, contact_id, req.into())
        .await
        .map(|c| Json(ContactDto::from(c)))
        .map_err(|e| map_domain_error(&e, uri.path()))
}

/// Delete a contact, returning the removed record
pub async fn delete_contact(
    Extension(svc): Extension<Arc<Service>>,
    CurrentOwner(owner): CurrentOwner,
    uri: Uri,
    Path(contact_id): Path<ContactId>,
) -> Result<Json<ContactDto>, ProblemResponse> {
    info!("Deleting contact {}", contact_id);

    svc.delete_contact(owner, contact_id)
        .await
        .map(|c| Json(ContactDto::from(c)))
        .map_err(|e| map_domain_error(&e, uri.path()))
}
