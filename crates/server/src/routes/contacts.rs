use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use models::contact::{Contact, ContactPatch};
use models::validate;

use crate::errors::{ApiError, AppJson};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewContact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

#[utoipa::path(get, path = "/api/contacts", tag = "contacts", responses((status = 200, description = "All contacts", body = [Contact])))]
pub async fn list(State(state): State<AppState>) -> Json<Vec<Contact>> {
    Json(state.contacts.list().await)
}

#[utoipa::path(get, path = "/api/contacts/{id}", tag = "contacts", params(("id" = String, Path, description = "Contact id")), responses((status = 200, description = "The contact", body = Contact), (status = 404, description = "Not found")))]
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Contact>, ApiError> {
    state
        .contacts
        .get_by_id(&id)
        .await
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

#[utoipa::path(post, path = "/api/contacts", tag = "contacts", request_body = crate::openapi::NewContactRequest, responses((status = 201, description = "Created contact", body = Contact), (status = 400, description = "Bad Request")))]
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<NewContact>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    validate::validate_name(&input.name)?;
    validate::validate_email(&input.email)?;
    validate::validate_phone(&input.phone)?;

    let contact = state.contacts.add(&input.name, &input.email, &input.phone).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

#[utoipa::path(put, path = "/api/contacts/{id}", tag = "contacts", params(("id" = String, Path, description = "Contact id")), request_body = ContactPatch, responses((status = 200, description = "Merged contact", body = Contact), (status = 400, description = "Bad Request"), (status = 404, description = "Not found")))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<ContactPatch>,
) -> Result<Json<Contact>, ApiError> {
    if patch.is_empty() {
        return Err(ApiError::bad_request("Body must have at least one field"));
    }
    if let Some(name) = &patch.name {
        validate::validate_name(name)?;
    }
    if let Some(email) = &patch.email {
        validate::validate_email(email)?;
    }
    if let Some(phone) = &patch.phone {
        validate::validate_phone(phone)?;
    }

    state
        .contacts
        .update(&id, &patch)
        .await?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

#[utoipa::path(delete, path = "/api/contacts/{id}", tag = "contacts", params(("id" = String, Path, description = "Contact id")), responses((status = 200, description = "Removed contact", body = Contact), (status = 404, description = "Not found")))]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Contact>, ApiError> {
    state
        .contacts
        .remove(&id)
        .await?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}
