//! Address book handlers
//!
//! Simple owner-scoped CRUD with one invariant: at most one default address
//! per user, and the default cannot be deleted.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use arbor_db::{AddressFields, AddressRepository, CreateAddress};

use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthUser;
use crate::handlers::checkout::AddressResponse;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AddressRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

impl AddressRequest {
    fn into_fields(self) -> Result<AddressFields, ApiError> {
        let required = [
            &self.street_address,
            &self.city,
            &self.state,
            &self.zip_code,
            &self.country,
        ];
        if required.iter().any(|f| f.trim().is_empty()) {
            return Err(ApiError::BadRequest(
                "Please correct the errors in your address form.".to_string(),
            ));
        }

        Ok(AddressFields {
            first_name: self.first_name,
            last_name: self.last_name,
            street_address: self.street_address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            country: self.country,
            is_default: self.is_default,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct AddressListResponse {
    pub addresses: Vec<AddressResponse>,
}

#[derive(Debug, Serialize)]
pub struct AddressMutationResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressResponse>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/addresses
pub async fn list_addresses(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<AddressListResponse>> {
    let addresses = state.repos.addresses.list_by_user(user.user_id.0).await?;

    Ok(Json(AddressListResponse {
        addresses: addresses.iter().map(AddressResponse::from).collect(),
    }))
}

/// POST /api/v1/addresses
pub async fn create_address(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<AddressRequest>,
) -> ApiResult<Json<AddressMutationResponse>> {
    let fields = req.into_fields()?;

    let address = state
        .repos
        .addresses
        .create(CreateAddress {
            id: Uuid::new_v4(),
            user_id: user.user_id.0,
            fields,
        })
        .await?;

    Ok(Json(AddressMutationResponse {
        success: true,
        message: "Address added successfully!".to_string(),
        address: Some(AddressResponse::from(&address)),
    }))
}

/// PUT /api/v1/addresses/{id}
pub async fn update_address(
    State(state): State<AppState>,
    user: AuthUser,
    Path(address_id): Path<Uuid>,
    Json(req): Json<AddressRequest>,
) -> ApiResult<Json<AddressMutationResponse>> {
    let fields = req.into_fields()?;

    let address = state
        .repos
        .addresses
        .update(address_id, user.user_id.0, fields)
        .await?;

    Ok(Json(AddressMutationResponse {
        success: true,
        message: "Address updated successfully!".to_string(),
        address: Some(AddressResponse::from(&address)),
    }))
}

/// POST /api/v1/addresses/{id}/default
pub async fn set_default_address(
    State(state): State<AppState>,
    user: AuthUser,
    Path(address_id): Path<Uuid>,
) -> ApiResult<Json<AddressMutationResponse>> {
    state
        .repos
        .addresses
        .set_default(user.user_id.0, address_id)
        .await?;

    Ok(Json(AddressMutationResponse {
        success: true,
        message: "Default address updated.".to_string(),
        address: None,
    }))
}

/// DELETE /api/v1/addresses/{id}
pub async fn delete_address(
    State(state): State<AppState>,
    user: AuthUser,
    Path(address_id): Path<Uuid>,
) -> ApiResult<Json<AddressMutationResponse>> {
    let address = state
        .repos
        .addresses
        .find_for_user(address_id, user.user_id.0)
        .await?
        .ok_or_else(|| ApiError::NotFound("address not found".to_string()))?;

    if address.is_default {
        return Err(ApiError::Conflict(
            "Cannot delete the default address. Please set another address as default first."
                .to_string(),
        ));
    }

    state.repos.addresses.delete(address.id).await?;

    Ok(Json(AddressMutationResponse {
        success: true,
        message: "Address deleted successfully.".to_string(),
        address: None,
    }))
}
