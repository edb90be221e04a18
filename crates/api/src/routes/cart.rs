//! Cart validation route handler.

use axum::{Json, extract::State};

use crate::error::Result;
use crate::models::cart::{ValidateCartRequest, ValidateCartResponse};
use crate::services::cart::CartService;
use crate::state::AppState;

pub async fn validate(
    State(state): State<AppState>,
    Json(req): Json<ValidateCartRequest>,
) -> Result<Json<ValidateCartResponse>> {
    let response = CartService::new(&state).validate(&req).await?;
    Ok(Json(response))
}
