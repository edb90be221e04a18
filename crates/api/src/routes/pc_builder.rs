//! PC-builder route handler.

use axum::{Json, extract::State};

use crate::error::Result;
use crate::services::pc_builder::{BuildCheckRequest, BuildCheckResponse, PcBuilderService};
use crate::state::AppState;

pub async fn check(
    State(state): State<AppState>,
    Json(req): Json<BuildCheckRequest>,
) -> Result<Json<BuildCheckResponse>> {
    let response = PcBuilderService::new(&state).check(&req).await?;
    Ok(Json(response))
}
