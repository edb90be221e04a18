//! Admin dashboard statistics.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;

use crate::db::statistics::StatisticsRepository;
use crate::error::Result;
use crate::middleware::auth::RequireAdmin;
use crate::models::statistics::Dashboard;
use crate::state::AppState;

/// Default window when no range is given.
const DEFAULT_RANGE_DAYS: i64 = 30;

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Dashboard>> {
    let today = Utc::now().date_naive();
    let to = query.to.unwrap_or(today);
    let from = query
        .from
        .unwrap_or_else(|| to - Duration::days(DEFAULT_RANGE_DAYS));
    // A reversed range is treated as a single day.
    let from = from.min(to);

    let dashboard = StatisticsRepository::new(state.pool())
        .dashboard(from, to)
        .await?;
    Ok(Json(dashboard))
}
