//! Reading and replacing the monthly limit.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Error, api::ApiState, budget::MonthlyLimit};

/// The body of a request to set the monthly limit.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitRequest {
    pub monthly_limit: Option<Decimal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitResponse {
    monthly_limit: MonthlyLimit,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLimitResponse {
    success: bool,
    monthly_limit: MonthlyLimit,
}

/// Get the current monthly limit.
pub async fn get_limit(State(state): State<ApiState>) -> Result<Json<LimitResponse>, Error> {
    let monthly_limit = state
        .store
        .fetch_limit()
        .inspect_err(|error| tracing::error!("could not fetch monthly limit: {error}"))?;

    Ok(Json(LimitResponse { monthly_limit }))
}

/// Replace the monthly limit.
///
/// Responds with 400 if the limit is missing or negative.
pub async fn set_limit(
    State(state): State<ApiState>,
    payload: Result<Json<LimitRequest>, JsonRejection>,
) -> Result<Json<SetLimitResponse>, Error> {
    let Json(request) = payload?;
    let amount = request
        .monthly_limit
        .ok_or(Error::MissingField("monthlyLimit"))?;
    let monthly_limit = MonthlyLimit::new(amount)?;

    state
        .store
        .set_limit(monthly_limit)
        .inspect_err(|error| tracing::error!("could not set monthly limit: {error}"))?;

    tracing::info!("Monthly limit set to {monthly_limit}");

    Ok(Json(SetLimitResponse {
        success: true,
        monthly_limit,
    }))
}
