//! The app-proxy reservation endpoint.
//!
//! A single route dispatches on the `action` query parameter the way the
//! storefront proxy sends it: `reserve`, `check`, or `release`, with the
//! default depending on the HTTP method.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};

use stockhold_core::error::AppError;
use stockhold_service::reservation::manager::ReserveOutcome;

use crate::dto::request::ReserveBody;
use crate::dto::response::{ApiResponse, HoldStatusResponse, ReleaseResponse, ReserveResponse};
use crate::state::AppState;

/// GET|POST /apps/reserve
pub async fn reserve_proxy(
    State(state): State<AppState>,
    method: Method,
    Query(params): Query<HashMap<String, String>>,
    body: Option<Json<ReserveBody>>,
) -> Result<Response, AppError> {
    // The trust signal gates everything; no store access before it passes.
    if !state.signature.verify(&params) {
        return Err(AppError::unauthorized("invalid or missing signature"));
    }

    let action = params
        .get("action")
        .map(|a| a.to_lowercase())
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| default_action(&method).to_string());

    let variant_id = params
        .get("variant_id")
        .cloned()
        .filter(|v| !v.is_empty())
        .or_else(|| body.and_then(|Json(b)| b.variant_id))
        .unwrap_or_default();

    match action.as_str() {
        "reserve" => {
            let outcome = state.reservations.reserve(&variant_id).await?;
            Ok(reserve_response(outcome))
        }
        "check" => {
            let status = state.reservations.check(&variant_id).await?;
            Ok(Json(ApiResponse::ok(HoldStatusResponse {
                reserved: status.reserved,
                reserved_until: status.reserved_until,
            }))
            .into_response())
        }
        "release" => {
            state.reservations.release(&variant_id).await?;
            Ok(Json(ApiResponse::ok(ReleaseResponse { released: true })).into_response())
        }
        other => Err(AppError::validation(format!("invalid action '{other}'"))),
    }
}

/// GET defaults to a read, anything else to a reserve.
fn default_action(method: &Method) -> &'static str {
    if method == Method::GET { "check" } else { "reserve" }
}

/// A created hold is 200; a lost race is 409 carrying the winner's expiry.
fn reserve_response(outcome: ReserveOutcome) -> Response {
    match outcome {
        ReserveOutcome::Created { reserved_until } => Json(ApiResponse::ok(ReserveResponse {
            reserved: true,
            reserved_until: Some(reserved_until),
        }))
        .into_response(),
        ReserveOutcome::AlreadyHeld { reserved_until } => (
            StatusCode::CONFLICT,
            Json(ApiResponse::ok(ReserveResponse {
                reserved: false,
                reserved_until,
            })),
        )
            .into_response(),
    }
}
