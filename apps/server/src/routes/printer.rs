//! Printer endpoints. Failures come back as 502; nothing is retried.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use tally_core::receipt::ReceiptRequest;
use tally_core::validation::validate_receipt_request;

use crate::error::ApiResult;
use crate::routes::Ack;
use crate::state::AppState;

/// Prints the receipt the caller sends, as sent.
pub async fn print_receipt(
    State(state): State<AppState>,
    payload: Result<Json<ReceiptRequest>, JsonRejection>,
) -> ApiResult<Json<Ack>> {
    let Json(receipt) = payload?;
    validate_receipt_request(&receipt)?;

    state.printer.print_receipt(&receipt).await?;
    Ok(Json(Ack::ok()))
}

/// Kicks the cash drawer open.
pub async fn open_drawer(State(state): State<AppState>) -> ApiResult<Json<Ack>> {
    state.printer.open_drawer().await?;
    Ok(Json(Ack::ok()))
}
