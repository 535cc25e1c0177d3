//! Sale ledger endpoints.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tracing::{debug, info};

use tally_core::receipt::ReceiptRequest;
use tally_core::validation::{validate_id, validate_new_sale};
use tally_core::{NewSale, SaleDetail, SaleSummary};

use crate::error::{ApiError, ApiResult};
use crate::routes::Ack;
use crate::state::AppState;

/// `{"success": true, "saleId": 42}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleCreated {
    pub success: bool,
    pub sale_id: i64,
}

/// Commits a checkout: header, lines and stock decrements in one transaction.
pub async fn create_sale(
    State(state): State<AppState>,
    payload: Result<Json<NewSale>, JsonRejection>,
) -> ApiResult<Json<SaleCreated>> {
    let Json(sale) = payload?;
    validate_new_sale(&sale)?;

    let sale_id = state.db.sales().commit(&sale).await?;

    Ok(Json(SaleCreated {
        success: true,
        sale_id,
    }))
}

/// Sale history, newest first.
pub async fn list_sales(State(state): State<AppState>) -> ApiResult<Json<Vec<SaleSummary>>> {
    let sales = state.db.sales().list_summaries().await?;
    debug!(count = sales.len(), "Returning sale history");
    Ok(Json(sales))
}

/// One sale with its lines.
pub async fn get_sale(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<SaleDetail>> {
    let id = sale_id(id)?;
    let detail = find_sale(&state, id).await?;
    Ok(Json(detail))
}

/// Reprints a stored sale from its persisted lines.
pub async fn reprint_sale(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Ack>> {
    let id = sale_id(id)?;
    let detail = find_sale(&state, id).await?;

    info!(sale_id = id, "Reprinting receipt");
    state
        .printer
        .print_receipt(&ReceiptRequest::from(detail))
        .await?;

    Ok(Json(Ack::ok()))
}

fn sale_id(id: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    let Path(id) = id?;
    validate_id("id", id)?;
    Ok(id)
}

async fn find_sale(state: &AppState, id: i64) -> ApiResult<SaleDetail> {
    state
        .db
        .sales()
        .get_detail(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale", id))
}
