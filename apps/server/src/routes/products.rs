use axum::extract::State;
use axum::Json;
use tracing::debug;

use tally_core::Product;

use crate::error::ApiResult;
use crate::state::AppState;

/// Every product, ordered by id. Out-of-stock products are included.
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = state.db.products().list_all().await?;
    debug!(count = products.len(), "Returning catalog");
    Ok(Json(products))
}
