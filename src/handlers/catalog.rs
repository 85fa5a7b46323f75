use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{error::Result, handlers::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KatalogInput {
    pub nama_barang: Option<String>,
}

/// List all catalog items handler
pub async fn list_catalog(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let items = state.catalog_store.list().await?;
    Ok((StatusCode::OK, Json(items)))
}

/// Create a catalog item handler
pub async fn create_catalog_item(
    State(state): State<AppState>,
    Json(input): Json<KatalogInput>,
) -> Result<impl IntoResponse> {
    let item = state
        .catalog_store
        .create(input.nama_barang.as_deref().unwrap_or_default())
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}
