use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;

use crate::{
    error::Result,
    handlers::AppState,
    listing::{ListQuery, ListRequest, PageMode, QuerySpec},
    models::shipment::{ShipmentInput, ShipmentSummary},
};

/// Listing response wrapper. Paging fields are only serialized for
/// page-based consumers; the infinite-scroll grid gets rows and a total.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEnvelope {
    pub total_data: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<i64>,
    pub data: Vec<ShipmentSummary>,
}

pub fn build_envelope(spec: &QuerySpec, total_data: i64, data: Vec<ShipmentSummary>) -> ListEnvelope {
    match spec.mode {
        PageMode::Paged { page } => {
            let total_pages = if spec.limit > 0 {
                (total_data + spec.limit - 1) / spec.limit
            } else {
                0
            };
            ListEnvelope {
                total_data,
                total_pages: Some(total_pages),
                current_page: Some(page),
                data,
            }
        }
        PageMode::RowRange => ListEnvelope {
            total_data,
            total_pages: None,
            current_page: None,
            data,
        },
    }
}

/// Handler for the POST listing shapes (filters+pagination, or the grid's
/// startRow/endRow block request)
pub async fn list_shipments(
    State(state): State<AppState>,
    Json(request): Json<ListRequest>,
) -> Result<impl IntoResponse> {
    let spec = request.normalize();
    let (data, total) = state.shipment_store.list(&spec).await?;
    Ok((StatusCode::OK, Json(build_envelope(&spec, total, data))))
}

/// Handler for the flat GET query-string listing shape
pub async fn list_shipments_query(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let spec = params.normalize();
    let (data, total) = state.shipment_store.list(&spec).await?;
    Ok((StatusCode::OK, Json(build_envelope(&spec, total, data))))
}

/// Handler for registering a shipment with its line items
pub async fn create_shipment(
    State(state): State<AppState>,
    Json(input): Json<ShipmentInput>,
) -> Result<impl IntoResponse> {
    let valid = input.validated()?;
    let created = state.shipment_store.create(&valid).await?;

    tracing::info!(id = created.pengiriman.id, "pengiriman created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// Get a shipment by ID handler
pub async fn get_shipment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let detail = state.shipment_store.get_by_id(id).await?;
    Ok((StatusCode::OK, Json(detail)))
}

/// Update a shipment handler: partial fields, full line-item replacement
pub async fn update_shipment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ShipmentInput>,
) -> Result<impl IntoResponse> {
    let updated = state.shipment_store.update(id, &input).await?;
    Ok((StatusCode::OK, Json(updated)))
}

/// Delete a shipment handler
pub async fn delete_shipment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.shipment_store.delete(id).await?;

    tracing::info!(id, "pengiriman deleted");

    Ok(StatusCode::NO_CONTENT)
}
