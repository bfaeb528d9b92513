use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use skyfare_catalog::{Checkout, PricedOffer};
use skyfare_core::airports::search_airports;
use skyfare_core::repository::search_trip;
use skyfare_core::{Airport, FlightSearchRequest};
use skyfare_shared::CURRENCY;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AirportQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub currency: &'static str,
    pub outbound: Vec<PricedOffer>,
    pub inbound: Vec<PricedOffer>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/airports", get(list_airports))
        .route("/v1/flights/search", post(search_flights))
        .route("/v1/flights/{id}/quote", get(quote_flight))
        .route("/v1/flights/{id}/attempts", post(record_attempt))
}

/// GET /v1/airports?q=
async fn list_airports(Query(query): Query<AirportQuery>) -> Json<Vec<Airport>> {
    Json(search_airports(query.q.as_deref().unwrap_or("")))
}

/// POST /v1/flights/search
/// Offers come back with the caller's current display price.
async fn search_flights(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<FlightSearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let result = search_trip(state.catalog.as_ref(), &req).await?;

    let session = state.session(&headers).await;
    let mut desk = session.lock().await;
    let now = Utc::now();

    let outbound = desk.publish_offers(&result.outbound, now);
    let inbound = desk.publish_offers(&result.inbound, now);

    tracing::info!(
        "Search {} -> {}: {} outbound, {} inbound offers",
        req.origin, req.destination, outbound.len(), inbound.len()
    );

    Ok(Json(SearchResponse {
        currency: CURRENCY,
        outbound,
        inbound,
    }))
}

/// GET /v1/flights/{id}/quote
async fn quote_flight(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(flight_id): Path<String>,
) -> Result<Json<PricedOffer>, AppError> {
    let session = state.session(&headers).await;
    let desk = session.lock().await;
    Ok(Json(desk.quote(&flight_id, Utc::now())?))
}

/// POST /v1/flights/{id}/attempts
/// The "Book" click. Returns the price that confirmation will charge.
async fn record_attempt(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(flight_id): Path<String>,
) -> Result<Json<Checkout>, AppError> {
    let session = state.session(&headers).await;
    let mut desk = session.lock().await;
    Ok(Json(desk.begin_checkout(&flight_id, Utc::now())?))
}
