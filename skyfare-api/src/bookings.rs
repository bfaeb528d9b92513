use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use skyfare_order::{BookingRecord, BookingStatus, Passenger};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PassengerInput {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub flight_id: String,
    /// Price returned by the last attempt for this flight
    pub quoted_price: Decimal,
    pub passenger: PassengerInput,
}

#[derive(Debug, Serialize)]
pub struct BookingView {
    #[serde(flatten)]
    pub record: BookingRecord,
    pub travel_status: BookingStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketFormat {
    Html,
    Text,
    #[default]
    Json,
}

#[derive(Debug, Deserialize)]
pub struct TicketQuery {
    #[serde(default)]
    pub format: TicketFormat,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking).get(list_bookings))
        .route("/v1/bookings/{reference}", get(get_booking))
        .route("/v1/bookings/{reference}/ticket", get(get_ticket))
}

/// POST /v1/bookings
async fn create_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingRecord>), AppError> {
    let passenger = Passenger::new(&req.passenger.name, &req.passenger.email, &req.passenger.phone);
    tracing::debug!("Booking {} for {} <{}>", req.flight_id, passenger.name, passenger.email);

    let session = state.session(&headers).await;
    let mut desk = session.lock().await;
    let record = desk.confirm(&req.flight_id, req.quoted_price, passenger, Utc::now())?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /v1/bookings
/// Newest first, with the status as of now.
async fn list_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<Vec<BookingView>> {
    let session = state.session(&headers).await;
    let desk = session.lock().await;
    let now = Utc::now();

    let views = desk
        .bookings()
        .list_bookings_newest_first()
        .into_iter()
        .map(|record| BookingView {
            record: record.clone(),
            travel_status: record.travel_status(now),
        })
        .collect();

    Json(views)
}

/// GET /v1/bookings/{reference}
async fn get_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(reference): Path<String>,
) -> Result<Json<BookingView>, AppError> {
    let session = state.session(&headers).await;
    let desk = session.lock().await;
    let record = desk.bookings().get_booking(&reference)?;

    Ok(Json(BookingView {
        record: record.clone(),
        travel_status: record.travel_status(Utc::now()),
    }))
}

/// GET /v1/bookings/{reference}/ticket?format=html|text|json
async fn get_ticket(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(reference): Path<String>,
    Query(query): Query<TicketQuery>,
) -> Result<Response, AppError> {
    let session = state.session(&headers).await;
    let ticket = session.lock().await.ticket(&reference)?;

    let response = match query.format {
        TicketFormat::Html => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            ticket.to_html(),
        )
            .into_response(),
        TicketFormat::Text => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            ticket.to_text(),
        )
            .into_response(),
        TicketFormat::Json => Json(ticket).into_response(),
    };

    Ok(response)
}
