use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use skyfare_order::wallet::LedgerTotals;
use skyfare_order::{Transaction, TransactionKind};
use skyfare_shared::CURRENCY;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct WalletResponse {
    pub balance: Decimal,
    pub initial_balance: Decimal,
    pub currency: &'static str,
    pub totals: LedgerTotals,
}

#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    pub kind: Option<TransactionKind>,
}

#[derive(Debug, Deserialize)]
pub struct TopUpRequest {
    pub amount: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TopUpResponse {
    pub transaction: Transaction,
    pub balance: Decimal,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/wallet", get(get_wallet))
        .route("/v1/wallet/transactions", get(list_transactions))
        .route("/v1/wallet/topups", post(top_up))
}

/// GET /v1/wallet
async fn get_wallet(State(state): State<AppState>, headers: HeaderMap) -> Json<WalletResponse> {
    let session = state.session(&headers).await;
    let desk = session.lock().await;
    let wallet = desk.wallet();

    Json(WalletResponse {
        balance: wallet.balance(),
        initial_balance: wallet.initial_balance(),
        currency: CURRENCY,
        totals: wallet.totals(),
    })
}

/// GET /v1/wallet/transactions?kind=credit|debit
async fn list_transactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TransactionQuery>,
) -> Json<Vec<Transaction>> {
    let session = state.session(&headers).await;
    let desk = session.lock().await;

    let transactions = match query.kind {
        Some(kind) => desk.wallet().list_transactions_by_kind(kind),
        None => desk.wallet().list_transactions(),
    };
    Json(transactions)
}

/// POST /v1/wallet/topups
async fn top_up(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<TopUpRequest>,
) -> Result<(StatusCode, Json<TopUpResponse>), AppError> {
    let session = state.session(&headers).await;
    let mut desk = session.lock().await;
    let transaction = desk.top_up(req.amount, req.description)?;

    Ok((
        StatusCode::CREATED,
        Json(TopUpResponse {
            transaction,
            balance: desk.wallet().balance(),
        }),
    ))
}
