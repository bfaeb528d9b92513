use async_trait::async_trait;
use chrono::NaiveDate;
use crate::flight::FlightOffer;
use crate::search::{FlightSearchRequest, TripSearchResult, TripType};
use crate::CoreResult;

/// Source of flight inventory.
///
/// Absence is not an error: unknown airports, identical endpoints or a route with no
/// service all yield an empty list.
#[async_trait]
pub trait FlightCatalog: Send + Sync {
    async fn search(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
    ) -> Vec<FlightOffer>;
}

/// Run a full trip query: validate, fetch each leg, then post-filter.
pub async fn search_trip(
    catalog: &dyn FlightCatalog,
    request: &FlightSearchRequest,
) -> CoreResult<TripSearchResult> {
    request.validate()?;

    let outbound = catalog
        .search(&request.origin, &request.destination, request.departure_date)
        .await;

    let inbound = match (request.trip_type, request.return_date) {
        (TripType::RoundTrip, Some(return_date)) => {
            catalog
                .search(&request.destination, &request.origin, return_date)
                .await
        }
        _ => Vec::new(),
    };

    tracing::debug!(
        "Search {} -> {} on {}: {} outbound, {} inbound before filters",
        request.origin,
        request.destination,
        request.departure_date,
        outbound.len(),
        inbound.len()
    );

    Ok(TripSearchResult {
        outbound: request.filters.apply(outbound),
        inbound: request.filters.apply(inbound),
    })
}
