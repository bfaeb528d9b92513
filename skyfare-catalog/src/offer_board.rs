use chrono::{DateTime, Duration, Utc};
use skyfare_core::{CoreError, CoreResult, FlightOffer};
use std::collections::HashMap;

pub const DEFAULT_OFFER_TTL_SECONDS: i64 = 30 * 60;

struct PostedOffer {
    offer: FlightOffer,
    expires_at: DateTime<Utc>,
}

/// Offers shown to one user, kept so a later "Book" can be resolved by identifier.
///
/// Generated offers cannot be fetched again, so the board is the only place a flight id
/// can be turned back into a snapshot.
pub struct OfferBoard {
    offers: HashMap<String, PostedOffer>,
    ttl: Duration,
}

impl OfferBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            offers: HashMap::new(),
            ttl,
        }
    }

    /// Post search results; reposting an id refreshes its expiry.
    pub fn post(&mut self, offers: &[FlightOffer], now: DateTime<Utc>) {
        let expires_at = now + self.ttl;
        for offer in offers {
            self.offers.insert(
                offer.id.clone(),
                PostedOffer {
                    offer: offer.clone(),
                    expires_at,
                },
            );
        }
    }

    /// Get an offer if it hasn't expired
    pub fn get(&self, flight_id: &str, now: DateTime<Utc>) -> Option<&FlightOffer> {
        self.offers
            .get(flight_id)
            .filter(|posted| now < posted.expires_at)
            .map(|posted| &posted.offer)
    }

    pub fn resolve(&self, flight_id: &str, now: DateTime<Utc>) -> CoreResult<&FlightOffer> {
        self.get(flight_id, now)
            .ok_or_else(|| CoreError::NotFound(format!("flight {}", flight_id)))
    }

    /// Drop expired offers, returning how many were removed.
    pub fn cleanup_expired(&mut self, now: DateTime<Utc>) -> usize {
        let initial_count = self.offers.len();
        self.offers.retain(|_, posted| now < posted.expires_at);
        initial_count - self.offers.len()
    }

    pub fn active_count(&self, now: DateTime<Utc>) -> usize {
        self.offers.values().filter(|p| now < p.expires_at).count()
    }
}

impl Default for OfferBoard {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_OFFER_TTL_SECONDS))
    }
}
