use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use skyfare_core::FlightOffer;
use skyfare_shared::money::{apply_markup, round_to_unit};
use skyfare_shared::Amount;
use std::collections::HashMap;

/// Thresholds for demand pricing driven by repeated booking attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandPricingConfig {
    /// Attempt count at which the premium kicks in
    #[serde(default = "default_surge_threshold")]
    pub surge_threshold: u32,

    /// Premium as a rate (0.10 = +10%)
    #[serde(default = "default_premium_rate")]
    pub premium_rate: Decimal,

    /// Display quotes keep the premium only while the last attempt is this recent
    #[serde(default = "default_quote_window")]
    pub quote_window_seconds: i64,

    /// An attempt after this much silence starts counting from 1 again
    #[serde(default = "default_reset_window")]
    pub reset_window_seconds: i64,

    /// Highest attempt number that still gets the "act now" warning
    #[serde(default = "default_warning_ceiling")]
    pub warning_ceiling: u32,
}

fn default_surge_threshold() -> u32 { 3 }
fn default_premium_rate() -> Decimal { Decimal::new(10, 2) }
fn default_quote_window() -> i64 { 5 * 60 }
fn default_reset_window() -> i64 { 10 * 60 }
fn default_warning_ceiling() -> u32 { 5 }

impl Default for DemandPricingConfig {
    fn default() -> Self {
        Self {
            surge_threshold: default_surge_threshold(),
            premium_rate: default_premium_rate(),
            quote_window_seconds: default_quote_window(),
            reset_window_seconds: default_reset_window(),
            warning_ceiling: default_warning_ceiling(),
        }
    }
}

impl DemandPricingConfig {
    fn quote_window(&self) -> Duration {
        Duration::seconds(self.quote_window_seconds)
    }

    fn reset_window(&self) -> Duration {
        Duration::seconds(self.reset_window_seconds)
    }
}

/// Booking-attempt history for one flight identifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttemptState {
    pub attempt_count: u32,
    pub last_attempt_at: DateTime<Utc>,
}

/// Result of a "Book" click: the attempt it counted and the price that will be charged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Checkout {
    pub flight_id: String,
    pub attempt_number: u32,
    pub base_price: Amount,
    pub price: Amount,
    pub demand_warning: bool,
    pub recorded_at: DateTime<Utc>,
}

/// An offer decorated with what the user should see right now.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedOffer {
    #[serde(flatten)]
    pub offer: FlightOffer,
    pub display_price: Amount,
    pub surge_applied: bool,
}

/// Tracks booking attempts per flight and derives display and charge prices from them.
///
/// Display quotes need the count AND a recent last attempt; the charged price looks
/// at the attempt number alone.
pub struct AttemptTracker {
    config: DemandPricingConfig,
    attempts: HashMap<String, AttemptState>,
}

impl AttemptTracker {
    pub fn new(config: DemandPricingConfig) -> Self {
        Self {
            config,
            attempts: HashMap::new(),
        }
    }

    pub fn config(&self) -> &DemandPricingConfig {
        &self.config
    }

    /// Count one user-initiated booking action and return the resulting attempt number.
    pub fn record_attempt(&mut self, flight_id: &str, now: DateTime<Utc>) -> u32 {
        let reset_window = self.config.reset_window();

        let state = self
            .attempts
            .entry(flight_id.to_string())
            .and_modify(|state| {
                if now - state.last_attempt_at > reset_window {
                    state.attempt_count = 1;
                } else {
                    state.attempt_count += 1;
                }
                state.last_attempt_at = now;
            })
            .or_insert(AttemptState {
                attempt_count: 1,
                last_attempt_at: now,
            });

        tracing::debug!("Booking attempt {} recorded for flight {}", state.attempt_count, flight_id);
        state.attempt_count
    }

    /// True while the display quote for `flight_id` carries the demand premium.
    pub fn is_surging(&self, flight_id: &str, now: DateTime<Utc>) -> bool {
        self.attempts.get(flight_id).is_some_and(|state| {
            state.attempt_count >= self.config.surge_threshold
                && now - state.last_attempt_at < self.config.quote_window()
        })
    }

    /// Read-only price for browsing, rounded to whole units.
    pub fn quote_price(&self, flight_id: &str, base_price: Amount, now: DateTime<Utc>) -> Amount {
        if self.is_surging(flight_id, now) {
            round_to_unit(apply_markup(base_price, self.config.premium_rate))
        } else {
            base_price
        }
    }

    /// Price charged at confirmation for the attempt number returned by `record_attempt`.
    pub fn price_for_booking(&self, flight_id: &str, base_price: Amount, attempt_number: u32) -> Amount {
        if attempt_number >= self.config.surge_threshold {
            let price = apply_markup(base_price, self.config.premium_rate);
            tracing::info!(
                "Demand premium applied to flight {} on attempt {}: {} -> {}",
                flight_id, attempt_number, base_price, price
            );
            price
        } else {
            base_price
        }
    }

    /// Whether the caller should show the "price may increase, act now" hint.
    pub fn demand_warning(&self, attempt_number: u32) -> bool {
        attempt_number >= self.config.surge_threshold && attempt_number <= self.config.warning_ceiling
    }

    pub fn attempts(&self, flight_id: &str) -> Option<&AttemptState> {
        self.attempts.get(flight_id)
    }

    /// Record the attempt for `offer` and price it for booking.
    pub fn checkout(&mut self, offer: &FlightOffer, now: DateTime<Utc>) -> Checkout {
        let attempt_number = self.record_attempt(&offer.id, now);
        let price = self.price_for_booking(&offer.id, offer.base_price, attempt_number);

        Checkout {
            flight_id: offer.id.clone(),
            attempt_number,
            base_price: offer.base_price,
            price,
            demand_warning: self.demand_warning(attempt_number),
            recorded_at: now,
        }
    }

    pub fn quote_offers(&self, offers: &[FlightOffer], now: DateTime<Utc>) -> Vec<PricedOffer> {
        offers
            .iter()
            .map(|offer| PricedOffer {
                offer: offer.clone(),
                display_price: self.quote_price(&offer.id, offer.base_price, now),
                surge_applied: self.is_surging(&offer.id, now),
            })
            .collect()
    }
}

impl Default for AttemptTracker {
    fn default() -> Self {
        Self::new(DemandPricingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap()
    }

    fn base() -> Amount {
        Amount::from(2500)
    }

    #[test]
    fn test_first_attempt_is_one() {
        let mut tracker = AttemptTracker::default();
        assert!(tracker.attempts("FL-a").is_none());
        assert_eq!(tracker.record_attempt("FL-a", t0()), 1);
        assert_eq!(tracker.attempts("FL-a").unwrap().last_attempt_at, t0());
    }

    #[test]
    fn test_attempts_increment_within_reset_window() {
        let mut tracker = AttemptTracker::default();
        assert_eq!(tracker.record_attempt("FL-a", t0()), 1);
        assert_eq!(tracker.record_attempt("FL-a", t0() + Duration::minutes(4)), 2);
        // exactly at the reset boundary still counts as the same burst
        assert_eq!(tracker.record_attempt("FL-a", t0() + Duration::minutes(14)), 3);
        assert_eq!(tracker.record_attempt("FL-b", t0()), 1);
    }

    #[test]
    fn test_attempts_reset_after_ten_minutes() {
        let mut tracker = AttemptTracker::default();
        tracker.record_attempt("FL-a", t0());
        tracker.record_attempt("FL-a", t0());
        tracker.record_attempt("FL-a", t0());

        let later = t0() + Duration::minutes(10) + Duration::seconds(1);
        assert_eq!(tracker.record_attempt("FL-a", later), 1);
        assert_eq!(tracker.attempts("FL-a").unwrap().last_attempt_at, later);
    }

    #[test]
    fn test_quote_is_base_below_threshold() {
        let mut tracker = AttemptTracker::default();
        assert_eq!(tracker.quote_price("FL-a", base(), t0()), base());

        tracker.record_attempt("FL-a", t0());
        tracker.record_attempt("FL-a", t0());
        assert_eq!(tracker.quote_price("FL-a", base(), t0()), base());
        assert_eq!(tracker.quote_price("FL-a", base(), t0() + Duration::hours(5)), base());
    }

    #[test]
    fn test_quote_surges_within_window_then_reverts() {
        let mut tracker = AttemptTracker::default();
        for _ in 0..3 {
            tracker.record_attempt("FL-a", t0());
        }

        assert_eq!(tracker.quote_price("FL-a", base(), t0() + Duration::minutes(1)), Amount::from(2750));
        assert!(tracker.is_surging("FL-a", t0() + Duration::seconds(299)));

        // window is strict
        assert_eq!(tracker.quote_price("FL-a", base(), t0() + Duration::minutes(5)), base());
        assert!(!tracker.is_surging("FL-a", t0() + Duration::minutes(6)));
    }

    #[test]
    fn test_quote_rounds_to_whole_units() {
        let mut tracker = AttemptTracker::default();
        for _ in 0..3 {
            tracker.record_attempt("FL-a", t0());
        }
        // 2345 * 1.1 = 2579.5
        assert_eq!(tracker.quote_price("FL-a", Amount::from(2345), t0()), Amount::from(2580));
    }

    #[test]
    fn test_booking_price_uses_count_only() {
        let tracker = AttemptTracker::default();
        assert_eq!(tracker.price_for_booking("FL-a", base(), 1), base());
        assert_eq!(tracker.price_for_booking("FL-a", base(), 2), base());
        assert_eq!(tracker.price_for_booking("FL-a", base(), 3), Amount::from(2750));
        assert_eq!(tracker.price_for_booking("FL-a", base(), 9), Amount::from(2750));
        // unrounded, unlike the display quote
        assert_eq!(tracker.price_for_booking("FL-a", Amount::from(2345), 3), Amount::new(257950, 2));
    }

    #[test]
    fn test_demand_warning_band() {
        let tracker = AttemptTracker::default();
        let warned: Vec<u32> = (1..=7).filter(|n| tracker.demand_warning(*n)).collect();
        assert_eq!(warned, vec![3, 4, 5]);
    }

    #[test]
    fn test_custom_config() {
        let mut tracker = AttemptTracker::new(DemandPricingConfig {
            surge_threshold: 2,
            premium_rate: Decimal::new(25, 2),
            ..Default::default()
        });
        tracker.record_attempt("FL-a", t0());
        let n = tracker.record_attempt("FL-a", t0());
        assert_eq!(tracker.price_for_booking("FL-a", Amount::from(2000), n), Amount::from(2500));
    }

    fn offer(id: &str, price: i64) -> FlightOffer {
        let airport = skyfare_core::airports::find_airport("DEL").unwrap();
        let destination = skyfare_core::airports::find_airport("BLR").unwrap();
        FlightOffer {
            id: id.to_string(),
            airline: "IndiGo".to_string(),
            flight_number: "IN245".to_string(),
            origin: airport,
            destination,
            departure_time: t0() + Duration::days(3),
            arrival_time: t0() + Duration::days(3) + Duration::minutes(160),
            duration_minutes: 160,
            base_price: Amount::from(price),
            stops: 0,
            on_time_performance: 81,
            aircraft: "Airbus A320".to_string(),
            amenities: vec!["Meal Service".to_string()],
        }
    }

    #[test]
    fn test_checkout_records_and_prices() {
        let mut tracker = AttemptTracker::default();
        let flight = offer("FL-abc12345", 2500);

        let first = tracker.checkout(&flight, t0());
        assert_eq!(first.attempt_number, 1);
        assert_eq!(first.price, Amount::from(2500));
        assert!(!first.demand_warning);

        tracker.checkout(&flight, t0());
        let third = tracker.checkout(&flight, t0());
        assert_eq!(third.attempt_number, 3);
        assert_eq!(third.base_price, Amount::from(2500));
        assert_eq!(third.price, Amount::from(2750));
        assert!(third.demand_warning);
    }

    #[test]
    fn test_quote_offers_marks_surging_flights() {
        let mut tracker = AttemptTracker::default();
        let hot = offer("FL-hot00001", 2000);
        let cold = offer("FL-cold0001", 2999);
        for _ in 0..3 {
            tracker.record_attempt(&hot.id, t0());
        }

        let priced = tracker.quote_offers(&[hot, cold], t0() + Duration::minutes(2));
        assert!(priced[0].surge_applied);
        assert_eq!(priced[0].display_price, Amount::from(2200));
        assert!(!priced[1].surge_applied);
        assert_eq!(priced[1].display_price, Amount::from(2999));

        let json = serde_json::to_value(&priced[0]).unwrap();
        assert_eq!(json["id"], "FL-hot00001");
        assert_eq!(json["display_price"], 2200.0);
    }
}
