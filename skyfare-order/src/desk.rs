use chrono::{DateTime, Duration, Utc};
use skyfare_catalog::{AttemptTracker, Checkout, DemandPricingConfig, OfferBoard, PricedOffer};
use skyfare_core::{CoreError, CoreResult, FlightOffer};
use skyfare_shared::Amount;
use std::collections::HashMap;
use crate::fulfillment::{render_ticket, TicketData, TicketDocument};
use crate::models::{BookingRecord, Passenger, Transaction};
use crate::store::BookingStore;
use crate::wallet::WalletLedger;

pub const RECHARGE_DESCRIPTION: &str = "Wallet recharge";

/// Checkout waiting for passenger details, keyed by flight id.
#[derive(Debug, Clone)]
struct PendingCheckout {
    checkout: Checkout,
    offer: FlightOffer,
}

/// One user's booking state: attempt counters, wallet, bookings and the offers they were shown.
///
/// Confirmation debits the wallet and stores the booking together: a refused debit
/// leaves the store untouched.
pub struct BookingDesk {
    tracker: AttemptTracker,
    wallet: WalletLedger,
    bookings: BookingStore,
    board: OfferBoard,
    pending: HashMap<String, PendingCheckout>,
}

impl BookingDesk {
    pub fn new(initial_balance: Amount, pricing: DemandPricingConfig, offer_ttl: Duration) -> Self {
        Self {
            tracker: AttemptTracker::new(pricing),
            wallet: WalletLedger::new(initial_balance),
            bookings: BookingStore::new(),
            board: OfferBoard::new(offer_ttl),
            pending: HashMap::new(),
        }
    }

    pub fn tracker(&self) -> &AttemptTracker {
        &self.tracker
    }

    pub fn wallet(&self) -> &WalletLedger {
        &self.wallet
    }

    pub fn bookings(&self) -> &BookingStore {
        &self.bookings
    }

    /// Remember offers returned by a search and quote them for display.
    pub fn publish_offers(&mut self, offers: &[FlightOffer], now: DateTime<Utc>) -> Vec<PricedOffer> {
        let expired = self.board.cleanup_expired(now);
        if expired > 0 {
            tracing::debug!("Dropped {} expired offers", expired);
        }

        self.board.post(offers, now);
        self.tracker.quote_offers(offers, now)
    }

    pub fn quote(&self, flight_id: &str, now: DateTime<Utc>) -> CoreResult<PricedOffer> {
        let offer = self.board.resolve(flight_id, now)?;
        Ok(PricedOffer {
            offer: offer.clone(),
            display_price: self.tracker.quote_price(&offer.id, offer.base_price, now),
            surge_applied: self.tracker.is_surging(&offer.id, now),
        })
    }

    /// "Book" on a previously shown offer: counts the attempt and fixes the price to charge.
    pub fn begin_checkout(&mut self, flight_id: &str, now: DateTime<Utc>) -> CoreResult<Checkout> {
        let offer = self.board.resolve(flight_id, now)?.clone();
        Ok(self.open_checkout(offer, now))
    }

    /// Pay for the pending checkout of `flight_id` and store the booking.
    ///
    /// `quoted_price` must match the price of the latest checkout so a client never
    /// pays something it was not shown.
    pub fn confirm(
        &mut self,
        flight_id: &str,
        quoted_price: Amount,
        passenger: Passenger,
        now: DateTime<Utc>,
    ) -> CoreResult<BookingRecord> {
        passenger.validate()?;

        let pending = self.pending.get(flight_id).ok_or_else(|| {
            CoreError::ValidationError(format!("no checkout in progress for flight {}", flight_id))
        })?;
        if pending.checkout.price != quoted_price {
            return Err(CoreError::ValidationError(format!(
                "quoted price {} does not match checkout price {}",
                quoted_price, pending.checkout.price
            )));
        }

        let pending = pending.clone();
        let record = self.settle(&pending, passenger)?;
        self.pending.remove(flight_id);

        tracing::debug!("Checkout for {} closed at {}", flight_id, now);
        Ok(record)
    }

    /// Click "Book" and confirm in one step for an offer the caller already holds.
    pub fn book(&mut self, offer: &FlightOffer, passenger: Passenger, now: DateTime<Utc>) -> CoreResult<BookingRecord> {
        passenger.validate()?;

        let checkout = self.open_checkout(offer.clone(), now);
        let pending = PendingCheckout {
            checkout,
            offer: offer.clone(),
        };
        let record = self.settle(&pending, passenger)?;
        self.pending.remove(&offer.id);
        Ok(record)
    }

    pub fn top_up(&mut self, amount: Amount, description: Option<String>) -> CoreResult<Transaction> {
        let description = description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| RECHARGE_DESCRIPTION.to_string());
        self.wallet.credit(amount, &description)
    }

    pub fn ticket(&self, reference: &str) -> CoreResult<TicketDocument> {
        let record = self.bookings.get_booking(reference)?;
        Ok(render_ticket(&TicketData::from(record)))
    }

    fn open_checkout(&mut self, offer: FlightOffer, now: DateTime<Utc>) -> Checkout {
        let checkout = self.tracker.checkout(&offer, now);
        self.pending.insert(
            offer.id.clone(),
            PendingCheckout {
                checkout: checkout.clone(),
                offer,
            },
        );
        checkout
    }

    fn settle(&mut self, pending: &PendingCheckout, passenger: Passenger) -> CoreResult<BookingRecord> {
        let draft = self
            .bookings
            .prepare(passenger, pending.offer.clone(), pending.checkout.price)?;

        let description = format!("Flight booking: {}", draft.reference());
        self.wallet.debit(draft.price(), &description)?;

        let record = self.bookings.commit(draft);
        tracing::info!(
            "Booking {} confirmed for flight {} at {}",
            record.reference, record.flight.flight_number, record.price
        );
        Ok(record)
    }
}

impl Default for BookingDesk {
    fn default() -> Self {
        Self::new(
            Amount::from(crate::wallet::DEFAULT_INITIAL_BALANCE),
            DemandPricingConfig::default(),
            Duration::seconds(skyfare_catalog::offer_board::DEFAULT_OFFER_TTL_SECONDS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;
    use chrono::TimeZone;
    use skyfare_core::airports::find_airport;

    fn offer(id: &str, price: i64) -> FlightOffer {
        let departure = Utc.with_ymd_and_hms(2026, 12, 1, 9, 0, 0).unwrap();
        FlightOffer {
            id: id.to_string(),
            airline: "IndiGo".to_string(),
            flight_number: "IN204".to_string(),
            origin: find_airport("DEL").unwrap(),
            destination: find_airport("BOM").unwrap(),
            departure_time: departure,
            arrival_time: departure + Duration::minutes(130),
            duration_minutes: 130,
            base_price: Amount::from(price),
            stops: 0,
            on_time_performance: 91,
            aircraft: "Airbus A320".to_string(),
            amenities: vec!["Meal Service".to_string()],
        }
    }

    fn passenger() -> Passenger {
        Passenger::new("Meera Nair", "meera@example.com", "+91 98765-43210")
    }

    fn desk(balance: i64) -> BookingDesk {
        BookingDesk::new(
            Amount::from(balance),
            DemandPricingConfig::default(),
            Duration::minutes(30),
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_third_attempt_pays_premium() {
        let mut desk = desk(50_000);
        let t0 = now();
        desk.publish_offers(&[offer("FL-aaaa0001", 2500)], t0);

        desk.begin_checkout("FL-aaaa0001", t0).unwrap();
        desk.begin_checkout("FL-aaaa0001", t0 + Duration::seconds(20)).unwrap();
        let checkout = desk.begin_checkout("FL-aaaa0001", t0 + Duration::seconds(40)).unwrap();

        assert_eq!(checkout.attempt_number, 3);
        assert_eq!(checkout.price, Amount::from(2750));
        assert!(checkout.demand_warning);

        let record = desk
            .confirm("FL-aaaa0001", Amount::from(2750), passenger(), t0 + Duration::seconds(60))
            .unwrap();

        assert_eq!(record.price, Amount::from(2750));
        assert_eq!(desk.wallet().balance(), Amount::from(47_250));
        assert_eq!(desk.bookings().len(), 1);

        let debits = desk.wallet().list_transactions_by_kind(TransactionKind::Debit);
        assert_eq!(debits.len(), 1);
        assert_eq!(debits[0].description, format!("Flight booking: {}", record.reference));
    }

    #[test]
    fn test_insufficient_funds_leaves_no_booking() {
        let mut desk = desk(1000);
        let err = desk.book(&offer("FL-bbbb0001", 2000), passenger(), now()).unwrap_err();

        assert!(matches!(err, CoreError::InsufficientFunds { .. }));
        assert!(desk.bookings().is_empty());
        assert_eq!(desk.wallet().balance(), Amount::from(1000));
        assert!(desk.wallet().list_transactions().is_empty());
        // Attempts count even when payment fails
        assert_eq!(desk.tracker().attempts("FL-bbbb0001").unwrap().attempt_count, 1);
    }

    #[test]
    fn test_checkout_survives_refused_payment() {
        let mut desk = desk(1000);
        desk.publish_offers(&[offer("FL-bbbb0002", 2000)], now());
        desk.begin_checkout("FL-bbbb0002", now()).unwrap();

        let err = desk.confirm("FL-bbbb0002", Amount::from(2000), passenger(), now()).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientFunds { .. }));

        desk.top_up(Amount::from(5000), None).unwrap();
        let record = desk.confirm("FL-bbbb0002", Amount::from(2000), passenger(), now()).unwrap();
        assert_eq!(desk.wallet().balance(), Amount::from(4000));
        assert_eq!(desk.bookings().get_booking(&record.reference).unwrap().price, Amount::from(2000));
    }

    #[test]
    fn test_invalid_passenger_mutates_nothing() {
        let mut desk = desk(50_000);
        desk.publish_offers(&[offer("FL-cccc0001", 2500)], now());
        desk.begin_checkout("FL-cccc0001", now()).unwrap();

        let bad = Passenger::new("  ", "meera@example.com", "9876543210");
        let err = desk.confirm("FL-cccc0001", Amount::from(2500), bad.clone(), now()).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));

        let err = desk.book(&offer("FL-cccc0002", 2500), bad, now()).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));

        assert!(desk.tracker().attempts("FL-cccc0002").is_none());
        assert!(desk.bookings().is_empty());
        assert_eq!(desk.wallet().balance(), Amount::from(50_000));
    }

    #[test]
    fn test_confirm_requires_matching_checkout() {
        let mut desk = desk(50_000);
        desk.publish_offers(&[offer("FL-dddd0001", 2500)], now());

        let err = desk.confirm("FL-dddd0001", Amount::from(2500), passenger(), now()).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));

        desk.begin_checkout("FL-dddd0001", now()).unwrap();
        let err = desk.confirm("FL-dddd0001", Amount::from(2400), passenger(), now()).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
        assert_eq!(desk.wallet().balance(), Amount::from(50_000));

        desk.confirm("FL-dddd0001", Amount::from(2500), passenger(), now()).unwrap();
        // Pending checkout is consumed
        let err = desk.confirm("FL-dddd0001", Amount::from(2500), passenger(), now()).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn test_unknown_or_expired_offer() {
        let mut desk = desk(50_000);
        assert!(matches!(desk.begin_checkout("FL-none", now()), Err(CoreError::NotFound(_))));

        desk.publish_offers(&[offer("FL-eeee0001", 2500)], now());
        let later = now() + Duration::minutes(31);
        assert!(matches!(desk.begin_checkout("FL-eeee0001", later), Err(CoreError::NotFound(_))));
        assert!(matches!(desk.quote("FL-eeee0001", later), Err(CoreError::NotFound(_))));
    }

    #[test]
    fn test_quote_reflects_recent_surge() {
        let mut desk = desk(50_000);
        let t0 = now();
        desk.publish_offers(&[offer("FL-ffff0001", 2345)], t0);
        for i in 0..3 {
            desk.begin_checkout("FL-ffff0001", t0 + Duration::seconds(i)).unwrap();
        }

        let quote = desk.quote("FL-ffff0001", t0 + Duration::minutes(1)).unwrap();
        assert!(quote.surge_applied);
        assert_eq!(quote.display_price, Amount::from(2580));

        let stale = desk.quote("FL-ffff0001", t0 + Duration::minutes(6)).unwrap();
        assert!(!stale.surge_applied);
        assert_eq!(stale.display_price, Amount::from(2345));
    }

    #[test]
    fn test_top_up_and_ticket() {
        let mut desk = desk(0);
        let tx = desk.top_up(Amount::from(3000), Some("  ".to_string())).unwrap();
        assert_eq!(tx.description, RECHARGE_DESCRIPTION);
        assert!(matches!(desk.top_up(Amount::ZERO, None), Err(CoreError::ValidationError(_))));

        let record = desk.book(&offer("FL-gggg0001", 2500), passenger(), now()).unwrap();
        let ticket = desk.ticket(&record.reference.to_lowercase()).unwrap();
        assert_eq!(ticket.barcode, format!("{}IN204", record.reference));
        assert!(matches!(desk.ticket("ZZZZZZ"), Err(CoreError::NotFound(_))));
    }
}
