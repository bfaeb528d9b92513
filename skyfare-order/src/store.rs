use chrono::Utc;
use rand::Rng;
use skyfare_core::{CoreError, CoreResult, FlightOffer};
use skyfare_shared::{Amount, CURRENCY};
use std::collections::HashMap;
use crate::models::{BookingRecord, BookingStatus, Passenger};

pub const REFERENCE_LENGTH: usize = 6;
const REFERENCE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const MAX_REFERENCE_ATTEMPTS: usize = 32;

/// A booking that has a unique reference but is not stored yet.
///
/// Lets a caller reserve the reference, take payment, then commit; nothing is visible in
/// the store until `commit`.
#[derive(Debug)]
pub struct BookingDraft {
    record: BookingRecord,
}

impl BookingDraft {
    pub fn reference(&self) -> &str {
        &self.record.reference
    }

    pub fn price(&self) -> Amount {
        self.record.price
    }
}

/// Confirmed bookings for one user, in creation order
#[derive(Debug, Default)]
pub struct BookingStore {
    bookings: Vec<BookingRecord>,
    by_reference: HashMap<String, usize>,
}

impl BookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick a reference not used by any stored booking, retrying on collision.
    pub fn next_reference<R: Rng + ?Sized>(&self, rng: &mut R) -> CoreResult<String> {
        for _ in 0..MAX_REFERENCE_ATTEMPTS {
            let candidate = random_reference(rng);
            if !self.by_reference.contains_key(&candidate) {
                return Ok(candidate);
            }
            tracing::debug!("Booking reference {} already taken, retrying", candidate);
        }

        Err(CoreError::InternalError(
            "could not allocate a unique booking reference".to_string(),
        ))
    }

    pub fn prepare(&self, passenger: Passenger, flight: FlightOffer, price: Amount) -> CoreResult<BookingDraft> {
        let reference = self.next_reference(&mut rand::thread_rng())?;

        Ok(BookingDraft {
            record: BookingRecord {
                reference,
                passenger,
                flight,
                price,
                currency: CURRENCY.to_string(),
                booking_date: Utc::now(),
                status: BookingStatus::Confirmed,
            },
        })
    }

    pub fn commit(&mut self, draft: BookingDraft) -> BookingRecord {
        let mut record = draft.record;

        // Only possible if another draft was committed in between
        if self.by_reference.contains_key(&record.reference) {
            tracing::warn!("Draft reference {} was taken before commit", record.reference);
            let mut rng = rand::thread_rng();
            while self.by_reference.contains_key(&record.reference) {
                record.reference = random_reference(&mut rng);
            }
        }

        self.by_reference.insert(record.reference.clone(), self.bookings.len());
        self.bookings.push(record.clone());
        record
    }

    pub fn create_booking(&mut self, passenger: Passenger, flight: FlightOffer, price: Amount) -> CoreResult<BookingRecord> {
        let draft = self.prepare(passenger, flight, price)?;
        Ok(self.commit(draft))
    }

    pub fn list_bookings(&self) -> &[BookingRecord] {
        &self.bookings
    }

    pub fn list_bookings_newest_first(&self) -> Vec<&BookingRecord> {
        self.bookings.iter().rev().collect()
    }

    pub fn get_booking(&self, reference: &str) -> CoreResult<&BookingRecord> {
        self.by_reference
            .get(&reference.trim().to_ascii_uppercase())
            .map(|&index| &self.bookings[index])
            .ok_or_else(|| CoreError::NotFound(format!("booking {}", reference)))
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}

fn random_reference<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..REFERENCE_LENGTH)
        .map(|_| REFERENCE_ALPHABET[rng.gen_range(0..REFERENCE_ALPHABET.len())] as char)
        .collect()
}
