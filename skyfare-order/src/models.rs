use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skyfare_core::{CoreError, CoreResult, FlightOffer};
use skyfare_shared::{Amount, Masked};
use uuid::Uuid;

/// Booking status as shown in the booking history
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
    Upcoming,
    Completed,
}

/// Passenger and contact details entered at checkout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Passenger {
    pub name: String,
    pub email: Masked<String>,
    pub phone: Masked<String>,
}

impl Passenger {
    pub fn new(name: &str, email: &str, phone: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: Masked::new(email.trim().to_string()),
            phone: Masked::new(phone.trim().to_string()),
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ValidationError("passenger name is required".to_string()));
        }

        let email = self.email.expose().trim();
        let valid_email = match email.split_once('@') {
            Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
            None => false,
        };
        if !valid_email {
            return Err(CoreError::ValidationError("a valid email address is required".to_string()));
        }

        let phone = self.phone.expose().trim();
        let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
        let allowed = phone
            .chars()
            .enumerate()
            .all(|(i, c)| c.is_ascii_digit() || c == ' ' || c == '-' || (c == '+' && i == 0));
        if !allowed || !(7..=15).contains(&digits) {
            return Err(CoreError::ValidationError("a valid phone number is required".to_string()));
        }

        Ok(())
    }
}

/// A confirmed, paid reservation. Never modified after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingRecord {
    pub reference: String,
    pub passenger: Passenger,
    /// Snapshot taken at booking time; offers cannot be looked up again later.
    pub flight: FlightOffer,
    /// Amount actually charged, including any demand premium
    pub price: Amount,
    pub currency: String,
    pub booking_date: DateTime<Utc>,
    pub status: BookingStatus,
}

impl BookingRecord {
    /// History view of the booking at `now`; the stored status is untouched.
    pub fn travel_status(&self, now: DateTime<Utc>) -> BookingStatus {
        if now < self.flight.departure_time {
            BookingStatus::Upcoming
        } else if now >= self.flight.arrival_time {
            BookingStatus::Completed
        } else {
            self.status
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Credit,
    Debit,
}

/// Wallet ledger entry. Amounts are always positive; `kind` carries the direction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Amount,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn new(kind: TransactionKind, amount: Amount, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            description,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passenger_validation() {
        assert!(Passenger::new("Aditi Rao", "aditi@example.com", "+91 98765-43210").validate().is_ok());

        let cases = [
            Passenger::new("  ", "aditi@example.com", "9876543210"),
            Passenger::new("Aditi Rao", "aditi.example.com", "9876543210"),
            Passenger::new("Aditi Rao", "@example.com", "9876543210"),
            Passenger::new("Aditi Rao", "aditi@", "9876543210"),
            Passenger::new("Aditi Rao", "aditi@example.com", "12345"),
            Passenger::new("Aditi Rao", "aditi@example.com", "98765x43210"),
            Passenger::new("Aditi Rao", "aditi@example.com", "98+76543210"),
        ];
        for passenger in cases {
            assert!(
                matches!(passenger.validate(), Err(CoreError::ValidationError(_))),
                "expected rejection for {:?}",
                passenger.name
            );
        }
    }

    #[test]
    fn test_transaction_serializes_kind_as_type() {
        let tx = Transaction::new(TransactionKind::Debit, Amount::from(2750), "Flight booking: ABCDEF".to_string());
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], "debit");
        assert_eq!(json["amount"], 2750.0);
    }
}
