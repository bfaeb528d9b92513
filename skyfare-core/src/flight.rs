use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use skyfare_shared::Amount;
use crate::airports::Airport;
use crate::search::TimeOfDay;

/// A flight option produced for one search.
///
/// Offers have no identity beyond the query that produced them, so anything that
/// outlives the search (a booking, a ticket) keeps its own copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightOffer {
    pub id: String,
    pub airline: String,
    pub flight_number: String,
    pub origin: Airport,
    pub destination: Airport,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub duration_minutes: u32,
    pub base_price: Amount,
    pub stops: u8,
    pub on_time_performance: u8,
    pub aircraft: String,
    pub amenities: Vec<String>,
}

impl FlightOffer {
    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_hour(self.departure_time.hour())
    }

    pub fn stops_label(&self) -> String {
        match self.stops {
            0 => "Non-stop".to_string(),
            1 => "1 stop".to_string(),
            n => format!("{} stops", n),
        }
    }

    pub fn duration_label(&self) -> String {
        format_duration(self.duration_minutes)
    }
}

/// "1h 30m" style duration.
pub fn format_duration(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}
