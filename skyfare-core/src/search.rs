use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use skyfare_shared::Amount;
use crate::flight::FlightOffer;
use crate::{CoreError, CoreResult};

pub const MAX_PASSENGERS: u32 = 9;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TripType {
    #[default]
    OneWay,
    RoundTrip,
}

/// Departure time buckets used by the result filters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// 05:00 - 11:59
    Morning,
    /// 12:00 - 17:59
    Afternoon,
    /// everything else
    Evening,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Evening,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightSearchRequest {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    #[serde(default = "default_passengers")]
    pub passengers: u32,
    #[serde(default)]
    pub trip_type: TripType,
    #[serde(default)]
    pub filters: SearchFilters,
}

fn default_passengers() -> u32 { 1 }

impl FlightSearchRequest {
    pub fn one_way(origin: &str, destination: &str, departure_date: NaiveDate) -> Self {
        Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            departure_date,
            return_date: None,
            passengers: 1,
            trip_type: TripType::OneWay,
            filters: SearchFilters::default(),
        }
    }

    pub fn round_trip(origin: &str, destination: &str, departure_date: NaiveDate, return_date: NaiveDate) -> Self {
        Self {
            return_date: Some(return_date),
            trip_type: TripType::RoundTrip,
            ..Self::one_way(origin, destination, departure_date)
        }
    }

    /// Checks the parameters that make a query malformed.
    ///
    /// Unknown or identical airports are not errors here: the catalog answers them
    /// with an empty result.
    pub fn validate(&self) -> CoreResult<()> {
        if self.origin.trim().is_empty() || self.destination.trim().is_empty() {
            return Err(CoreError::ValidationError("origin and destination are required".to_string()));
        }

        if self.passengers == 0 || self.passengers > MAX_PASSENGERS {
            return Err(CoreError::ValidationError(format!(
                "passengers must be between 1 and {}",
                MAX_PASSENGERS
            )));
        }

        match (self.trip_type, self.return_date) {
            (TripType::RoundTrip, None) => Err(CoreError::ValidationError(
                "return date is required for a round trip".to_string(),
            )),
            (TripType::RoundTrip, Some(ret)) if ret < self.departure_date => Err(
                CoreError::ValidationError("return date is before departure date".to_string()),
            ),
            _ => self.filters.validate(),
        }
    }
}

/// Post-filters over generated offers. Empty lists mean "no restriction".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub airlines: Vec<String>,
    #[serde(default)]
    pub times: Vec<TimeOfDay>,
    pub min_price: Option<Amount>,
    pub max_price: Option<Amount>,
}

impl SearchFilters {
    pub fn validate(&self) -> CoreResult<()> {
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(CoreError::ValidationError(format!(
                    "min price {} exceeds max price {}",
                    min, max
                )));
            }
        }
        Ok(())
    }

    pub fn matches(&self, airline: &str, departure: DateTime<Utc>, price: Amount) -> bool {
        if !self.airlines.is_empty() && !self.airlines.iter().any(|a| a.eq_ignore_ascii_case(airline)) {
            return false;
        }
        if !self.times.is_empty() && !self.times.contains(&TimeOfDay::from_hour(departure.hour())) {
            return false;
        }
        if self.min_price.is_some_and(|min| price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| price > max) {
            return false;
        }
        true
    }

    pub fn apply(&self, offers: Vec<FlightOffer>) -> Vec<FlightOffer> {
        offers
            .into_iter()
            .filter(|o| self.matches(&o.airline, o.departure_time, o.base_price))
            .collect()
    }
}

/// Offers for every leg of a trip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripSearchResult {
    pub outbound: Vec<FlightOffer>,
    pub inbound: Vec<FlightOffer>,
}
