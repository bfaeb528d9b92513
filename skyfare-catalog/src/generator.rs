use async_trait::async_trait;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use skyfare_core::airports::{find_airport, Airport};
use skyfare_core::{FlightCatalog, FlightOffer};
use skyfare_shared::Amount;
use std::sync::Mutex;

pub const DEFAULT_BATCH_SIZE: usize = 10;

const AIRLINES: &[&str] = &["IndiGo", "Air India", "SpiceJet", "Vistara", "Go Air"];
const AIRCRAFT: &[&str] = &["Boeing 737", "Airbus A320", "Boeing 777", "Airbus A380"];
const AMENITIES: &[&str] = &[
    "Wi-Fi",
    "In-flight Entertainment",
    "Power Outlets",
    "Extra Legroom",
    "Meal Service",
];
const ID_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Stand-in for a real inventory lookup: every search fabricates a fresh batch.
pub struct SyntheticCatalog {
    batch_size: usize,
    rng: Mutex<StdRng>,
}

impl SyntheticCatalog {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic generator for tests and demos.
    pub fn with_seed(batch_size: usize, seed: u64) -> Self {
        Self {
            batch_size,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn generate(&self, origin: &Airport, destination: &Airport, date: NaiveDate) -> Vec<FlightOffer> {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        (0..self.batch_size)
            .map(|_| generate_offer(&mut *rng, origin, destination, date))
            .collect()
    }
}

impl Default for SyntheticCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

fn generate_offer<R: Rng>(rng: &mut R, origin: &Airport, destination: &Airport, date: NaiveDate) -> FlightOffer {
    let airline = *AIRLINES.choose(rng).unwrap_or(&AIRLINES[0]);

    // 05:00 - 21:59 on the requested day
    let departure_hour = rng.gen_range(5..22);
    let departure_minute = rng.gen_range(0..60);
    let departure_time = date
        .and_hms_opt(departure_hour, departure_minute, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or_else(|| Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)));

    let duration_minutes: u32 = rng.gen_range(90..210);
    let arrival_time = departure_time + Duration::minutes(duration_minutes as i64);

    let stops_roll: f64 = rng.gen();
    let stops = if stops_roll < 0.6 {
        0
    } else if stops_roll < 0.9 {
        1
    } else {
        2
    };

    let amenity_count = rng.gen_range(1..=4);
    let amenities = AMENITIES
        .choose_multiple(rng, amenity_count)
        .map(|a| a.to_string())
        .collect();

    FlightOffer {
        id: format!("FL-{}", random_token(rng, 8)),
        airline: airline.to_string(),
        flight_number: flight_number(airline, rng.gen_range(100..1000)),
        origin: origin.clone(),
        destination: destination.clone(),
        departure_time,
        arrival_time,
        duration_minutes,
        base_price: Amount::from(rng.gen_range(2000i64..3000)),
        stops,
        on_time_performance: rng.gen_range(70..100),
        aircraft: AIRCRAFT.choose(rng).unwrap_or(&AIRCRAFT[0]).to_string(),
        amenities,
    }
}

fn random_token<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| ID_CHARS[rng.gen_range(0..ID_CHARS.len())] as char)
        .collect()
}

/// Two-letter carrier prefix taken from the airline name, e.g. "Air India" -> "AI".
fn flight_number(airline: &str, number: u32) -> String {
    let prefix: String = airline.chars().take(2).collect::<String>().to_uppercase();
    format!("{}{}", prefix, number)
}

#[async_trait]
impl FlightCatalog for SyntheticCatalog {
    async fn search(&self, origin: &str, destination: &str, date: NaiveDate) -> Vec<FlightOffer> {
        let (Some(from), Some(to)) = (find_airport(origin), find_airport(destination)) else {
            tracing::debug!("Unknown airport in search {} -> {}", origin, destination);
            return Vec::new();
        };

        if from.code == to.code {
            tracing::debug!("Search with identical origin and destination {}", from.code);
            return Vec::new();
        }

        self.generate(&from, &to, date)
    }
}
