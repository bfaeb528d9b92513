use serde::{Deserialize, Serialize};
use crate::{CoreError, CoreResult};

/// Airport reference data (code, city, display name).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Airport {
    pub code: String,
    pub city: String,
    pub name: String,
}

const AIRPORTS: &[(&str, &str, &str)] = &[
    ("DEL", "Delhi", "Indira Gandhi International Airport"),
    ("BOM", "Mumbai", "Chhatrapati Shivaji International Airport"),
    ("MAA", "Chennai", "Chennai International Airport"),
    ("BLR", "Bengaluru", "Kempegowda International Airport"),
    ("CCU", "Kolkata", "Netaji Subhas Chandra Bose International Airport"),
    ("HYD", "Hyderabad", "Rajiv Gandhi International Airport"),
    ("GAU", "Guwahati", "Lokpriya Gopinath Bordoloi International Airport"),
    ("COK", "Kochi", "Cochin International Airport"),
    ("PNQ", "Pune", "Pune Airport"),
    ("LKO", "Lucknow", "Chaudhary Charan Singh International Airport"),
];

fn to_airport(&(code, city, name): &(&str, &str, &str)) -> Airport {
    Airport {
        code: code.to_string(),
        city: city.to_string(),
        name: name.to_string(),
    }
}

pub fn all_airports() -> Vec<Airport> {
    AIRPORTS.iter().map(to_airport).collect()
}

/// Look up an airport by IATA code, ignoring case and surrounding whitespace.
pub fn find_airport(code: &str) -> Option<Airport> {
    let code = code.trim();
    AIRPORTS
        .iter()
        .find(|(c, _, _)| c.eq_ignore_ascii_case(code))
        .map(to_airport)
}

pub fn resolve_airport(code: &str) -> CoreResult<Airport> {
    find_airport(code).ok_or_else(|| CoreError::NotFound(format!("airport {}", code)))
}

/// Autocomplete: case-insensitive substring match on city, code or name.
pub fn search_airports(query: &str) -> Vec<Airport> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return all_airports();
    }

    AIRPORTS
        .iter()
        .filter(|(code, city, name)| {
            city.to_lowercase().contains(&query)
                || code.to_lowercase().contains(&query)
                || name.to_lowercase().contains(&query)
        })
        .map(to_airport)
        .collect()
}
