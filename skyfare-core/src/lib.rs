pub mod airports;
pub mod flight;
pub mod search;
pub mod repository;

use skyfare_shared::Amount;

pub use airports::Airport;
pub use flight::FlightOffer;
pub use repository::FlightCatalog;
pub use search::{FlightSearchRequest, SearchFilters, TimeOfDay, TripType};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Amount,
        available: Amount,
    },
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
