pub mod pricing;
pub mod generator;
pub mod offer_board;

pub use pricing::{AttemptState, AttemptTracker, Checkout, DemandPricingConfig, PricedOffer};
pub use generator::SyntheticCatalog;
pub use offer_board::OfferBoard;
