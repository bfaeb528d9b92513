pub mod models;
pub mod wallet;
pub mod store;
pub mod desk;
pub mod fulfillment;

pub use models::{BookingRecord, BookingStatus, Passenger, Transaction, TransactionKind};
pub use wallet::WalletLedger;
pub use store::BookingStore;
pub use desk::BookingDesk;
pub use fulfillment::{render_ticket, TicketData, TicketDocument};
