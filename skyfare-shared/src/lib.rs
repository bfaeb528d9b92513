pub mod money;
pub mod pii;

pub use money::{Amount, CURRENCY};
pub use pii::Masked;
