use rust_decimal::{Decimal, RoundingStrategy};

/// Monetary amount in whole currency units with exact decimal arithmetic.
pub type Amount = Decimal;

/// Currency label shown on quotes, wallet statements and tickets.
pub const CURRENCY: &str = "INR";

/// Round to the nearest whole currency unit, halves away from zero.
pub fn round_to_unit(amount: Amount) -> Amount {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Apply a percentage markup expressed as a rate (0.10 = +10%).
///
/// The result is not rounded; callers decide whether they need a display value.
pub fn apply_markup(amount: Amount, rate: Decimal) -> Amount {
    amount * (Decimal::ONE + rate)
}

/// Split `total` into `share` and remainder, the share rounded to whole units.
pub fn split_share(total: Amount, share: Decimal) -> (Amount, Amount) {
    let part = round_to_unit(total * share);
    (part, total - part)
}
