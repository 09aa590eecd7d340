pub mod coupon;
pub mod payment;
pub mod subscription;

use rust_decimal::Decimal;

/// Render an amount in minor currency units (paise) as a major-unit string,
/// e.g. 96000 -> "960.00". Money stays integral everywhere else.
pub fn display_major_units(minor_units: u64) -> String {
    Decimal::new(minor_units as i64, 2).to_string()
}
