use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::display_major_units;

fn default_active() -> bool {
    true
}

/// A discount coupon as stored by the backend. At most one of
/// `discount_percent` / `discount_amount` applies; percent wins when both
/// are present. Codes are case-insensitive keys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coupon {
    pub code: String,
    #[serde(default = "default_active")]
    pub active: bool,
    pub discount_percent: Option<Decimal>,
    pub discount_amount: Option<u64>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
}

/// Admin payload for minting a new coupon. Validated client-side before the
/// request goes out; the backend enforces admin privileges.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CouponCreate {
    #[validate(length(min = 1, max = 64))]
    pub code: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount_percent: Option<f64>,
    pub discount_amount: Option<u64>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CouponUpdate {
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount_percent: Option<f64>,
    pub discount_amount: Option<u64>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
    pub active: Option<bool>,
}

/// Result of validating a coupon against a plan price. Advisory only: the
/// backend re-derives the charged amount when the order is created.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PricingOutcome {
    pub original_amount: u64,
    pub discounted_amount: u64,
}

impl PricingOutcome {
    pub fn display_original(&self) -> String {
        display_major_units(self.original_amount)
    }

    pub fn display_discounted(&self) -> String {
        display_major_units(self.discounted_amount)
    }
}
