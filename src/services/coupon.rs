use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::CouponError;
use crate::models::coupon::{Coupon, PricingOutcome};
use crate::services::backend::BackendClient;

/// Validates coupon codes and previews the discounted price. Never touches
/// the entitlement state; only a verified payment finalizes anything.
#[derive(Clone)]
pub struct CouponValidator {
    backend: BackendClient,
}

impl CouponValidator {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// Preview the price a coupon would produce for the given plan amount.
    ///
    /// An empty or whitespace-only code is a no-op (`Ok(None)`), not an
    /// error, and makes no network call. Unknown codes and any transport or
    /// parse failure report `CouponError::Invalid` so an error can never
    /// surface as a discount.
    pub async fn preview(
        &self,
        code: &str,
        now: DateTime<Utc>,
        plan_amount: u64,
    ) -> Result<Option<PricingOutcome>, CouponError> {
        if code.trim().is_empty() {
            return Ok(None);
        }

        let code = normalize_code(code);
        let coupon = match self.backend.coupon(&code).await {
            Ok(Some(coupon)) => coupon,
            Ok(None) => return Err(CouponError::Invalid),
            Err(e) => {
                log::warn!("Coupon lookup failed for {}: {:#}", code, e);
                return Err(CouponError::Invalid);
            }
        };

        price_with_coupon(&coupon, now, plan_amount).map(Some)
    }
}

/// Coupon codes are case-insensitive keys.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Pure pricing: check the coupon's activity and validity window, then
/// compute the discounted amount.
///
/// Both window bounds are inclusive. Percentage discounts are computed in
/// decimal arithmetic and rounded half away from zero (half-up); the result
/// always stays within `0..=plan_amount`. A coupon with neither discount
/// field is still valid and leaves the price unchanged.
pub fn price_with_coupon(
    coupon: &Coupon,
    now: DateTime<Utc>,
    plan_amount: u64,
) -> Result<PricingOutcome, CouponError> {
    if !coupon.active {
        return Err(CouponError::Inactive);
    }

    if let Some(from) = coupon.valid_from {
        if now < from {
            return Err(CouponError::OutOfWindow);
        }
    }
    if let Some(to) = coupon.valid_to {
        if now > to {
            return Err(CouponError::OutOfWindow);
        }
    }

    // Percent takes precedence when both discount fields are present.
    let discounted_amount = if let Some(percent) = coupon.discount_percent {
        percent_discount(plan_amount, percent)
    } else if let Some(flat) = coupon.discount_amount {
        plan_amount.saturating_sub(flat)
    } else {
        plan_amount
    };

    Ok(PricingOutcome {
        original_amount: plan_amount,
        discounted_amount,
    })
}

fn percent_discount(plan_amount: u64, percent: Decimal) -> u64 {
    let percent = percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let fraction = (Decimal::ONE_HUNDRED - percent) / Decimal::ONE_HUNDRED;
    let discounted = (Decimal::from(plan_amount) * fraction)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    discounted.to_u64().unwrap_or(0).min(plan_amount)
}
