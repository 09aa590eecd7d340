use thiserror::Error;

/// Failure to load subscription status or plans. Callers must fall back to
/// the most restrictive tier instead of guessing optimistically.
#[derive(Debug, Error)]
pub enum EntitlementError {
    #[error("subscription status unavailable: {0}")]
    Unavailable(anyhow::Error),
}

/// A coupon that was rejected. No discount is ever shown for a rejected
/// coupon; the original plan price stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CouponError {
    #[error("invalid coupon code")]
    Invalid,
    #[error("coupon is inactive")]
    Inactive,
    #[error("coupon is not valid at this time")]
    OutOfWindow,
}

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("could not start the purchase: {0}")]
    OrderCreationFailed(anyhow::Error),

    /// The user closed the checkout widget. Benign; no error banner.
    #[error("checkout was closed before payment completed")]
    UserCancelled,

    /// The payment may have been charged but could not be confirmed. The
    /// user must be told to contact support; never retried automatically.
    #[error("payment verification failed: {reason}. Please contact support")]
    VerificationFailed { reason: String },

    /// A purchase attempt is already awaiting the gateway or verifying.
    #[error("another purchase attempt is already in progress")]
    AttemptInProgress,
}
