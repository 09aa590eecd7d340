//! Session-side entitlement core for the interview-practice product.
//!
//! Decides whether the current user may start another interview or open a
//! premium assessment, previews coupon-discounted prices, and drives the
//! create-order / external-checkout / verify-payment sequence that upgrades
//! the session to premium.

pub mod config;
pub mod errors;
pub mod models;
pub mod services;

pub use config::{CheckoutConfig, Config};
pub use errors::{CouponError, EntitlementError, PaymentError};
pub use services::backend::{BackendClient, SessionContext};
pub use services::checkout::{CheckoutGateway, CheckoutHandle, CheckoutOutcome, CheckoutSession};
pub use services::coupon::CouponValidator;
pub use services::entitlement::EntitlementStore;
pub use services::orchestrator::PaymentOrchestrator;
pub use services::quota::{AccessDecision, DenyReason, QuotaGate};
