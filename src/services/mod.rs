pub mod backend;
pub mod checkout;
pub mod coupon;
pub mod entitlement;
pub mod orchestrator;
pub mod quota;
