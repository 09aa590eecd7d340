use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Purchase attempt state machine. One attempt per order; an order is never
/// reused once a terminal state is reached.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum OrderState {
    Created,
    AwaitingGateway,
    Verifying,
    Succeeded,
    Failed,
}

impl OrderState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderState::Succeeded | OrderState::Failed)
    }

    /// A live attempt blocks starting another purchase.
    pub fn is_live(&self) -> bool {
        matches!(self, OrderState::AwaitingGateway | OrderState::Verifying)
    }
}

/// Order minted by the backend for one purchase attempt. The backend is the
/// sole authority for the charged amount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentOrder {
    pub order_id: String,
    pub amount: u64,
    pub currency: String,
    #[serde(rename = "key_id")]
    pub gateway_key_id: String,
}

/// Options object handed to the checkout widget. Field names match the
/// gateway contract and must not change.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CheckoutOptions {
    pub key: String,
    pub amount: u64,
    pub currency: String,
    pub order_id: String,
    pub name: String,
    pub description: String,
    pub prefill: CheckoutPrefill,
    pub theme: CheckoutTheme,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CheckoutPrefill {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CheckoutTheme {
    pub color: String,
}

/// The single completion payload the gateway delivers for a successful
/// checkout. Forwarded verbatim to payment verification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutCompletion {
    pub razorpay_payment_id: String,
    pub razorpay_order_id: String,
    pub razorpay_signature: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerificationResponse {
    pub status: VerificationStatus,
    #[serde(default)]
    pub message: Option<String>,
}

/// Observable state of the orchestrator's current purchase attempt.
#[derive(Debug, Clone)]
pub struct AttemptStatus {
    pub attempt_id: Uuid,
    pub order_id: Option<String>,
    pub state: OrderState,
}

/// Outcome of a verified purchase, handed back to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub order_id: String,
    pub payment_id: String,
    pub amount: u64,
    pub currency: String,
}
