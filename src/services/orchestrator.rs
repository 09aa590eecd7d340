use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::config::CheckoutConfig;
use crate::errors::PaymentError;
use crate::models::payment::{
    AttemptStatus, CheckoutCompletion, CheckoutOptions, CheckoutPrefill, CheckoutTheme,
    OrderState, PaymentOrder, PurchaseReceipt, VerificationStatus,
};
use crate::services::backend::BackendClient;
use crate::services::checkout::{CheckoutGateway, CheckoutOutcome};
use crate::services::entitlement::EntitlementStore;

/// Drives one purchase attempt at a time through
/// Created -> AwaitingGateway -> Verifying -> Succeeded | Failed.
///
/// One orchestrator per session; a second purchase started while an attempt
/// is awaiting the gateway or verifying is rejected so two verifications can
/// never race against the same entitlement flip.
pub struct PaymentOrchestrator<G: CheckoutGateway> {
    backend: BackendClient,
    store: EntitlementStore,
    gateway: G,
    checkout: CheckoutConfig,
    attempt_lock: Arc<Mutex<()>>,
    attempt: Arc<RwLock<Option<AttemptStatus>>>,
    completed: Arc<RwLock<Option<(CheckoutCompletion, PurchaseReceipt)>>>,
}

impl<G: CheckoutGateway> PaymentOrchestrator<G> {
    pub fn new(
        backend: BackendClient,
        store: EntitlementStore,
        gateway: G,
        checkout: CheckoutConfig,
    ) -> Self {
        Self {
            backend,
            store,
            gateway,
            checkout,
            attempt_lock: Arc::new(Mutex::new(())),
            attempt: Arc::new(RwLock::new(None)),
            completed: Arc::new(RwLock::new(None)),
        }
    }

    /// Run a full purchase attempt: mint an order (coupon-adjusted server
    /// side), open the checkout widget, await its single outcome, and verify
    /// the payment. The gateway wait is unbounded and user-controlled;
    /// closing the widget resolves it to `UserCancelled`.
    pub async fn purchase(
        &self,
        coupon_code: Option<&str>,
    ) -> Result<PurchaseReceipt, PaymentError> {
        let _active = self
            .attempt_lock
            .try_lock()
            .map_err(|_| PaymentError::AttemptInProgress)?;

        let attempt_id = Uuid::new_v4();
        self.begin_attempt(attempt_id).await;
        log::info!("Purchase attempt {} started", attempt_id);

        let order = match self.backend.create_payment_order(coupon_code).await {
            Ok(order) => order,
            Err(e) => {
                // Terminal before the gateway is ever opened.
                self.transition(OrderState::Failed).await;
                log::warn!("Purchase attempt {} could not mint an order: {:#}", attempt_id, e);
                return Err(PaymentError::OrderCreationFailed(e));
            }
        };

        self.set_order(&order.order_id).await;
        self.transition(OrderState::AwaitingGateway).await;

        let session = self.gateway.open(self.checkout_options(&order));
        let completion = match session.outcome().await {
            CheckoutOutcome::Completed(completion) => completion,
            CheckoutOutcome::Dismissed => {
                self.transition(OrderState::Failed).await;
                log::info!("Purchase attempt {} dismissed at checkout", attempt_id);
                return Err(PaymentError::UserCancelled);
            }
        };

        self.verify_inner(&order, &completion).await
    }

    /// Verify a gateway completion for an order. Idempotent: replaying an
    /// already-verified completion returns the recorded receipt without a
    /// second backend call or a second entitlement flip.
    pub async fn verify(
        &self,
        order: &PaymentOrder,
        completion: &CheckoutCompletion,
    ) -> Result<PurchaseReceipt, PaymentError> {
        let _active = self
            .attempt_lock
            .try_lock()
            .map_err(|_| PaymentError::AttemptInProgress)?;

        self.verify_inner(order, completion).await
    }

    /// State of the current attempt, if one exists.
    pub async fn current_attempt(&self) -> Option<AttemptStatus> {
        self.attempt.read().await.clone()
    }

    async fn verify_inner(
        &self,
        order: &PaymentOrder,
        completion: &CheckoutCompletion,
    ) -> Result<PurchaseReceipt, PaymentError> {
        {
            let done = self.completed.read().await;
            if let Some((prev, receipt)) = done.as_ref() {
                if prev == completion {
                    log::debug!(
                        "Verification replay for order {}; returning recorded receipt",
                        completion.razorpay_order_id
                    );
                    return Ok(receipt.clone());
                }
            }
        }

        self.transition(OrderState::Verifying).await;

        let response = match self.backend.verify_payment(completion).await {
            Ok(response) => response,
            Err(e) => {
                // The charge may have gone through without confirmation; the
                // user has to be routed to support, never silently retried.
                self.transition(OrderState::Failed).await;
                log::warn!(
                    "Verification transport failure for order {}: {:#}",
                    order.order_id,
                    e
                );
                return Err(PaymentError::VerificationFailed {
                    reason: e.to_string(),
                });
            }
        };

        match response.status {
            VerificationStatus::Success => {
                self.store.mark_premium_activated().await;

                let receipt = PurchaseReceipt {
                    order_id: order.order_id.clone(),
                    payment_id: completion.razorpay_payment_id.clone(),
                    amount: order.amount,
                    currency: order.currency.clone(),
                };

                *self.completed.write().await = Some((completion.clone(), receipt.clone()));
                self.transition(OrderState::Succeeded).await;
                log::info!("Payment verified for order {}", order.order_id);
                Ok(receipt)
            }
            VerificationStatus::Failure => {
                self.transition(OrderState::Failed).await;
                let reason = response
                    .message
                    .unwrap_or_else(|| "verification rejected".to_string());
                log::warn!(
                    "Payment verification rejected for order {}: {}",
                    order.order_id,
                    reason
                );
                Err(PaymentError::VerificationFailed { reason })
            }
        }
    }

    async fn begin_attempt(&self, attempt_id: Uuid) {
        *self.attempt.write().await = Some(AttemptStatus {
            attempt_id,
            order_id: None,
            state: OrderState::Created,
        });
    }

    async fn set_order(&self, order_id: &str) {
        if let Some(attempt) = self.attempt.write().await.as_mut() {
            attempt.order_id = Some(order_id.to_string());
        }
    }

    async fn transition(&self, state: OrderState) {
        let mut attempt = self.attempt.write().await;
        match attempt.as_mut() {
            Some(attempt) => {
                log::debug!(
                    "Purchase attempt {} {:?} -> {:?}",
                    attempt.attempt_id,
                    attempt.state,
                    state
                );
                attempt.state = state;
            }
            // Standalone verification resumed after a reload.
            None => {
                *attempt = Some(AttemptStatus {
                    attempt_id: Uuid::new_v4(),
                    order_id: None,
                    state,
                });
            }
        }
    }

    fn checkout_options(&self, order: &PaymentOrder) -> CheckoutOptions {
        let session = self.backend.session();
        CheckoutOptions {
            key: order.gateway_key_id.clone(),
            amount: order.amount,
            currency: order.currency.clone(),
            order_id: order.order_id.clone(),
            name: self.checkout.label.clone(),
            description: self.checkout.description.clone(),
            prefill: CheckoutPrefill {
                name: session.display_name.clone(),
                email: session.email.clone(),
            },
            theme: CheckoutTheme {
                color: self.checkout.theme_color.clone(),
            },
        }
    }
}
