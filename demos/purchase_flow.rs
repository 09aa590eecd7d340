//! Wiring demo for the entitlement core. Loads the current subscription
//! status and plan catalog, previews a coupon, then walks the purchase flow
//! with a stub gateway whose widget is immediately closed, exercising the
//! cancellation path end to end.
//!
//! Requires API_BASE_URL (and optionally DEMO_COUPON) in the environment.

use chrono::Utc;
use dotenv::dotenv;
use std::env;

use interview_entitlement::models::payment::CheckoutOptions;
use interview_entitlement::models::subscription::PlanId;
use interview_entitlement::{
    BackendClient, CheckoutGateway, CheckoutSession, Config, CouponValidator, EntitlementStore,
    PaymentError, PaymentOrchestrator, QuotaGate, SessionContext,
};

/// Stands in for the real checkout widget: opens and is closed right away.
struct DismissingGateway;

impl CheckoutGateway for DismissingGateway {
    fn open(&self, options: CheckoutOptions) -> CheckoutSession {
        println!(
            "Checkout would open for order {} ({} {})",
            options.order_id, options.amount, options.currency
        );
        let (handle, session) = CheckoutSession::channel();
        handle.dismiss();
        session
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env().expect("Failed to load configuration");
    let session = SessionContext {
        user_id: env::var("DEMO_USER_ID").unwrap_or_else(|_| "demo_user".to_string()),
        auth_token: env::var("DEMO_AUTH_TOKEN").unwrap_or_default(),
        display_name: "Demo User".to_string(),
        email: "demo@example.com".to_string(),
    };

    let backend = BackendClient::new(&config, session)?;
    let store = EntitlementStore::new(backend.clone());

    match store.reload().await {
        Ok(status) => println!(
            "Subscription: premium={} remaining_free_interviews={:?}",
            status.is_premium, status.remaining_free_interviews
        ),
        Err(e) => println!("Status unavailable, treating as restricted: {}", e),
    }

    let gate = QuotaGate::new(store.clone());
    println!("Interview gate: {:?}", gate.check_interview().await);
    println!(
        "Premium assessment gate: {:?}",
        gate.check_premium_assessment().await
    );

    let plans = store.plans().await;
    for (id, plan) in &plans {
        println!("Plan {}: {} ({} {})", id, plan.name, plan.display_amount(), plan.currency);
    }

    if let Some(premium) = plans.get(&PlanId::Premium) {
        let coupon = env::var("DEMO_COUPON").unwrap_or_else(|_| "SAVE20".to_string());
        let validator = CouponValidator::new(backend.clone());
        match validator.preview(&coupon, Utc::now(), premium.amount).await {
            Ok(Some(outcome)) => println!(
                "Coupon {}: {} -> {}",
                coupon,
                outcome.display_original(),
                outcome.display_discounted()
            ),
            Ok(None) => println!("No coupon entered"),
            Err(e) => println!("Coupon rejected: {}", e),
        }

        let orchestrator = PaymentOrchestrator::new(
            backend,
            store,
            DismissingGateway,
            config.checkout.clone(),
        );

        match orchestrator.purchase(None).await {
            Ok(receipt) => println!("Purchase verified: order {}", receipt.order_id),
            Err(PaymentError::UserCancelled) => {
                println!("Checkout closed by the user; nothing charged")
            }
            Err(e) => println!("Purchase failed: {}", e),
        }
    }

    Ok(())
}
