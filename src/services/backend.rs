use anyhow::{anyhow, Result};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use validator::Validate;

use crate::config::Config;
use crate::models::coupon::{Coupon, CouponCreate, CouponUpdate};
use crate::models::payment::{CheckoutCompletion, PaymentOrder, VerificationResponse};
use crate::models::subscription::{PlanCatalog, SubscriptionStatus};

/// Explicit session identity passed to every boundary call. No ambient
/// global token storage.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_id: String,
    pub auth_token: String,
    pub display_name: String,
    pub email: String,
}

/// HTTP client for the backend request/response boundary. Transport and
/// parse failures surface as `anyhow::Error`; mapping into the user-facing
/// error taxonomy happens in the services that call this.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    session: SessionContext,
}

impl BackendClient {
    pub fn new(config: &Config, session: SessionContext) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub async fn subscription_status(&self) -> Result<SubscriptionStatus> {
        let url = format!("{}/api/payments/subscription-status", self.base_url);

        log::debug!("Fetching subscription status for user {}", self.session.user_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.session.auth_token)
            .query(&[("user_id", self.session.user_id.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(anyhow!("Subscription status fetch failed: {}", error_text));
        }

        Ok(response.json().await?)
    }

    pub async fn subscription_plans(&self) -> Result<PlanCatalog> {
        let url = format!("{}/api/payments/subscription-plans", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.session.auth_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(anyhow!("Subscription plans fetch failed: {}", error_text));
        }

        Ok(response.json().await?)
    }

    /// Look up a coupon by its (already normalized) code. A 404 is a known
    /// shape, not a transport failure.
    pub async fn coupon(&self, code: &str) -> Result<Option<Coupon>> {
        let url = format!("{}/api/coupons/{}", self.base_url, code);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.session.auth_token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(anyhow!("Coupon lookup failed: {}", error_text));
        }

        Ok(Some(response.json().await?))
    }

    /// Mint a payment order for the premium plan. The backend re-derives any
    /// coupon discount itself; the client-side preview is advisory only.
    pub async fn create_payment_order(&self, coupon_code: Option<&str>) -> Result<PaymentOrder> {
        let url = format!("{}/api/payments/create-subscription", self.base_url);

        log::info!(
            "Creating payment order for user {} (coupon: {})",
            self.session.user_id,
            coupon_code.unwrap_or("none")
        );

        let mut request = self
            .client
            .post(&url)
            .bearer_auth(&self.session.auth_token)
            .query(&[("user_id", self.session.user_id.as_str())]);

        if let Some(code) = coupon_code {
            request = request.query(&[("coupon_code", code)]);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(anyhow!("Order creation failed: {}", error_text));
        }

        Ok(response.json().await?)
    }

    /// Forward the gateway completion triple verbatim. The backend is the
    /// sole verifier of the cryptographic signature.
    pub async fn verify_payment(
        &self,
        completion: &CheckoutCompletion,
    ) -> Result<VerificationResponse> {
        let url = format!("{}/api/payments/verify-payment", self.base_url);

        log::info!(
            "Verifying payment {} for order {}",
            completion.razorpay_payment_id,
            completion.razorpay_order_id
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.session.auth_token)
            .query(&[("user_id", self.session.user_id.as_str())])
            .json(completion)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(anyhow!("Payment verification request failed: {}", error_text));
        }

        Ok(response.json().await?)
    }

    // Admin-only coupon management. The backend enforces privileges; the
    // client just validates payload shape before sending.

    pub async fn coupons(&self) -> Result<Vec<Coupon>> {
        let url = format!("{}/api/coupons", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.session.auth_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(anyhow!("Coupon listing failed: {}", error_text));
        }

        Ok(response.json().await?)
    }

    pub async fn create_coupon(&self, coupon: &CouponCreate) -> Result<Coupon> {
        coupon
            .validate()
            .map_err(|e| anyhow!("Invalid coupon payload: {}", e))?;

        let url = format!("{}/api/coupons", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.session.auth_token)
            .json(coupon)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(anyhow!("Coupon creation failed: {}", error_text));
        }

        Ok(response.json().await?)
    }

    pub async fn update_coupon(&self, code: &str, update: &CouponUpdate) -> Result<Coupon> {
        update
            .validate()
            .map_err(|e| anyhow!("Invalid coupon update: {}", e))?;

        let url = format!("{}/api/coupons/{}", self.base_url, code);

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.session.auth_token)
            .json(update)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(anyhow!("Coupon update failed: {}", error_text));
        }

        Ok(response.json().await?)
    }

    pub async fn delete_coupon(&self, code: &str) -> Result<()> {
        let url = format!("{}/api/coupons/{}", self.base_url, code);

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.session.auth_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(anyhow!("Coupon deletion failed: {}", error_text));
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::config::CheckoutConfig;

    pub fn test_config(base_url: &str) -> Config {
        Config {
            api_base_url: base_url.to_string(),
            checkout: CheckoutConfig::default(),
            request_timeout_secs: 5,
        }
    }

    pub fn test_session() -> SessionContext {
        SessionContext {
            user_id: "user_1".to_string(),
            auth_token: "token_1".to_string(),
            display_name: "User".to_string(),
            email: "user@example.com".to_string(),
        }
    }

    pub fn test_client(base_url: &str) -> BackendClient {
        BackendClient::new(&test_config(base_url), test_session()).unwrap()
    }
}
