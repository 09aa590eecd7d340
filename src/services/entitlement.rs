use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::errors::EntitlementError;
use crate::models::subscription::{PlanCatalog, SubscriptionStatus};
use crate::services::backend::BackendClient;

#[derive(Debug, Default)]
struct CachedStatus {
    status: Option<SubscriptionStatus>,
    committed_issue: u64,
}

/// Single source of truth for the session's entitlement. One instance per
/// session; every consumer except the payment orchestrator is read-only.
#[derive(Clone)]
pub struct EntitlementStore {
    backend: BackendClient,
    inner: Arc<RwLock<CachedStatus>>,
    issue: Arc<AtomicU64>,
}

impl EntitlementStore {
    pub fn new(backend: BackendClient) -> Self {
        Self {
            backend,
            inner: Arc::new(RwLock::new(CachedStatus::default())),
            issue: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Fetch a fresh status from the backend.
    ///
    /// Loads are ticketed so that a response completing after a newer load
    /// has already committed is discarded; the caller then gets the fresher
    /// cached value instead of the stale response. On failure the previous
    /// cached state is left untouched and the caller must treat the user as
    /// the most restrictive tier.
    pub async fn reload(&self) -> Result<SubscriptionStatus, EntitlementError> {
        let ticket = self.issue.fetch_add(1, Ordering::SeqCst) + 1;

        match self.backend.subscription_status().await {
            Ok(status) => {
                let mut inner = self.inner.write().await;
                if ticket > inner.committed_issue {
                    inner.committed_issue = ticket;
                    inner.status = Some(status.clone());
                    Ok(status)
                } else {
                    log::debug!(
                        "Discarding stale subscription status (load {} superseded by {})",
                        ticket,
                        inner.committed_issue
                    );
                    Ok(inner.status.clone().unwrap_or(status))
                }
            }
            Err(e) => {
                log::warn!("Subscription status reload failed: {:#}", e);
                Err(EntitlementError::Unavailable(e))
            }
        }
    }

    /// Most recently committed status, if any load has succeeded yet.
    pub async fn cached(&self) -> Option<SubscriptionStatus> {
        self.inner.read().await.status.clone()
    }

    /// Drop the cached status so the next gating decision must reload.
    pub async fn invalidate(&self) {
        let mut inner = self.inner.write().await;
        inner.status = None;
    }

    /// Plan catalog. Fails closed to an empty catalog on any error.
    pub async fn plans(&self) -> PlanCatalog {
        match self.backend.subscription_plans().await {
            Ok(plans) => plans,
            Err(e) => {
                log::warn!("Subscription plans fetch failed: {:#}", e);
                PlanCatalog::new()
            }
        }
    }

    /// In-memory premium flip after a verified payment. Called only by the
    /// payment orchestrator; the next full reload is authoritative.
    pub async fn mark_premium_activated(&self) {
        let mut inner = self.inner.write().await;
        let mut status = inner
            .status
            .clone()
            .unwrap_or_else(SubscriptionStatus::restricted);
        status.activate_premium();
        inner.status = Some(status);

        log::info!("Entitlement marked premium pending next reload");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::backend::test_support::test_client;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn status_body(is_premium: bool, remaining: Option<u32>) -> serde_json::Value {
        json!({
            "is_premium": is_premium,
            "subscription_status": if is_premium { "active" } else { "free" },
            "subscription_end_date": null,
            "completed_interviews": 0,
            "can_take_interview": is_premium || remaining.unwrap_or(0) > 0,
            "can_access_premium_assessment": is_premium,
            "remaining_free_interviews": remaining
        })
    }

    #[tokio::test]
    async fn test_reload_commits_fresh_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/payments/subscription-status"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(status_body(false, Some(1))),
            )
            .mount(&server)
            .await;

        let store = EntitlementStore::new(test_client(&server.uri()));
        assert!(store.cached().await.is_none());

        let status = store.reload().await.unwrap();
        assert!(!status.is_premium);
        assert_eq!(store.cached().await.unwrap(), status);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_state() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/payments/subscription-status"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(status_body(true, None)),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/payments/subscription-status"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let store = EntitlementStore::new(test_client(&server.uri()));

        let first = store.reload().await.unwrap();
        assert!(first.is_premium);

        let second = store.reload().await;
        assert!(second.is_err());
        // Cache still holds the last good snapshot, not a partial one.
        assert!(store.cached().await.unwrap().is_premium);
    }

    #[tokio::test]
    async fn test_stale_response_does_not_overwrite_newer_load() {
        let server = MockServer::start().await;

        // First request to arrive is served a delayed free-tier response;
        // the second gets the premium one immediately.
        Mock::given(method("GET"))
            .and(path("/api/payments/subscription-status"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(status_body(false, Some(0)))
                    .set_delay(Duration::from_millis(300)),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/payments/subscription-status"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(status_body(true, None)),
            )
            .mount(&server)
            .await;

        let store = EntitlementStore::new(test_client(&server.uri()));

        let slow = tokio::spawn({
            let store = store.clone();
            async move { store.reload().await }
        });

        // Let the slow request get issued before the fast one.
        tokio::time::sleep(Duration::from_millis(100)).await;

        let fresh = store.reload().await.unwrap();
        assert!(fresh.is_premium);

        // The out-of-order completion is discarded: the caller sees the
        // fresher committed value and the cache is not overwritten.
        let slow_result = slow.await.unwrap().unwrap();
        assert!(slow_result.is_premium);
        assert!(store.cached().await.unwrap().is_premium);
    }

    #[tokio::test]
    async fn test_plans_fail_closed_to_empty_catalog() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/payments/subscription-plans"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let store = EntitlementStore::new(test_client(&server.uri()));
        assert!(store.plans().await.is_empty());
    }

    #[tokio::test]
    async fn test_invalidate_clears_cache() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/payments/subscription-status"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(status_body(false, Some(1))),
            )
            .mount(&server)
            .await;

        let store = EntitlementStore::new(test_client(&server.uri()));
        store.reload().await.unwrap();
        assert!(store.cached().await.is_some());

        store.invalidate().await;
        assert!(store.cached().await.is_none());
    }

    #[tokio::test]
    async fn test_mark_premium_activated_flips_cached_state() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/payments/subscription-status"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(status_body(false, Some(0))),
            )
            .mount(&server)
            .await;

        let store = EntitlementStore::new(test_client(&server.uri()));
        store.reload().await.unwrap();

        store.mark_premium_activated().await;

        let cached = store.cached().await.unwrap();
        assert!(cached.is_premium);
        assert!(cached.can_access_premium_assessment);
        assert!(cached.can_take_interview);
    }
}
