use crate::models::subscription::SubscriptionStatus;
use crate::services::entitlement::EntitlementStore;

/// Premium users have an unlimited quota; free users need a remaining
/// counter above zero. An unknown counter fails closed.
pub fn can_start_interview(status: &SubscriptionStatus) -> bool {
    status.is_premium || status.remaining_free_interviews.map_or(false, |left| left > 0)
}

pub fn can_access_premium_assessment(status: &SubscriptionStatus) -> bool {
    status.is_premium
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The free interview quota is used up.
    QuotaExhausted,
    /// The feature is premium-only.
    PremiumRequired,
    /// Entitlement could not be loaded; treated as the most restrictive tier.
    StatusUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    Denied(DenyReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed)
    }

    /// Denials that should route the user to the upgrade flow instead of a
    /// plain error.
    pub fn suggests_upgrade(&self) -> bool {
        matches!(
            self,
            AccessDecision::Denied(DenyReason::QuotaExhausted)
                | AccessDecision::Denied(DenyReason::PremiumRequired)
        )
    }
}

/// Gate checks run immediately before the gated action. Each check reloads
/// the entitlement first; the backend owns counters that can change from
/// other sessions or admin actions, so a decision is never cached across
/// navigation.
#[derive(Clone)]
pub struct QuotaGate {
    store: EntitlementStore,
}

impl QuotaGate {
    pub fn new(store: EntitlementStore) -> Self {
        Self { store }
    }

    pub async fn check_interview(&self) -> AccessDecision {
        match self.store.reload().await {
            Ok(status) if can_start_interview(&status) => AccessDecision::Allowed,
            Ok(_) => AccessDecision::Denied(DenyReason::QuotaExhausted),
            Err(e) => {
                log::warn!("Denying interview start, entitlement unavailable: {}", e);
                AccessDecision::Denied(DenyReason::StatusUnavailable)
            }
        }
    }

    pub async fn check_premium_assessment(&self) -> AccessDecision {
        match self.store.reload().await {
            Ok(status) if can_access_premium_assessment(&status) => AccessDecision::Allowed,
            Ok(_) => AccessDecision::Denied(DenyReason::PremiumRequired),
            Err(e) => {
                log::warn!(
                    "Denying premium assessment access, entitlement unavailable: {}",
                    e
                );
                AccessDecision::Denied(DenyReason::StatusUnavailable)
            }
        }
    }
}
