use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::display_major_units;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionState {
    Free,
    Active,
    Expired,
    Cancelled,
}

/// Snapshot of the user's entitlement as reported by the backend. Fetched
/// fresh for every gating decision; the only client-side mutation is the
/// premium flip after a verified payment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionStatus {
    pub is_premium: bool,
    pub subscription_status: SubscriptionState,
    pub subscription_end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_interviews: u32,
    pub can_take_interview: bool,
    pub can_access_premium_assessment: bool,
    pub remaining_free_interviews: Option<u32>,
}

impl SubscriptionStatus {
    /// The most restrictive tier, used when the real status cannot be
    /// loaded: no premium access and no free interviews left.
    pub fn restricted() -> Self {
        Self {
            is_premium: false,
            subscription_status: SubscriptionState::Free,
            subscription_end_date: None,
            completed_interviews: 0,
            can_take_interview: false,
            can_access_premium_assessment: false,
            remaining_free_interviews: Some(0),
        }
    }

    /// In-memory premium flip applied after a verified payment. Premium
    /// implies assessment access and an unlimited interview quota.
    pub fn activate_premium(&mut self) {
        self.is_premium = true;
        self.subscription_status = SubscriptionState::Active;
        self.can_take_interview = true;
        self.can_access_premium_assessment = true;
        self.remaining_free_interviews = None;
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PlanId {
    Free,
    Premium,
}

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanId::Free => write!(f, "free"),
            PlanId::Premium => write!(f, "premium"),
        }
    }
}

/// Immutable plan catalog entry. Amounts are in minor currency units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub description: String,
    pub amount: u64,
    pub currency: String,
    pub features: Vec<String>,
}

pub type PlanCatalog = HashMap<PlanId, Plan>;

impl Plan {
    pub fn display_amount(&self) -> String {
        display_major_units(self.amount)
    }
}
