use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_base_url: String,
    pub checkout: CheckoutConfig,
    pub request_timeout_secs: u64,
}

/// Presentation settings for the external checkout widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    pub label: String,
    pub description: String,
    pub theme_color: String,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            api_base_url: env::var("API_BASE_URL")?,

            checkout: CheckoutConfig {
                label: env::var("CHECKOUT_LABEL")
                    .unwrap_or_else(|_| "Interview Bot".to_string()),
                description: env::var("CHECKOUT_DESCRIPTION")
                    .unwrap_or_else(|_| "Premium Subscription".to_string()),
                theme_color: env::var("CHECKOUT_THEME_COLOR")
                    .unwrap_or_else(|_| "#3399cc".to_string()),
            },

            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
        })
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            label: "Interview Bot".to_string(),
            description: "Premium Subscription".to_string(),
            theme_color: "#3399cc".to_string(),
        }
    }
}
