use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditPackage {
    pub id: String,
    pub name: String,
    pub credits: u32,
    /// Price in US cents.
    pub price_cents: u32,
    pub description: String,
    #[serde(default)]
    pub is_popular: bool,
}

impl CreditPackage {
    pub fn display_price(&self) -> String {
        format!("${}.{:02}", self.price_cents / 100, self.price_cents % 100)
    }
}

pub static CREDIT_PACKAGES: Lazy<Vec<CreditPackage>> = Lazy::new(|| {
    vec![
        CreditPackage {
            id: "starter".to_string(),
            name: "Starter Pack".to_string(),
            credits: 50,
            price_cents: 499,
            description: "Perfect for trying out new ideas and getting started.".to_string(),
            is_popular: false,
        },
        CreditPackage {
            id: "creator".to_string(),
            name: "Creator Pack".to_string(),
            credits: 250,
            price_cents: 1999,
            description: "Ideal for frequent users and small projects.".to_string(),
            is_popular: true,
        },
        CreditPackage {
            id: "pro".to_string(),
            name: "Pro Pack".to_string(),
            credits: 1000,
            price_cents: 6999,
            description: "The best value for power users and large-scale generation.".to_string(),
            is_popular: false,
        },
    ]
});

pub fn find_package(id: &str) -> Option<&'static CreditPackage> {
    CREDIT_PACKAGES
        .iter()
        .find(|pkg| pkg.id.eq_ignore_ascii_case(id.trim()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

/// Receipt of a simulated credit purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub user_id: String,
    pub amount_cents: u32,
    pub credits_added: u32,
    pub charge_id: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn simulated(user_id: impl Into<String>, package: &CreditPackage) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            amount_cents: package.price_cents,
            credits_added: package.credits,
            charge_id: format!("sim_{}", Uuid::new_v4().simple()),
            status: PaymentStatus::Success,
            created_at: Utc::now(),
        }
    }
}
