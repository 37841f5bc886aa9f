//! Credential records and the closed enums that describe them

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Quota ceiling assigned to Gemini keys at creation
pub const GEMINI_LIMIT: u32 = 1500;
/// Quota ceiling for every provider without its own entry
pub const DEFAULT_LIMIT: u32 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown provider: {0}")]
pub struct ProviderParseError(pub String);

/// LLM vendor a key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    Gemini,
    OpenAI,
    Anthropic,
    Mistral,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::Gemini,
        Provider::OpenAI,
        Provider::Anthropic,
        Provider::Mistral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini",
            Provider::OpenAI => "OpenAI",
            Provider::Anthropic => "Anthropic",
            Provider::Mistral => "Mistral",
        }
    }

    /// Quota ceiling for a freshly added key
    pub fn default_limit(&self) -> u32 {
        match self {
            Provider::Gemini => GEMINI_LIMIT,
            _ => DEFAULT_LIMIT,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ProviderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAI),
            "anthropic" => Ok(Provider::Anthropic),
            "mistral" => Ok(Provider::Mistral),
            _ => Err(ProviderParseError(s.to_string())),
        }
    }
}

/// Lifecycle state persisted with each key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStatus {
    Active,
    Depleted,
    Expired,
}

impl KeyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyStatus::Active => "active",
            KeyStatus::Depleted => "depleted",
            KeyStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tracked API key with its simulated usage
///
/// Field names on the wire match the stored layout used by earlier versions
/// of the vault, so existing snapshots keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub id: String,
    pub provider: Provider,
    #[serde(rename = "key")]
    pub secret: String,
    pub label: String,
    /// Stored as given; see [`ApiKey::computed_usage_percent`] for the derived value.
    pub usage_percent: u32,
    pub total_limit: u32,
    #[serde(rename = "used")]
    pub used_amount: u32,
    pub status: KeyStatus,
    pub created_at: NaiveDate,
}

impl ApiKey {
    /// Build a fresh, unused key with the provider's default quota
    pub fn new(
        id: impl Into<String>,
        secret: impl Into<String>,
        provider: Provider,
        label: impl Into<String>,
        created_at: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            provider,
            secret: secret.into(),
            label: label.into(),
            usage_percent: 0,
            total_limit: provider.default_limit(),
            used_amount: 0,
            status: KeyStatus::Active,
            created_at,
        }
    }

    /// Depleted by status, or by having hit the usage threshold while the
    /// status still reads active.
    pub fn is_effectively_depleted(&self) -> bool {
        self.status == KeyStatus::Depleted || self.usage_percent >= 100
    }

    /// `round(used / limit * 100)`, independent of the stored percentage
    pub fn computed_usage_percent(&self) -> u32 {
        if self.total_limit == 0 {
            return 0;
        }
        ((self.used_amount as f64 / self.total_limit as f64) * 100.0).round() as u32
    }

    /// First 8 and last 4 characters of the secret
    pub fn masked_secret(&self) -> String {
        mask_secret(&self.secret)
    }
}

pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let head: String = chars.iter().take(8).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{}...{}", head, tail)
}

fn seed_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Demonstration keys used when nothing has been persisted yet
pub fn seed_keys() -> Vec<ApiKey> {
    vec![
        ApiKey {
            id: "1".to_string(),
            provider: Provider::Gemini,
            secret: "AIzaSy...ExampleKey1".to_string(),
            label: "Main Account".to_string(),
            usage_percent: 45,
            total_limit: GEMINI_LIMIT,
            used_amount: 675,
            status: KeyStatus::Active,
            created_at: seed_date(2023, 10, 1),
        },
        ApiKey {
            id: "2".to_string(),
            provider: Provider::Gemini,
            secret: "AIzaSy...ExampleKey2".to_string(),
            label: "Backup Account A".to_string(),
            usage_percent: 92,
            total_limit: GEMINI_LIMIT,
            used_amount: 1380,
            status: KeyStatus::Active,
            created_at: seed_date(2023, 10, 5),
        },
        ApiKey {
            id: "3".to_string(),
            provider: Provider::OpenAI,
            secret: "sk-proj...ExampleKey3".to_string(),
            label: "Test Account".to_string(),
            usage_percent: 100,
            total_limit: DEFAULT_LIMIT,
            used_amount: 500,
            status: KeyStatus::Depleted,
            created_at: seed_date(2023, 9, 15),
        },
    ]
}
