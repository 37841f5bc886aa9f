//! Commands exposed to the presentation layer
//!
//! Every command reports failure as a displayable `String`.

use serde::Serialize;

use crate::guide::{self, ProviderGuide};
use crate::identity::{self, IdentitySuggestion};
use crate::model::{ApiKey, Provider};
use crate::state::AppState;
use crate::stats::{self, DashboardStats, StatusBreakdown};
use crate::traits;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyResponse {
    pub id: String,
    pub provider: String,
    pub label: String,
    pub masked_key: String,
    pub usage_percent: u32,
    pub used: u32,
    pub total_limit: u32,
    pub status: String,
    pub depleted: bool,
    pub created_at: String,
}

impl From<&ApiKey> for KeyResponse {
    fn from(key: &ApiKey) -> Self {
        Self {
            id: key.id.clone(),
            provider: key.provider.to_string(),
            label: key.label.clone(),
            masked_key: key.masked_secret(),
            usage_percent: key.usage_percent,
            used: key.used_amount,
            total_limit: key.total_limit,
            status: key.status.to_string(),
            depleted: key.is_effectively_depleted(),
            created_at: key.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub summary: DashboardStats,
    pub chart: StatusBreakdown,
}

/// Where the user should go after picking a depleted key
#[derive(Debug, Serialize)]
pub struct CycleResponse {
    pub key: KeyResponse,
    pub guide: &'static ProviderGuide,
}

fn parse_provider(name: &str) -> Result<Provider, String> {
    name.parse::<Provider>().map_err(|e| e.to_string())
}

fn require_auth(state: &AppState) -> Result<(), String> {
    if state.vault.is_authenticated() {
        Ok(())
    } else {
        Err("Not logged in".to_string())
    }
}

/// Check the password against the login gate
pub fn login(state: &AppState, password: String) -> Result<(), String> {
    let accepted = state
        .vault
        .login(&password, &state.settings.password)
        .map_err(|e| e.to_string())?;
    if accepted {
        Ok(())
    } else {
        Err("Access Denied: Invalid credentials.".to_string())
    }
}

pub fn logout(state: &AppState) -> Result<(), String> {
    state.vault.logout().map_err(|e| e.to_string())
}

pub fn is_authenticated(state: &AppState) -> bool {
    state.vault.is_authenticated()
}

/// List keys in storage order
pub fn get_keys(state: &AppState) -> Result<Vec<KeyResponse>, String> {
    require_auth(state)?;
    Ok(state.vault.list().iter().map(KeyResponse::from).collect())
}

pub fn get_stats(state: &AppState) -> Result<StatsResponse, String> {
    require_auth(state)?;
    let keys = state.vault.list();
    Ok(StatsResponse {
        summary: stats::compute(&keys),
        chart: stats::breakdown(&keys),
    })
}

/// Add a key entered by the user
pub fn add_key(
    state: &AppState,
    secret: String,
    provider: String,
    label: Option<String>,
) -> Result<KeyResponse, String> {
    require_auth(state)?;
    let provider = parse_provider(&provider)?;
    let label = label
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| identity::suggest_label(provider));

    let key = state
        .vault
        .add(secret.trim(), provider, &label)
        .map_err(|e| e.to_string())?;
    Ok(KeyResponse::from(&key))
}

/// Delete a key once the user has confirmed. Unconfirmed calls change nothing.
pub fn delete_key(state: &AppState, id: String, confirmed: bool) -> Result<bool, String> {
    require_auth(state)?;
    if !confirmed {
        tracing::debug!(id = %id, "Delete not confirmed");
        return Ok(false);
    }
    state.vault.remove(&id).map_err(|e| e.to_string())
}

pub fn generate_identity() -> IdentitySuggestion {
    identity::generate()
}

pub fn suggest_label(provider: String) -> Result<String, String> {
    let provider = parse_provider(&provider)?;
    Ok(identity::suggest_label(provider))
}

pub fn get_guide(provider: String) -> Result<&'static ProviderGuide, String> {
    let provider = parse_provider(&provider)?;
    Ok(guide::guide_for(provider))
}

/// Route a (usually depleted) key to the acquisition guide for its provider
pub fn cycle_key(state: &AppState, id: String) -> Result<CycleResponse, String> {
    require_auth(state)?;
    let key = state
        .vault
        .get(&id)
        .ok_or_else(|| format!("Unknown key: {}", id))?;
    Ok(CycleResponse {
        guide: guide::guide_for(key.provider),
        key: KeyResponse::from(&key),
    })
}

/// Check a raw key against the provider. Any failure reads as invalid.
pub async fn validate_key(state: &AppState, secret: String) -> Result<bool, String> {
    require_auth(state)?;
    Ok(traits::validate_key(state.validator.as_ref(), &secret).await)
}

/// Ask the model for acquisition steps, authenticating with a stored key
pub async fn fetch_guide(state: &AppState, key_id: String, provider: String) -> Result<String, String> {
    require_auth(state)?;
    let provider = parse_provider(&provider)?;
    let key = state
        .vault
        .get(&key_id)
        .ok_or_else(|| format!("Unknown key: {}", key_id))?;
    Ok(traits::generate_guide(state.validator.as_ref(), &key.secret, provider.as_str()).await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Settings;
    use crate::mocks::{InMemoryPersistence, RecordedKeyValidator, ValidatorCall};
    use crate::traits::{ValidatorError, GUIDE_ERROR};

    fn logged_in(validator: RecordedKeyValidator) -> AppState {
        let state = AppState::with_parts(
            Arc::new(InMemoryPersistence::new()),
            Arc::new(validator),
            Settings::default(),
        );
        login(&state, "admin".to_string()).unwrap();
        state
    }

    #[test]
    fn test_commands_require_login() {
        let state = AppState::new_test();

        assert!(get_keys(&state).is_err());
        assert!(get_stats(&state).is_err());
        assert!(add_key(&state, "sk".into(), "OpenAI".into(), None).is_err());
        assert!(delete_key(&state, "1".into(), true).is_err());
    }

    #[test]
    fn test_wrong_password() {
        let state = AppState::new_test();
        let err = login(&state, "nope".to_string()).unwrap_err();
        assert_eq!(err, "Access Denied: Invalid credentials.");
        assert!(!is_authenticated(&state));
    }

    #[test]
    fn test_get_keys_masks_secrets() {
        let state = logged_in(RecordedKeyValidator::new());

        let keys = get_keys(&state).unwrap();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0].masked_key, "AIzaSy.....Key1");
        assert!(keys[2].depleted);
        assert!(!keys[0].depleted);
    }

    #[test]
    fn test_key_response_uses_camel_case() {
        let state = logged_in(RecordedKeyValidator::new());

        let json = serde_json::to_value(&get_keys(&state).unwrap()[0]).unwrap();

        assert_eq!(json["maskedKey"], "AIzaSy.....Key1");
        assert_eq!(json["usagePercent"], 45);
        assert_eq!(json["totalLimit"], 1500);
        assert_eq!(json["createdAt"], "2023-10-01");
        assert!(json.get("masked_key").is_none());
    }

    #[test]
    fn test_add_key_suggests_label_when_blank() {
        let state = logged_in(RecordedKeyValidator::new());

        let key = add_key(&state, "  sk-ant-123  ".into(), "anthropic".into(), Some(" ".into())).unwrap();

        assert!(key.label.starts_with("Anthropic Account #"));
        assert_eq!(key.total_limit, 500);
        assert_eq!(state.vault.get(&key.id).unwrap().secret, "sk-ant-123");
    }

    #[test]
    fn test_add_key_rejects_unknown_provider_and_empty_secret() {
        let state = logged_in(RecordedKeyValidator::new());

        assert_eq!(
            add_key(&state, "sk".into(), "Cohere".into(), None).unwrap_err(),
            "Unknown provider: Cohere"
        );
        assert_eq!(
            add_key(&state, "".into(), "Gemini".into(), None).unwrap_err(),
            "API key must not be empty"
        );
        assert_eq!(get_keys(&state).unwrap().len(), 3);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let state = logged_in(RecordedKeyValidator::new());

        assert!(!delete_key(&state, "1".into(), false).unwrap());
        assert_eq!(get_keys(&state).unwrap().len(), 3);

        assert!(delete_key(&state, "1".into(), true).unwrap());
        assert_eq!(get_keys(&state).unwrap().len(), 2);
    }

    #[test]
    fn test_stats_response() {
        let state = logged_in(RecordedKeyValidator::new());

        let stats = get_stats(&state).unwrap();
        assert_eq!(stats.summary.total, 3);
        assert_eq!(stats.summary.active, 2);
        assert_eq!(stats.summary.non_active, 1);
        assert_eq!(stats.chart.depleted, 1);
        assert_eq!(stats.chart.expired, 0);
    }

    #[test]
    fn test_cycle_key_points_to_provider_guide() {
        let state = logged_in(RecordedKeyValidator::new());

        let cycle = cycle_key(&state, "3".into()).unwrap();
        assert_eq!(cycle.guide.provider, Provider::OpenAI);
        assert_eq!(cycle.guide.keys_url, "https://platform.openai.com/api-keys");

        assert!(cycle_key(&state, "missing".into()).is_err());
    }

    #[tokio::test]
    async fn test_validate_key_degrades_to_false() {
        let state = logged_in(RecordedKeyValidator::always_fail(ValidatorError::HttpError(403)));
        assert!(!validate_key(&state, "AIza-bad".into()).await.unwrap());

        let state = logged_in(RecordedKeyValidator::new());
        assert!(validate_key(&state, "AIza-good".into()).await.unwrap());
    }

    #[tokio::test]
    async fn test_fetch_guide_uses_stored_secret() {
        let validator = RecordedKeyValidator::with_guide("- Go to console.mistral.ai");
        let state = logged_in(validator.clone());

        let text = fetch_guide(&state, "1".into(), "mistral".into()).await.unwrap();

        assert_eq!(text, "- Go to console.mistral.ai");
        assert_eq!(
            validator.calls(),
            vec![ValidatorCall::AskGuide {
                secret: "AIzaSy...ExampleKey1".to_string(),
                provider: "Mistral".to_string(),
            }]
        );
    }

    #[test]
    fn test_fetch_guide_failure_is_message_not_error() {
        let state = logged_in(RecordedKeyValidator::always_fail(ValidatorError::Timeout));

        let text = tokio_test::block_on(fetch_guide(&state, "1".into(), "OpenAI".into())).unwrap();

        assert_eq!(text, GUIDE_ERROR);
    }

    #[test]
    fn test_generate_identity_shape() {
        let identity = generate_identity();
        assert_eq!(identity.password.len(), 20);
        assert!(identity.email.ends_with("@gmail.com"));
    }

    #[test]
    fn test_get_guide_by_name() {
        assert_eq!(get_guide("gemini".into()).unwrap().provider, Provider::Gemini);
        assert!(get_guide("unknown".into()).is_err());
    }
}
