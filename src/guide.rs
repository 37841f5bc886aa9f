//! Where to go to get a new key for each provider

use serde::Serialize;

use crate::model::Provider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderGuide {
    pub provider: Provider,
    pub login_url: &'static str,
    pub keys_url: &'static str,
    pub billing_url: &'static str,
    pub steps: [&'static str; 4],
}

const GEMINI: ProviderGuide = ProviderGuide {
    provider: Provider::Gemini,
    login_url: "https://accounts.google.com/signin",
    keys_url: "https://aistudio.google.com/app/apikey",
    billing_url: "https://console.cloud.google.com/billing",
    steps: [
        "Log in to your Google account.",
        "Click 'Create API Key' in Google AI Studio.",
        "Select a project (or create a new 'My First Project').",
        "Copy the generated key and paste it below.",
    ],
};

const OPENAI: ProviderGuide = ProviderGuide {
    provider: Provider::OpenAI,
    login_url: "https://platform.openai.com/login",
    keys_url: "https://platform.openai.com/api-keys",
    billing_url: "https://platform.openai.com/usage",
    steps: [
        "Access OpenAI platform and verify phone if needed.",
        "Go to the 'API Keys' section in the sidebar.",
        "Click 'Create new secret key'.",
        "Name it, copy the key, and paste it below.",
    ],
};

const ANTHROPIC: ProviderGuide = ProviderGuide {
    provider: Provider::Anthropic,
    login_url: "https://console.anthropic.com/login",
    keys_url: "https://console.anthropic.com/settings/keys",
    billing_url: "https://console.anthropic.com/settings/plans",
    steps: [
        "Log in to the Anthropic Console.",
        "Click 'Get API Keys' in the dashboard.",
        "Click the 'Create Key' button.",
        "Copy the key starting with 'sk-ant' and paste below.",
    ],
};

const MISTRAL: ProviderGuide = ProviderGuide {
    provider: Provider::Mistral,
    login_url: "https://auth.mistral.ai/ui/login",
    keys_url: "https://console.mistral.ai/api-keys/",
    billing_url: "https://console.mistral.ai/billing/",
    steps: [
        "Create your account at Mistral AI.",
        "Add a card if required (sometimes trial is available without).",
        "Generate a new key in the 'API Keys' tab.",
        "Copy and paste below immediately (it only shows once).",
    ],
};

pub fn guide_for(provider: Provider) -> &'static ProviderGuide {
    match provider {
        Provider::Gemini => &GEMINI,
        Provider::OpenAI => &OPENAI,
        Provider::Anthropic => &ANTHROPIC,
        Provider::Mistral => &MISTRAL,
    }
}

/// Open the provider's key page in the system browser
pub fn open_keys_page(provider: Provider) -> std::io::Result<()> {
    let url = guide_for(provider).keys_url;
    tracing::info!(provider = %provider, url = %url, "Opening key page");
    open::that(url)
}
