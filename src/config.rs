use anyhow::{Context, Result};

/// Default deployment namespace for the shared archive collection.
pub const DEFAULT_NAMESPACE: &str = "proper-market-bx";

/// Default completion-service endpoint.
pub const DEFAULT_COMPLETION_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-preview-09-2025:generateContent";

/// Runtime configuration for the guardian core.
///
/// All external coordinates live here and are passed explicitly at startup;
/// nothing in the crate reads ambient globals after construction.
#[derive(Debug, Clone)]
pub struct GuardianConfig {
    /// Identifies the shared archive collection for this deployment.
    pub store_namespace: String,
    /// Completion-service URL.
    pub completion_endpoint: String,
    /// API credential for the completion service.
    pub completion_credential: String,
    /// Optional externally provisioned sign-in token.
    pub auth_token: Option<String>,
}

impl GuardianConfig {
    /// Build a config with the default namespace and endpoint.
    pub fn new(completion_credential: impl Into<String>) -> Self {
        Self {
            store_namespace: DEFAULT_NAMESPACE.to_string(),
            completion_endpoint: DEFAULT_COMPLETION_ENDPOINT.to_string(),
            completion_credential: completion_credential.into(),
            auth_token: None,
        }
    }

    /// Load configuration from the environment (and `.env` if present).
    ///
    /// Recognized variables: `GUARDIAN_NAMESPACE`, `GUARDIAN_COMPLETION_ENDPOINT`,
    /// `GUARDIAN_COMPLETION_KEY` (required), `GUARDIAN_AUTH_TOKEN`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let completion_credential = std::env::var("GUARDIAN_COMPLETION_KEY")
            .context("GUARDIAN_COMPLETION_KEY must be set")?;
        let store_namespace = std::env::var("GUARDIAN_NAMESPACE")
            .unwrap_or_else(|_| DEFAULT_NAMESPACE.to_string());
        let completion_endpoint = std::env::var("GUARDIAN_COMPLETION_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_COMPLETION_ENDPOINT.to_string());
        let auth_token = std::env::var("GUARDIAN_AUTH_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());

        Ok(Self {
            store_namespace,
            completion_endpoint,
            completion_credential,
            auth_token,
        })
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.store_namespace = namespace.into();
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}
