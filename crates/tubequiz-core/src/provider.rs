use crate::error::{Result, TubequizError};

/// Environment variable that replaces the provider's default model name.
pub const MODEL_ENV_VAR: &str = "TUBEQUIZ_MODEL";

/// Hosted model families reachable through an OpenAI-compatible endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Provider {
    Grok,
    Openai,
    #[default]
    Gemini,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProviderConfig {
    pub name: &'static str,
    pub api_url: &'static str,
    pub model: &'static str,
    pub env_var: &'static str,
}

const GROK: ProviderConfig = ProviderConfig {
    name: "Grok",
    api_url: "https://api.x.ai/v1/chat/completions",
    model: "grok-4-fast",
    env_var: "XAI_API_KEY",
};

const OPENAI: ProviderConfig = ProviderConfig {
    name: "OpenAI",
    api_url: "https://api.openai.com/v1/chat/completions",
    model: "gpt-5.1",
    env_var: "OPENAI_API_KEY",
};

const GEMINI: ProviderConfig = ProviderConfig {
    name: "Gemini",
    api_url: "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions",
    model: "gemini-2.5-pro",
    env_var: "GEMINI_API_KEY",
};

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Grok, Provider::Openai, Provider::Gemini];

    pub fn config(&self) -> ProviderConfig {
        match self {
            Provider::Grok => GROK,
            Provider::Openai => OPENAI,
            Provider::Gemini => GEMINI,
        }
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// API key from this provider's environment variable; blank counts as unset.
    pub fn validate_api_key(&self) -> Result<String> {
        self.api_key_from(std::env::var(self.config().env_var).ok())
    }

    fn api_key_from(&self, value: Option<String>) -> Result<String> {
        match value {
            Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(TubequizError::MissingApiKey {
                env_var: self.config().env_var.to_string(),
            }),
        }
    }

    /// Model to request: `TUBEQUIZ_MODEL` when set, otherwise the provider default.
    pub fn resolve_model(&self) -> String {
        self.model_from(std::env::var(MODEL_ENV_VAR).ok())
    }

    fn model_from(&self, value: Option<String>) -> String {
        value
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.config().model.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_is_the_default() {
        assert_eq!(Provider::default(), Provider::Gemini);
        assert_eq!(Provider::default().config().env_var, "GEMINI_API_KEY");
    }

    #[test]
    fn every_provider_has_its_own_key_variable() {
        let vars: Vec<_> = Provider::ALL.iter().map(|p| p.config().env_var).collect();
        assert_eq!(vars, ["XAI_API_KEY", "OPENAI_API_KEY", "GEMINI_API_KEY"]);
        assert!(
            Provider::ALL
                .iter()
                .all(|p| p.config().api_url.ends_with("/chat/completions"))
        );
    }

    #[test]
    fn blank_key_is_missing() {
        for value in [None, Some(String::new()), Some("  \n".to_string())] {
            match Provider::Openai.api_key_from(value) {
                Err(TubequizError::MissingApiKey { env_var }) => assert_eq!(env_var, "OPENAI_API_KEY"),
                other => panic!("unexpected: {other:?}"),
            }
        }
        assert_eq!(
            Provider::Grok.api_key_from(Some(" xai-123 ".into())).unwrap(),
            "xai-123"
        );
    }

    #[test]
    fn model_override_wins_when_not_blank() {
        assert_eq!(Provider::Gemini.model_from(None), "gemini-2.5-pro");
        assert_eq!(Provider::Gemini.model_from(Some(" ".into())), "gemini-2.5-pro");
        assert_eq!(
            Provider::Gemini.model_from(Some("gemini-2.5-flash".into())),
            "gemini-2.5-flash"
        );
    }
}
