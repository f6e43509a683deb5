use crate::error::{FcktyError, Result};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Where the generation service lives and how to authenticate against it.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub api_base: String,
    pub model: String,
    pub env_vars: &'static [&'static str],
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            env_vars: &["GEMINI_API_KEY", "API_KEY"],
        }
    }
}

impl ProviderConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn name(&self) -> &'static str {
        "Gemini"
    }

    /// Resolve the API key from the process environment
    pub fn resolve_api_key(&self) -> Result<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    pub fn resolve_api_key_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
        self.env_vars
            .iter()
            .filter_map(|name| lookup(*name))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .ok_or_else(|| FcktyError::NotConfigured {
                env_vars: self.env_vars.join(", "),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_first_variable() {
        let config = ProviderConfig::default();
        let key = config
            .resolve_api_key_with(|name| match name {
                "GEMINI_API_KEY" => Some("primary".into()),
                "API_KEY" => Some("secondary".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(key, "primary");
    }

    #[test]
    fn blank_values_are_skipped() {
        let config = ProviderConfig::default();
        let key = config
            .resolve_api_key_with(|name| match name {
                "GEMINI_API_KEY" => Some("   ".into()),
                "API_KEY" => Some("fallback".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(key, "fallback");
    }

    #[test]
    fn missing_key_is_a_configuration_error() {
        let err = ProviderConfig::default()
            .resolve_api_key_with(|_| None)
            .unwrap_err();
        match err {
            FcktyError::NotConfigured { env_vars } => {
                assert_eq!(env_vars, "GEMINI_API_KEY, API_KEY")
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
