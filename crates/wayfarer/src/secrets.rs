//! Credential resolution for the external providers. Everything is optional:
//! a missing key is a normal configuration state that the affected tool or
//! backend reports in its own way, not a load-time error.

use std::env;

#[cfg(test)]
use mockall::automock;
#[cfg(test)]
use mockall::predicate::*;

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const SERPER_API_KEY: &str = "SERPER_API_KEY";
pub const OPENWEATHERMAP_API_KEY: &str = "OPENWEATHERMAP_API_KEY";
pub const EXCHANGERATE_API_KEY: &str = "EXCHANGERATE_API_KEY";

// Define a trait for environment access so tests can substitute their own
#[cfg_attr(test, automock)]
pub trait Environment: Send + Sync {
    fn get_var(&self, key: &str) -> Result<String, env::VarError>;
}

pub struct RealEnvironment;

impl Environment for RealEnvironment {
    fn get_var(&self, key: &str) -> Result<String, env::VarError> {
        env::var(key)
    }
}

/// Load a `.env` file if one is present. Missing files are fine.
pub fn load_dotenv() {
    let _ = dotenv::dotenv();
}

#[derive(Debug, Clone, Default)]
pub struct Secrets {
    pub openai_api_key: Option<String>,
    pub serper_api_key: Option<String>,
    pub openweathermap_api_key: Option<String>,
    pub exchangerate_api_key: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self::resolve(&RealEnvironment)
    }

    pub fn resolve(env: &impl Environment) -> Self {
        Self {
            openai_api_key: get(env, OPENAI_API_KEY),
            serper_api_key: get(env, SERPER_API_KEY),
            openweathermap_api_key: get(env, OPENWEATHERMAP_API_KEY),
            exchangerate_api_key: get(env, EXCHANGERATE_API_KEY),
        }
    }
}

/// Empty values count as absent, matching how exported-but-blank variables
/// usually end up in shells.
fn get(env: &impl Environment, key: &str) -> Option<String> {
    env.get_var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_present_key() {
        let mut mock_env = MockEnvironment::new();
        mock_env
            .expect_get_var()
            .with(eq(OPENAI_API_KEY))
            .return_once(|_| Ok("sk-test".to_string()));
        mock_env
            .expect_get_var()
            .with(ne(OPENAI_API_KEY))
            .returning(|_| Err(env::VarError::NotPresent));

        let secrets = Secrets::resolve(&mock_env);
        assert_eq!(secrets.openai_api_key.as_deref(), Some("sk-test"));
        assert!(secrets.serper_api_key.is_none());
    }

    #[test]
    fn test_absent_keys_are_not_an_error() {
        let mut mock_env = MockEnvironment::new();
        mock_env
            .expect_get_var()
            .returning(|_| Err(env::VarError::NotPresent));

        let secrets = Secrets::resolve(&mock_env);
        assert!(secrets.openai_api_key.is_none());
        assert!(secrets.serper_api_key.is_none());
        assert!(secrets.openweathermap_api_key.is_none());
        assert!(secrets.exchangerate_api_key.is_none());
    }

    #[test]
    fn test_blank_value_counts_as_absent() {
        let mut mock_env = MockEnvironment::new();
        mock_env
            .expect_get_var()
            .with(eq(SERPER_API_KEY))
            .return_once(|_| Ok("   ".to_string()));
        mock_env
            .expect_get_var()
            .with(ne(SERPER_API_KEY))
            .returning(|_| Err(env::VarError::NotPresent));

        let secrets = Secrets::resolve(&mock_env);
        assert!(secrets.serper_api_key.is_none());
    }
}
