//! Search API credentials, read once from the process environment.
use std::fmt;
use std::path::PathBuf;

pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const ENGINE_ID_ENV: &str = "SEARCH_ENGINE_ID";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("Missing API key or Search Engine ID")]
    Missing {
        /// Names of the variables that were unset or empty.
        vars: Vec<&'static str>,
    },
}

/// API key plus Programmable Search Engine id (`cx`).
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    engine_id: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            engine_id: engine_id.into(),
        }
    }

    /// Read `GOOGLE_API_KEY` and `SEARCH_ENGINE_ID`. Empty values count as missing.
    ///
    /// ```
    /// use lookout_config::{Credentials, CredentialsError};
    ///
    /// unsafe {
    ///     std::env::set_var("GOOGLE_API_KEY", "k");
    ///     std::env::remove_var("SEARCH_ENGINE_ID");
    /// }
    /// let err = Credentials::from_env().unwrap_err();
    /// assert_eq!(err.to_string(), "Missing API key or Search Engine ID");
    /// unsafe { std::env::remove_var("GOOGLE_API_KEY"); }
    /// ```
    pub fn from_env() -> Result<Self, CredentialsError> {
        let api_key = non_empty_var(API_KEY_ENV);
        let engine_id = non_empty_var(ENGINE_ID_ENV);

        match (api_key, engine_id) {
            (Some(api_key), Some(engine_id)) => Ok(Self { api_key, engine_id }),
            (api_key, engine_id) => {
                let mut vars = Vec::new();
                if api_key.is_none() {
                    vars.push(API_KEY_ENV);
                }
                if engine_id.is_none() {
                    vars.push(ENGINE_ID_ENV);
                }
                tracing::error!(?vars, "credentials.missing");
                Err(CredentialsError::Missing { vars })
            }
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn engine_id(&self) -> &str {
        &self.engine_id
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("engine_id", &self.engine_id)
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Load `.env` from the working directory (or a parent) without overriding
/// variables that are already set. Returns the file that was applied, or
/// `None` when there is no such file.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
