//! Credential artifact loader.
//!
//! The interactive authorization flow lives outside this process; it
//! writes a reusable token artifact that the mailbox and calendar
//! clients consume as a bearer credential. No refresh logic here.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Token artifact as written by the one-time auth bootstrap.
///
/// Accepts either a `token` or an `access_token` field, since the two
/// common bootstrap tools disagree on the key name.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleToken {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
}

impl GoogleToken {
    /// Load and validate the artifact at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Credential(format!("cannot read {}: {e}", path.display()))
        })?;
        let token: Self = serde_json::from_str(&raw)
            .map_err(|e| ConfigError::Credential(format!("cannot parse {}: {e}", path.display())))?;
        if token.bearer().is_none() {
            return Err(ConfigError::Credential(format!(
                "{} carries neither 'token' nor 'access_token'",
                path.display()
            )));
        }
        Ok(token)
    }

    /// The bearer value for Authorization headers.
    pub fn bearer(&self) -> Option<&str> {
        self.token
            .as_deref()
            .or(self.access_token.as_deref())
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_token_field() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"token": "ya29.abc", "refresh_token": "r"}}"#).unwrap();
        let token = GoogleToken::load(f.path()).unwrap();
        assert_eq!(token.bearer(), Some("ya29.abc"));
    }

    #[test]
    fn loads_access_token_field() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"access_token": "ya29.def"}}"#).unwrap();
        let token = GoogleToken::load(f.path()).unwrap();
        assert_eq!(token.bearer(), Some("ya29.def"));
    }

    #[test]
    fn rejects_artifact_without_token() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"refresh_token": "r"}}"#).unwrap();
        assert!(GoogleToken::load(f.path()).is_err());
    }

    #[test]
    fn rejects_missing_file() {
        assert!(GoogleToken::load(std::path::Path::new("/nonexistent/token.json")).is_err());
    }
}
