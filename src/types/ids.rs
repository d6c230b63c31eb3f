use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque bearer credential identifying a logged-in user.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Result<Self, String> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err("SessionToken must not be empty".to_string());
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_token_valid() {
        let token = SessionToken::new("eyJhbGciOi.abc").unwrap();
        assert_eq!(token.as_str(), "eyJhbGciOi.abc");
        assert_eq!(token.bearer(), "Bearer eyJhbGciOi.abc");
    }

    #[test]
    fn test_session_token_empty() {
        assert!(SessionToken::new("").is_err());
        assert!(SessionToken::new("   ").is_err());
    }

    #[test]
    fn test_session_token_debug_is_redacted() {
        let token = SessionToken::new("secret-token").unwrap();
        let debug = format!("{:?}", token);
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn test_session_token_serializes_as_string() {
        let token = SessionToken::new("abc").unwrap();
        assert_eq!(serde_json::to_string(&token).unwrap(), r#""abc""#);
    }
}
