//! Secret types for protecting sensitive values from accidental logging.
//!
//! Re-exports [`secrecy`] so every crate in the workspace wraps credentials
//! the same way. `SecretString` implements `Debug` with redaction, so a
//! struct deriving `Debug` that holds one is safe to pass to `tracing`.
//!
//! Use `SecretString` for:
//! - Backend API tokens
//! - Transport credentials returned by the join endpoint
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct Grant {
//!     url: String,
//!     token: SecretString,
//! }
//!
//! let grant = Grant {
//!     url: "wss://rtc.example.com".to_string(),
//!     token: SecretString::from("eyJhbGciOi"),
//! };
//!
//! assert!(!format!("{grant:?}").contains("eyJhbGciOi"));
//! assert_eq!(grant.token.expose_secret(), "eyJhbGciOi");
//! ```

pub use secrecy::{ExposeSecret, SecretString};

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_debug_is_redacted() {
        let secret = SecretString::from("room-credential");
        let debug_str = format!("{secret:?}");

        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("room-credential"));
    }

    #[test]
    fn test_deserialized_grant_token_is_redacted() {
        #[allow(dead_code)]
        #[derive(Debug, Deserialize)]
        struct GrantBody {
            url: String,
            token: SecretString,
        }

        let json = r#"{"url": "wss://rtc.example.com", "token": "signed-jwt"}"#;
        let body: GrantBody = serde_json::from_str(json).expect("deserialize");

        assert_eq!(body.token.expose_secret(), "signed-jwt");

        let debug = format!("{body:?}");
        assert!(debug.contains("wss://rtc.example.com"));
        assert!(!debug.contains("signed-jwt"));
    }
}
