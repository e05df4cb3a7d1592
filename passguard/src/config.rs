//! Hasher configuration.

use secrecy::SecretString;
use serde::Deserialize;

use crate::encoding::Encoding;

/// Default minimum accepted password length.
pub const DEFAULT_MIN_LENGTH: usize = 8;

/// Policy consulted on every hash and verify call.
///
/// Every field has a default and deserialization fills absent keys with
/// those defaults, so a host's config file only names the keys it overrides.
///
/// Rotating `secret` immediately invalidates verification of every hash
/// issued under the previous secret; that is the rotation mechanism, not an
/// accident. The secret is not recorded in the encoded hash.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    /// Reject passwords found in the public breach corpus.
    pub check_common_passwords: bool,
    /// Byte encoding for text/bytes normalization.
    pub encoding: Encoding,
    /// Minimum accepted plaintext length, measured on the representation as
    /// supplied (characters for text, bytes for bytes).
    pub min_length: usize,
    /// Pepper key. When set, passwords are HMAC-SHA256-transformed with this
    /// key before hashing.
    pub secret: Option<SecretString>,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            check_common_passwords: true,
            encoding: Encoding::default(),
            min_length: DEFAULT_MIN_LENGTH,
            secret: None,
        }
    }
}

impl PasswordConfig {
    /// Enables or disables the breach-corpus check.
    pub fn with_check_common(mut self, check: bool) -> Self {
        self.check_common_passwords = check;
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Sets the pepper key.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(SecretString::from(secret.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = PasswordConfig::default();
        assert!(config.check_common_passwords);
        assert_eq!(config.encoding, Encoding::Utf8);
        assert_eq!(config.min_length, DEFAULT_MIN_LENGTH);
        assert!(config.secret.is_none());
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: PasswordConfig = serde_json::from_str(r#"{"min_length": 12}"#).unwrap();
        assert_eq!(config.min_length, 12);
        assert!(config.check_common_passwords);
        assert_eq!(config.encoding, Encoding::Utf8);
        assert!(config.secret.is_none());
    }

    #[test]
    fn test_full_deserialization() {
        let config: PasswordConfig = serde_json::from_str(
            r#"{
                "check_common_passwords": false,
                "encoding": "latin1",
                "min_length": 10,
                "secret": "pepper-key"
            }"#,
        )
        .unwrap();
        assert!(!config.check_common_passwords);
        assert_eq!(config.encoding, Encoding::Latin1);
        assert_eq!(config.min_length, 10);
        assert_eq!(config.secret.unwrap().expose_secret(), "pepper-key");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = PasswordConfig::default().with_secret("pepper-key");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("pepper-key"));
    }
}
