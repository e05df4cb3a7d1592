use crate::encoding::EncodingError;

/// Errors raised while generating a password hash.
///
/// [`Error::ShortPassword`] and [`Error::CommonPassword`] are validation
/// failures the caller is expected to translate into user-facing messages;
/// the remaining variants are operational.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The password is below the configured minimum length.
    #[error("password must be at least {min_length} characters long")]
    ShortPassword { min_length: usize },

    /// The password appears in the public breach corpus.
    #[error("password appears in a public breach corpus")]
    CommonPassword,

    /// The configured encoding cannot represent the input.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// The breach lookup failed; nothing was hashed.
    #[error("breach lookup failed: {0}")]
    Breach(#[from] passguard_pwned::Error),

    /// The hashing machinery itself failed.
    #[error("password hashing failed: {0}")]
    Hash(String),
}

impl Error {
    /// Whether this is a validation failure the end user can fix by picking
    /// a different password.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::ShortPassword { .. } | Error::CommonPassword | Error::Encoding(_)
        )
    }
}
