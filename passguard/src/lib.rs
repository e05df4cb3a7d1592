//! Password handling for web services: Argon2id hashing with an optional
//! server-side pepper, a minimum-length policy, and rejection of passwords
//! found in the public breach corpus.
//!
//! The pepper is an application-held secret mixed into every password via
//! HMAC-SHA256 before hashing. It is not recorded in the encoded hash, so
//! rotating it invalidates every previously issued hash at once; that is
//! the rotation mechanism.
//!
//! Breach rejection uses the k-anonymity range protocol from
//! [`passguard_pwned`]: only the first 5 hex characters of the password's
//! SHA-1 digest are disclosed to the remote service.
//!
//! ```no_run
//! use passguard::{CredentialHasher, PasswordConfig};
//!
//! # async fn demo() -> Result<(), passguard::Error> {
//! let hasher = CredentialHasher::new(PasswordConfig::default().with_secret("app pepper"))?;
//!
//! let hash = hasher.generate_password_hash("correct horse battery staple").await?;
//! assert!(hasher.check_password_hash(&hash, "correct horse battery staple"));
//!
//! if hasher.check_needs_rehash(&hash) {
//!     // regenerate at the next successful login
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod encoding;
mod error;
mod hasher;

pub use config::{DEFAULT_MIN_LENGTH, PasswordConfig};
pub use encoding::{Encoding, EncodingError, Plaintext};
pub use error::Error;
pub use hasher::{CredentialHasher, HashParams};

// Hosts wiring a custom breach checker or building a pepper key reach for
// these without naming the underlying crates.
pub use passguard_pwned::{BreachChecker, BreachCheckerBuilder};
pub use secrecy::SecretString;
