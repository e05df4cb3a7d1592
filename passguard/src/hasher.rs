//! Credential hashing with Argon2id, an optional pepper, and breach
//! rejection.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{
    Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier as _, Version,
};
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use sha2::Sha256;
use tracing::debug;

use passguard_pwned::BreachChecker;

use crate::config::PasswordConfig;
use crate::encoding::Plaintext;
use crate::error::Error;

type HmacSha256 = Hmac<Sha256>;

/// Argon2id cost parameters embedded in newly generated hashes.
///
/// [`CredentialHasher::check_needs_rehash`] reports `true` for any stored
/// hash whose embedded parameters differ from these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    /// Memory cost in KiB.
    pub memory_cost_kib: u32,
    /// Number of iterations.
    pub time_cost: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_cost_kib: Params::DEFAULT_M_COST,
            time_cost: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashParams {
    fn argon2(&self) -> Result<Argon2<'static>, Error> {
        let params = Params::new(self.memory_cost_kib, self.time_cost, self.parallelism, None)
            .map_err(|e| Error::Hash(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hashes and verifies passwords under an application's policy.
///
/// Holds the policy configuration, the Argon2id cost parameters, and a
/// breach checker; one instance per application is expected. Every
/// operation consults the held configuration, so swapping in a new one via
/// [`CredentialHasher::set_config`] takes effect on the next call.
pub struct CredentialHasher {
    config: PasswordConfig,
    params: HashParams,
    breach: BreachChecker,
}

impl CredentialHasher {
    /// Creates a hasher over the public breach corpus with default cost
    /// parameters.
    pub fn new(config: PasswordConfig) -> Result<Self, Error> {
        let breach = BreachChecker::new()?;
        Ok(Self {
            config,
            params: HashParams::default(),
            breach,
        })
    }

    /// Replaces the breach checker (tests, mirrors, custom cache policy).
    pub fn with_breach_checker(mut self, breach: BreachChecker) -> Self {
        self.breach = breach;
        self
    }

    /// Replaces the cost parameters used for newly generated hashes.
    pub fn with_params(mut self, params: HashParams) -> Self {
        self.params = params;
        self
    }

    pub fn config(&self) -> &PasswordConfig {
        &self.config
    }

    /// Replaces the configuration; subsequent calls see the new values.
    pub fn set_config(&mut self, config: PasswordConfig) {
        self.config = config;
    }

    /// Hashes `password` and returns the encoded PHC string.
    ///
    /// Fails with [`Error::ShortPassword`] before doing any other work when
    /// the password is below the configured minimum length, and with
    /// [`Error::CommonPassword`] when the breach check is enabled and the
    /// password is known-compromised. A breach-service failure aborts the
    /// call; nothing is hashed.
    pub async fn generate_password_hash<'a>(
        &self,
        password: impl Into<Plaintext<'a>>,
    ) -> Result<String, Error> {
        let password = password.into();

        // Length is checked on the representation as supplied, before any
        // encoding conversion.
        let min_length = self.config.min_length;
        if password.len() < min_length {
            return Err(Error::ShortPassword { min_length });
        }

        if self.config.check_common_passwords {
            let text = password.to_text(self.config.encoding)?;
            if self.breach.is_compromised(&text).await? {
                debug!("rejected password found in breach corpus");
                return Err(Error::CommonPassword);
            }
        }

        let peppered = self.pepper(password)?;
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .params
            .argon2()?
            .hash_password(&peppered, &salt)
            .map_err(|e| Error::Hash(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Verifies `password` against `hash`.
    ///
    /// Returns `false` for a mismatch, a malformed hash, or a password the
    /// configured encoding cannot represent; never fails. Callers cannot
    /// tell a wrong password from a corrupt hash.
    pub fn check_password_hash<'a>(
        &self,
        hash: &str,
        password: impl Into<Plaintext<'a>>,
    ) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        let Ok(peppered) = self.pepper(password.into()) else {
            return false;
        };
        let Ok(argon2) = self.params.argon2() else {
            return false;
        };
        argon2.verify_password(&peppered, &parsed).is_ok()
    }

    /// Whether `hash` was generated under parameters other than the current
    /// ones and should be regenerated at the next successful authentication.
    ///
    /// Operates purely on the encoded hash; the pepper plays no part.
    pub fn check_needs_rehash(&self, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return true;
        };
        if !matches!(
            Algorithm::try_from(parsed.algorithm),
            Ok(Algorithm::Argon2id)
        ) {
            return true;
        }
        if parsed.version != Some(Version::V0x13 as u32) {
            return true;
        }
        let Ok(params) = Params::try_from(&parsed) else {
            return true;
        };
        params.m_cost() != self.params.memory_cost_kib
            || params.t_cost() != self.params.time_cost
            || params.p_cost() != self.params.parallelism
    }

    /// Applies the pepper transform: HMAC-SHA256 of the password bytes under
    /// the configured secret, or the password bytes unchanged when no secret
    /// is set.
    fn pepper(&self, password: Plaintext<'_>) -> Result<Vec<u8>, Error> {
        let bytes = password.to_bytes(self.config.encoding)?;
        let Some(secret) = &self.config.secret else {
            return Ok(bytes.into_owned());
        };

        let key = self.config.encoding.encode(secret.expose_secret())?;
        let mut mac =
            HmacSha256::new_from_slice(&key).map_err(|e| Error::Hash(e.to_string()))?;
        mac.update(&bytes);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}
