//! k-anonymity breach checking against the Pwned Passwords API.
//!
//! Only the first 5 hex characters of the password's SHA-1 digest are sent
//! to the service; it answers with every known digest suffix sharing that
//! prefix and the match is decided locally. Neither the plaintext nor the
//! full digest ever leaves the process.
//!
//! Range responses are held in a bounded in-process cache so repeated
//! lookups under one prefix do not repeat the network call.
//!
//! ```no_run
//! # async fn demo() -> Result<(), passguard_pwned::Error> {
//! let checker = passguard_pwned::BreachChecker::new()?;
//! if checker.is_compromised("hunter2").await? {
//!     println!("pick another password");
//! }
//! # Ok(())
//! # }
//! ```

mod cache;
mod error;
mod range;

pub use cache::{DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL, RangeCache};
pub use error::Error;
pub use range::{PREFIX_LEN, SUFFIX_LEN};

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument};

/// Default endpoint of the Pwned Passwords range API.
pub const DEFAULT_BASE_URL: &str = "https://api.pwnedpasswords.com";

/// Identifying header sent with every range request.
const USER_AGENT: &str = concat!("passguard/", env!("CARGO_PKG_VERSION"));

/// Checks passwords against the Pwned Passwords breach corpus.
pub struct BreachChecker {
    http: reqwest::Client,
    base_url: String,
    cache: RangeCache,
}

impl BreachChecker {
    /// Creates a checker against the public API with default cache settings.
    pub fn new() -> Result<Self, Error> {
        Self::builder().build()
    }

    pub fn builder() -> BreachCheckerBuilder {
        BreachCheckerBuilder::default()
    }

    /// Returns whether the password appears in the breach corpus.
    pub async fn is_compromised(&self, password: &str) -> Result<bool, Error> {
        Ok(self.times_breached(password).await? > 0)
    }

    /// Returns how many times the password was seen in breaches (0 = never).
    pub async fn times_breached(&self, password: &str) -> Result<u64, Error> {
        let hex = range::digest_hex(password);
        let (prefix, suffix) = hex.split_at(range::PREFIX_LEN);
        let body = self.range_body(prefix).await?;
        Ok(range::suffix_count(&body, suffix).unwrap_or(0))
    }

    /// Fetches the range body for `prefix`, serving repeats from the cache.
    #[instrument(level = "debug", skip_all, fields(prefix = %prefix))]
    async fn range_body(&self, prefix: &str) -> Result<Arc<str>, Error> {
        if let Some(body) = self.cache.get(prefix) {
            debug!("range cache hit");
            return Ok(body);
        }

        let url = format!("{}/range/{}", self.base_url, prefix);
        debug!("fetching breach range");
        let response = self.http.get(&url).send().await.map_err(|source| {
            Error::HttpRequest {
                prefix: prefix.to_owned(),
                source,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                prefix: prefix.to_owned(),
                status: status.as_u16(),
            });
        }

        let body: Arc<str> = response
            .text()
            .await
            .map_err(|source| Error::HttpRequest {
                prefix: prefix.to_owned(),
                source,
            })?
            .into();
        self.cache.insert(prefix, Arc::clone(&body));
        Ok(body)
    }
}

/// Builder for [`BreachChecker`].
pub struct BreachCheckerBuilder {
    base_url: String,
    timeout: Option<Duration>,
    cache_capacity: usize,
    cache_ttl: Duration,
}

impl Default for BreachCheckerBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl BreachCheckerBuilder {
    /// Points the checker at a different range endpoint (tests, mirrors).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        self.base_url = base_url;
        self
    }

    /// Request timeout for range lookups. No timeout unless set; the caller
    /// owns timeout policy.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Maximum number of cached range responses. Zero disables caching.
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Time-to-live for cached range responses.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn build(self) -> Result<BreachChecker, Error> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(Error::Client)?;

        Ok(BreachChecker {
            http,
            base_url: self.base_url,
            cache: RangeCache::new(self.cache_capacity, self.cache_ttl),
        })
    }
}
