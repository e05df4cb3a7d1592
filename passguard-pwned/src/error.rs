#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("range request for prefix {prefix} failed: {source}")]
    HttpRequest {
        prefix: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("range service answered HTTP {status} for prefix {prefix}")]
    HttpStatus { prefix: String, status: u16 },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
