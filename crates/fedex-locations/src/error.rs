use thiserror::Error;

/// Errors returned by the FedEx location client.
#[derive(Debug, Error)]
pub enum LocatorError {
    /// A required query option was not supplied. No request was sent.
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// FedEx did not report success. Carries the carrier's notification
    /// message, the SOAP fault text, or a generic fallback.
    #[error("FedEx rate error: {0}")]
    Rate(String),

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The reply body is not well-formed XML.
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The reply ended with elements still open.
    #[error("malformed XML reply: {0}")]
    MalformedReply(String),

    /// Writing the request document failed.
    #[error("XML write error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}
