//! Eureka client error types.

use http::StatusCode;
use thiserror::Error;

/// Result type for Eureka client operations.
pub type Result<T> = std::result::Result<T, EurekaError>;

/// Eureka client errors.
#[derive(Debug, Error)]
pub enum EurekaError {
    /// Invalid client configuration (e.g. no base URLs supplied).
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A base URL failed normalization.
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidUrl {
        /// The URL as supplied by the caller.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A caller-supplied argument was rejected before any network call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Every configured server failed at the transport level.
    #[error("request to {url} failed: {source}")]
    Transport {
        /// The last base URL tried.
        url: String,
        /// The underlying transport failure.
        #[source]
        source: reqwest::Error,
    },

    /// The server was reachable but returned an unexpected HTTP status.
    #[error("unexpected response status {status} for {operation}")]
    Protocol {
        /// The operation and identifiers involved.
        operation: String,
        /// The status the server returned.
        status: StatusCode,
    },

    /// A response body expected to carry XML could not be decoded.
    #[error("failed to decode {operation} response: {source}")]
    Decode {
        /// The operation whose response was malformed.
        operation: String,
        /// The underlying XML error.
        #[source]
        source: quick_xml::DeError,
    },

    /// An outbound body could not be encoded as XML.
    #[error("failed to encode request body: {0}")]
    Encode(#[from] quick_xml::SeError),

    /// Registration of the bound application identity failed.
    #[error("failed to register instance for application {app}: {source}")]
    Registration {
        /// The application being registered.
        app: String,
        /// The underlying transport or protocol failure.
        #[source]
        source: Box<EurekaError>,
    },

    /// A heartbeat failed for a reason other than the instance missing.
    #[error("heartbeat for instance {instance} failed: {source}")]
    Heartbeat {
        /// The instance being renewed.
        instance: String,
        /// The underlying transport or protocol failure.
        #[source]
        source: Box<EurekaError>,
    },

    /// The server no longer knows the instance; the caller should
    /// re-register.
    #[error("instance {instance} is not registered")]
    InstanceNotFound {
        /// The instance the server reported missing.
        instance: String,
    },
}

impl EurekaError {
    /// Get the HTTP status code if the server rejected the operation.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Protocol { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status(),
            Self::Registration { source, .. } | Self::Heartbeat { source, .. } => {
                source.status_code()
            }
            _ => None,
        }
    }

    /// Check if this error originated at the transport level (connect,
    /// DNS, timeout) rather than from the server's response.
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Registration { source, .. } | Self::Heartbeat { source, .. } => {
                source.is_transport()
            }
            _ => false,
        }
    }
}
