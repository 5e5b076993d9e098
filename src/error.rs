//! Error types for agent-chat.
//!
//! Backend failures never reach the chat surface as errors (the generation
//! client converts them to an apology message), but they keep the status and
//! request id so the log line says what went wrong.

use std::error;
use std::fmt;
use std::io;
use std::sync::Arc;

type Source = Arc<dyn error::Error + Send + Sync>;

/// The main error type for agent-chat.
#[derive(Clone, Debug)]
pub enum Error {
    /// An API error with no more specific variant.
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Error type string from the API.
        error_type: Option<String>,
        message: String,
        request_id: Option<String>,
    },

    /// The API key was rejected (401 or 403).
    Authentication { status_code: u16, message: String },

    /// Unknown resource.  An unknown model id usually lands here.
    NotFound { message: String },

    /// Rate limit exceeded.
    RateLimit {
        message: String,
        /// Seconds to wait before retrying, from `retry-after`.
        retry_after: Option<u64>,
    },

    /// Invalid request parameters.
    BadRequest {
        message: String,
        param: Option<String>,
    },

    /// The API failed or is overloaded (5xx).
    Server {
        status_code: u16,
        message: String,
        request_id: Option<String>,
        retry_after: Option<u64>,
    },

    /// The request did not complete in time.
    Timeout { message: String },

    /// The connection could not be established.
    Connection {
        message: String,
        source: Option<Source>,
    },

    /// A body could not be encoded or decoded.
    Serialization {
        message: String,
        source: Option<Source>,
    },

    /// The API answered successfully but the body carried nothing usable.
    MalformedResponse { message: String },

    /// Local I/O failed.
    Io {
        message: String,
        source: Arc<io::Error>,
    },

    /// Any other transport failure.
    HttpClient {
        message: String,
        source: Option<Source>,
    },

    /// Required configuration (such as the API key) is missing or unusable.
    Configuration { message: String },
}

impl Error {
    /// Creates a new API error.
    pub fn api(
        status_code: u16,
        error_type: Option<String>,
        message: impl Into<String>,
        request_id: Option<String>,
    ) -> Self {
        Error::Api {
            status_code,
            error_type,
            message: message.into(),
            request_id,
        }
    }

    /// Creates a new authentication error.
    pub fn authentication(status_code: u16, message: impl Into<String>) -> Self {
        Error::Authentication {
            status_code,
            message: message.into(),
        }
    }

    /// Creates a new not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound {
            message: message.into(),
        }
    }

    /// Creates a new rate limit error.
    pub fn rate_limit(message: impl Into<String>, retry_after: Option<u64>) -> Self {
        Error::RateLimit {
            message: message.into(),
            retry_after,
        }
    }

    /// Creates a new bad request error.
    pub fn bad_request(message: impl Into<String>, param: Option<String>) -> Self {
        Error::BadRequest {
            message: message.into(),
            param,
        }
    }

    /// Creates a new server error.
    pub fn server(
        status_code: u16,
        message: impl Into<String>,
        request_id: Option<String>,
        retry_after: Option<u64>,
    ) -> Self {
        Error::Server {
            status_code,
            message: message.into(),
            request_id,
            retry_after,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Error::Timeout {
            message: message.into(),
        }
    }

    pub fn connection(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Connection {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    pub fn serialization(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Serialization {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Error::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            message: message.into(),
            source: Arc::new(source),
        }
    }

    pub fn http_client(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::HttpClient {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Returns true if this error is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }

    /// Returns the request ID associated with this error, if any.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Error::Api { request_id, .. } | Error::Server { request_id, .. } => {
                request_id.as_deref()
            }
            _ => None,
        }
    }

    /// Returns the HTTP status the API answered with, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status_code, .. }
            | Error::Authentication { status_code, .. }
            | Error::Server { status_code, .. } => Some(*status_code),
            Error::NotFound { .. } => Some(404),
            Error::RateLimit { .. } => Some(429),
            Error::BadRequest { .. } => Some(400),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Api {
                message,
                error_type,
                ..
            } => {
                let prefix = error_type.as_deref().unwrap_or("API error");
                write!(f, "{prefix}: {message}")
            }
            Error::Authentication { message, .. } => {
                write!(f, "Authentication error: {message}")
            }
            Error::NotFound { message } => write!(f, "Resource not found: {message}"),
            Error::RateLimit {
                message,
                retry_after: Some(retry_after),
            } => write!(
                f,
                "Rate limit exceeded: {message} (retry after {retry_after} seconds)"
            ),
            Error::RateLimit { message, .. } => write!(f, "Rate limit exceeded: {message}"),
            Error::BadRequest {
                message,
                param: Some(param),
            } => write!(f, "Bad request: {message} (parameter: {param})"),
            Error::BadRequest { message, .. } => write!(f, "Bad request: {message}"),
            Error::Server {
                status_code,
                message,
                ..
            } => write!(f, "Server error {status_code}: {message}"),
            Error::Timeout { message } => write!(f, "Timeout error: {message}"),
            Error::Connection { message, .. } => write!(f, "Connection error: {message}"),
            Error::Serialization { message, .. } => write!(f, "Serialization error: {message}"),
            Error::MalformedResponse { message } => write!(f, "Malformed response: {message}"),
            Error::Io { message, .. } => write!(f, "I/O error: {message}"),
            Error::HttpClient { message, .. } => write!(f, "HTTP client error: {message}"),
            Error::Configuration { message } => write!(f, "{message}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Connection { source, .. }
            | Error::Serialization { source, .. }
            | Error::HttpClient { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::io(err.to_string(), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::serialization(format!("JSON error: {err}"), Some(Box::new(err)))
    }
}

/// A specialized Result type for agent-chat operations.
pub type Result<T> = std::result::Result<T, Error>;
