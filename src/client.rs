use std::env;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::types::{Message, MessageCreateParams};

/// Environment variable consulted when no API key is supplied.
pub const API_KEY_ENV_VAR: &str = "ANTHROPIC_API_KEY";

const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/";
const ANTHROPIC_API_VERSION: &str = "2023-06-01";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the Anthropic API.
#[derive(Debug, Clone)]
pub struct Anthropic {
    api_key: String,
    client: ReqwestClient,
    base_url: String,
    timeout: Duration,
}

impl Anthropic {
    /// Create a new Anthropic client.
    ///
    /// The API key can be provided directly or read from the ANTHROPIC_API_KEY
    /// environment variable.  A missing or empty key is a configuration error.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = resolve_api_key(api_key, || env::var(API_KEY_ENV_VAR).ok())?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        let mut base_url = base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            api_key,
            client,
            base_url,
            timeout,
        })
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|_| Error::configuration("API key is not a valid header value"))?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_API_VERSION),
        );
        Ok(headers)
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        let request_id = response
            .headers()
            .get("request-id")
            .or_else(|| response.headers().get("x-request-id"))
            .and_then(|val| val.to_str().ok())
            .map(String::from);

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        #[derive(Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(Deserialize)]
        struct ErrorDetail {
            #[serde(rename = "type")]
            error_type: Option<String>,
            message: Option<String>,
            param: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let detail = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|e| e.error);
        let error_type = detail.as_ref().and_then(|e| e.error_type.clone());
        let error_message = detail
            .as_ref()
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| error_body.clone());
        let error_param = detail.as_ref().and_then(|e| e.param.clone());

        error_for_status(
            status_code,
            error_type,
            error_message,
            error_param,
            request_id,
            retry_after,
        )
    }

    /// Send a message to the API and get a non-streaming response.
    pub async fn send(&self, params: MessageCreateParams) -> Result<Message> {
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let result = self.send_inner(params).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        if let Err(err) = &result {
            CLIENT_REQUEST_ERRORS.click();
            tracing::debug!(error = %err, "messages request failed");
        }
        result
    }

    async fn send_inner(&self, params: MessageCreateParams) -> Result<Message> {
        let url = format!("{}messages", self.base_url);
        tracing::debug!(%url, model = %params.model, "sending messages request");

        let response = self
            .client
            .post(&url)
            .headers(self.default_headers()?)
            .json(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(format!(
                        "Request timed out after {:?}: {}",
                        self.timeout, e
                    ))
                } else if e.is_connect() {
                    Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
                } else {
                    Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        response.json::<Message>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }
}

/// Picks the explicit key, else the one `from_env` yields.  Blank keys count
/// as missing; keys that can never form a header are rejected here rather
/// than on first use.
fn resolve_api_key(
    explicit: Option<String>,
    from_env: impl FnOnce() -> Option<String>,
) -> Result<String> {
    let api_key = explicit
        .filter(|key| !key.trim().is_empty())
        .or_else(from_env)
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| Error::configuration(format!("{API_KEY_ENV_VAR} is required")))?;
    HeaderValue::from_str(&api_key).map_err(|_| {
        Error::configuration(format!("{API_KEY_ENV_VAR} contains invalid characters"))
    })?;
    Ok(api_key)
}

/// Map an HTTP status code to the appropriate error variant.
fn error_for_status(
    status_code: u16,
    error_type: Option<String>,
    message: String,
    param: Option<String>,
    request_id: Option<String>,
    retry_after: Option<u64>,
) -> Error {
    match status_code {
        400 => Error::bad_request(message, param),
        401 | 403 => Error::authentication(status_code, message),
        404 => Error::not_found(message),
        408 => Error::timeout(message),
        429 => Error::rate_limit(message, retry_after),
        500..=599 => Error::server(status_code, message, request_id, retry_after),
        _ => Error::api(status_code, error_type, message, request_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_key_is_used() {
        let client = Anthropic::new(Some("sk-test".to_string())).unwrap();
        assert_eq!(client.api_key, "sk-test");
        assert_eq!(client.base_url(), DEFAULT_API_URL);
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = Anthropic::with_options(
            Some("sk-test".to_string()),
            Some("http://localhost:8080/v1".to_string()),
            Some(Duration::from_secs(1)),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/v1/");
    }

    #[test]
    fn key_with_newline_is_rejected() {
        let err = Anthropic::new(Some("sk\ntest".to_string())).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn missing_or_blank_key_is_a_configuration_error() {
        for explicit in [None, Some(String::new()), Some("  \t ".to_string())] {
            let err = resolve_api_key(explicit, || None).unwrap_err();
            assert!(err.is_configuration());
            assert_eq!(err.to_string(), "ANTHROPIC_API_KEY is required");
        }
        let err = resolve_api_key(Some(" ".to_string()), || Some("   ".to_string())).unwrap_err();
        assert_eq!(err.to_string(), "ANTHROPIC_API_KEY is required");
    }

    #[test]
    fn blank_explicit_key_falls_back_to_env() {
        let key = resolve_api_key(Some(" ".to_string()), || Some("sk-env".to_string())).unwrap();
        assert_eq!(key, "sk-env");
        let key = resolve_api_key(Some("sk-flag".to_string()), || Some("sk-env".to_string()))
            .unwrap();
        assert_eq!(key, "sk-flag");
    }

    #[test]
    fn status_mapping() {
        let err = error_for_status(401, None, "bad key".to_string(), None, None, None);
        assert!(matches!(err, Error::Authentication { status_code: 401, .. }));
        let err = error_for_status(403, None, "no access".to_string(), None, None, None);
        assert!(matches!(err, Error::Authentication { status_code: 403, .. }));
        let err = error_for_status(404, None, "model: nope".to_string(), None, None, None);
        assert!(matches!(err, Error::NotFound { .. }));
        let err = error_for_status(429, None, "slow".to_string(), None, None, Some(5));
        assert!(matches!(err, Error::RateLimit { retry_after: Some(5), .. }));
        let err = error_for_status(
            529,
            Some("overloaded_error".to_string()),
            "Overloaded".to_string(),
            None,
            Some("req_1".to_string()),
            None,
        );
        assert_eq!(err.status_code(), Some(529));
        assert_eq!(err.request_id(), Some("req_1"));
        assert_eq!(err.to_string(), "Server error 529: Overloaded");
        let err = error_for_status(
            418,
            Some("teapot_error".to_string()),
            "short".to_string(),
            None,
            None,
            None,
        );
        assert_eq!(err.to_string(), "teapot_error: short");
    }
}
