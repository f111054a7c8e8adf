//! Claude client implementation

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

use crate::llm::core::{
    error::LlmError,
    provider::{EventStream, LlmProvider},
    types::{GenerateRequest, StreamEvent, UsageMetadata},
};

use super::mapper::{from_claude_event, to_claude_request};
use super::sse::parse_sse_stream;
use super::types::ClaudeErrorResponse;

/// API version header value
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default public endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Client for the Anthropic Messages API
pub struct ClaudeClient {
    /// HTTP client for making requests
    http_client: Client,
    /// API key sent as `x-api-key`
    api_key: String,
    /// Scheme and host, without the `/v1/messages` suffix
    base_url: String,
}

impl ClaudeClient {
    /// Create a new Claude client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, LlmError> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| LlmError::HttpError {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        })
    }

    /// Build the endpoint URL for streaming
    fn build_endpoint_url(&self) -> String {
        format!("{}/v1/messages", self.base_url.trim_end_matches('/'))
    }

    /// Make a streaming request to Claude
    async fn make_streaming_request(&self, request: GenerateRequest) -> Result<EventStream, LlmError> {
        let claude_request = to_claude_request(request);

        let url = self.build_endpoint_url();
        tracing::debug!(
            url = %url,
            model = %claude_request.model,
            messages = claude_request.messages.len(),
            "sending messages request"
        );

        let response = self
            .http_client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&claude_request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let sse_stream = parse_sse_stream(Box::pin(response.bytes_stream()));

        let mut accumulated_usage = UsageMetadata::new(0, 0);
        let event_stream = sse_stream.flat_map(move |result| {
            let events: Vec<Result<StreamEvent, LlmError>> = match result {
                Ok(claude_event) => from_claude_event(claude_event, &mut accumulated_usage)
                    .into_iter()
                    .map(Ok)
                    .collect(),
                Err(e) => vec![Err(e)],
            };
            futures::stream::iter(events)
        });

        Ok(Box::pin(event_stream))
    }
}

/// Translate a non-2xx response into the matching `LlmError`
async fn error_from_response(response: Response) -> LlmError {
    let status = response.status();
    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs);
    let body = response.text().await.unwrap_or_default();

    classify_error(status, retry_after, &body)
}

fn classify_error(status: StatusCode, retry_after: Option<Duration>, body: &str) -> LlmError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return LlmError::RateLimitExceeded { retry_after };
    }

    let parsed = serde_json::from_str::<ClaudeErrorResponse>(body).ok();
    match (status, parsed) {
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, Some(err)) => {
            LlmError::AuthenticationError(err.error.message)
        }
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, None) => {
            LlmError::AuthenticationError(body.to_string())
        }
        (StatusCode::BAD_REQUEST, Some(err)) => LlmError::InvalidRequest(err.error.message),
        (_, Some(err)) => LlmError::ProviderError {
            code: err.error.error_type,
            message: err.error.message,
        },
        (_, None) => LlmError::HttpError {
            status: status.as_u16(),
            body: body.to_string(),
        },
    }
}

#[async_trait]
impl LlmProvider for ClaudeClient {
    async fn stream_generate(&self, request: GenerateRequest) -> Result<EventStream, LlmError> {
        self.make_streaming_request(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_trims_trailing_slash() {
        let client = ClaudeClient::new("sk-test", "http://localhost:8080/").unwrap();
        assert_eq!(client.build_endpoint_url(), "http://localhost:8080/v1/messages");

        let client = ClaudeClient::new("sk-test", DEFAULT_BASE_URL).unwrap();
        assert_eq!(
            client.build_endpoint_url(),
            "https://api.anthropic.com/v1/messages"
        );
    }

    #[test]
    fn test_classify_rate_limit() {
        let err = classify_error(
            StatusCode::TOO_MANY_REQUESTS,
            Some(Duration::from_secs(30)),
            "",
        );
        assert!(matches!(
            err,
            LlmError::RateLimitExceeded { retry_after: Some(d) } if d == Duration::from_secs(30)
        ));
    }

    #[test]
    fn test_classify_authentication_error() {
        let body = r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
        let err = classify_error(StatusCode::UNAUTHORIZED, None, body);
        assert!(matches!(err, LlmError::AuthenticationError(m) if m == "invalid x-api-key"));
    }

    #[test]
    fn test_classify_invalid_request() {
        let body = r#"{"type":"error","error":{"type":"invalid_request_error","message":"messages: text content blocks must be non-empty"}}"#;
        let err = classify_error(StatusCode::BAD_REQUEST, None, body);
        assert!(matches!(err, LlmError::InvalidRequest(m) if m.contains("non-empty")));
    }

    #[test]
    fn test_classify_provider_error() {
        let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        let err = classify_error(StatusCode::from_u16(529).unwrap(), None, body);
        assert!(matches!(
            err,
            LlmError::ProviderError { ref code, .. } if code == "overloaded_error"
        ));
    }

    #[test]
    fn test_classify_unparseable_body() {
        let err = classify_error(StatusCode::BAD_GATEWAY, None, "<html>bad gateway</html>");
        assert!(matches!(err, LlmError::HttpError { status: 502, .. }));
    }
}
