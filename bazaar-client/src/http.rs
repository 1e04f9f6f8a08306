//! HTTP transport for the attribute service

use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::{ApiResponse, AppError, ErrorCode};

use crate::{ClientConfig, ClientError, ClientResult};

/// Thin JSON client bound to one base URL
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        self.client.request(method, url)
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        Self::send(self.request(Method::GET, path)).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        Self::send(self.request(Method::POST, path).json(body)).await
    }

    /// Make a POST request without body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        Self::send(self.request(Method::POST, path)).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        Self::send(self.request(Method::PUT, path).json(body)).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        Self::send(self.request(Method::DELETE, path)).await
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                error: decode_error(status.as_u16(), &bytes),
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            ClientError::InvalidResponse(format!("{} ({} bytes)", e, bytes.len()))
        })
    }
}

/// Rebuild an `AppError` from the service's error envelope.
///
/// Bodies that are not an envelope (proxies, extractor rejections) keep
/// their text as the message.
fn decode_error(status: u16, body: &[u8]) -> AppError {
    if let Ok(envelope) = serde_json::from_slice::<ApiResponse>(body) {
        let code = envelope
            .code
            .and_then(|c| ErrorCode::try_from(c).ok())
            .unwrap_or(ErrorCode::Unknown);
        return AppError {
            code,
            message: envelope.message,
            details: envelope.details,
        };
    }

    let code = match status {
        400 | 415 | 422 => ErrorCode::InvalidRequest,
        404 => ErrorCode::NotFound,
        _ => ErrorCode::Unknown,
    };
    AppError::with_message(code, String::from_utf8_lossy(body).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_envelope() {
        let body = br#"{"code":6311,"message":"Invalid value for Mileage: expected number, found string","details":{"attribute":"Mileage"}}"#;
        let err = decode_error(400, body);
        assert_eq!(err.code, ErrorCode::MalformedValue);
        assert!(err.message.starts_with("Invalid value for Mileage"));
        assert!(err.details.unwrap().contains_key("attribute"));
    }

    #[test]
    fn test_decode_error_plain_text() {
        let err = decode_error(400, b"Failed to parse the request body as JSON");
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert_eq!(err.message, "Failed to parse the request body as JSON");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = HttpClient::new(&ClientConfig::new("http://localhost:8080/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }
}
