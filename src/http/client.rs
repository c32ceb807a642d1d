use reqwest::{
    self, Url,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use std::time::Duration;
use thiserror::Error;

use crate::constants;

/// Custom error type for HTTP requests.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP error: {0} returned {1}. Response body: {2}")]
    HttpError(Url, u16, String),
    #[error("Error deserializing JSON: {0}")]
    JsonError(String),
    #[error("Malformed response at row {row}: {reason}")]
    MalformedResponse { row: usize, reason: String },
    #[error("Other error: {0}")]
    Other(String),
}

/// Status and body of a completed exchange.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a single GET. Status handling is left to the caller.
pub trait Transport {
    async fn get(&self, url: &Url) -> Result<Response, RequestError>;
}

/// Builds the request URL from a path and query parameters.
pub fn build_url(path: &str, params: &[(&str, String)]) -> Result<Url, RequestError> {
    if params.is_empty() {
        Url::parse(path).map_err(|e| RequestError::Other(e.to_string()))
    } else {
        Url::parse_with_params(path, params).map_err(|e| RequestError::Other(e.to_string()))
    }
}

/// reqwest backed transport with a fixed timeout and JSON headers.
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Result<HttpClient, RequestError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(constants::USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(constants::REQUEST_TIMEOUT_SECS))
            .default_headers(headers)
            .build()
            .map_err(|e| RequestError::Other(e.to_string()))?;

        Ok(HttpClient { client })
    }
}

impl Transport for HttpClient {
    async fn get(&self, url: &Url) -> Result<Response, RequestError> {
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| RequestError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| RequestError::Network(e.to_string()))?;

        Ok(Response { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_encodes_params() {
        let url = build_url(
            "https://example.com/products/BTC-USD/candles",
            &[
                ("start", "2023-03-01T00:00:00Z".to_string()),
                ("granularity", "60".to_string()),
            ],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/products/BTC-USD/candles?start=2023-03-01T00%3A00%3A00Z&granularity=60"
        );
    }

    #[test]
    fn build_url_rejects_relative_path() {
        let err = build_url("products/BTC-USD/candles", &[]).unwrap_err();
        assert!(matches!(err, RequestError::Other(_)));
    }

    #[test]
    fn success_range() {
        let ok = Response { status: 204, body: String::new() };
        let not_found = Response { status: 404, body: String::new() };
        assert!(ok.is_success());
        assert!(!not_found.is_success());
    }

    #[test]
    fn client_builds() {
        assert!(HttpClient::new().is_ok());
    }
}
