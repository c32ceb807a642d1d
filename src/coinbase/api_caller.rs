use chrono::{DateTime, SecondsFormat, Utc};

use super::response;
use crate::http::client::{self, RequestError, Transport};
use crate::model::{Candle, TimeRange};

// ISO-8601 UTC with a `Z` suffix, e.g. 2023-03-01T00:00:00Z.
fn iso_utc(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Fetches one batch of candles for `range`. Coinbase returns up to 300 candles per call.
pub async fn candles<T: Transport>(
    transport: &T,
    base_url: &str,   // API base URL.
    product_id: &str, // e.g. BTC-USD.
    range: &TimeRange,
    granularity: u32, // Candle width in seconds.
) -> Result<Vec<Candle>, RequestError> {
    let url = client::build_url(
        &format!("{}/products/{}/candles", base_url, product_id),
        &[
            ("start", iso_utc(&range.start)),
            ("end", iso_utc(&range.end)),
            ("granularity", granularity.to_string()),
        ],
    )?;

    let resp = transport.get(&url).await?;

    // Handle non-success status codes.
    if !resp.is_success() {
        return Err(RequestError::HttpError(url, resp.status, resp.body));
    }

    response::parse_candles(&resp.body)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::http::client::Response;
    use chrono::TimeZone;
    use reqwest::Url;
    use std::{cell::RefCell, collections::VecDeque};

    /// Replays canned responses in order and records requested URLs.
    #[derive(Default)]
    pub(crate) struct MockTransport {
        responses: RefCell<VecDeque<Result<Response, RequestError>>>,
        pub requests: RefCell<Vec<Url>>,
    }

    impl MockTransport {
        pub fn with(self, status: u16, body: &str) -> Self {
            self.responses.borrow_mut().push_back(Ok(Response {
                status,
                body: body.to_string(),
            }));
            self
        }

        pub fn with_error(self, err: RequestError) -> Self {
            self.responses.borrow_mut().push_back(Err(err));
            self
        }
    }

    impl Transport for MockTransport {
        async fn get(&self, url: &Url) -> Result<Response, RequestError> {
            self.requests.borrow_mut().push(url.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(RequestError::Other("missing mock response".into())))
        }
    }

    fn sample_range() -> TimeRange {
        TimeRange {
            start: Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2023, 3, 1, 5, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn returns_parsed_candles() {
        let transport = MockTransport::default().with(200, "[[1000,10.0,12.0,11.0,11.5,5.0]]");
        let candles = candles(&transport, "https://api.test", "BTC-USD", &sample_range(), 60)
            .await
            .unwrap();
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].time, 1000);
        assert_eq!(candles[0].low, 10.0);
        assert_eq!(candles[0].high, 12.0);
        assert_eq!(candles[0].open, 11.0);
        assert_eq!(candles[0].close, 11.5);
        assert_eq!(candles[0].volume, 5.0);
    }

    #[tokio::test]
    async fn sends_range_and_granularity() {
        let transport = MockTransport::default().with(200, "[]");
        candles(&transport, "https://api.test", "BTC-USD", &sample_range(), 60)
            .await
            .unwrap();

        let requests = transport.requests.borrow();
        assert_eq!(requests.len(), 1);
        let url = &requests[0];
        assert_eq!(url.path(), "/products/BTC-USD/candles");
        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            params,
            vec![
                ("start".to_string(), "2023-03-01T00:00:00Z".to_string()),
                ("end".to_string(), "2023-03-01T05:00:00Z".to_string()),
                ("granularity".to_string(), "60".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        // Body would fail to parse; it must be carried, not parsed.
        let transport = MockTransport::default().with(429, "Slow down");
        let err = candles(&transport, "https://api.test", "BTC-USD", &sample_range(), 60)
            .await
            .unwrap_err();
        match err {
            RequestError::HttpError(url, status, body) => {
                assert_eq!(url.path(), "/products/BTC-USD/candles");
                assert_eq!(status, 429);
                assert_eq!(body, "Slow down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn network_error_is_propagated() {
        let transport =
            MockTransport::default().with_error(RequestError::Network("timed out".into()));
        let err = candles(&transport, "https://api.test", "BTC-USD", &sample_range(), 60)
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::Network(_)));
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let transport = MockTransport::default().with(200, "[[1000,1,2]]");
        let err = candles(&transport, "https://api.test", "BTC-USD", &sample_range(), 60)
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::MalformedResponse { row: 0, .. }));
    }
}
