//! HTTP client for the Nominatim `/search` endpoint.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::Geocoder;
use crate::error::{GeocodeError, Result};
use crate::models::Coordinate;

/// One candidate from a `/search?format=json` response. Nominatim encodes
/// the coordinates as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

/// Single-result Nominatim search client
pub struct NominatimClient {
    client: Client,
    endpoint: Url,
}

impl NominatimClient {
    pub fn new(endpoint: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| GeocodeError::Config(format!("{} is not a valid url: {}", endpoint, e)))?;

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| GeocodeError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    /// Build the request URL for an address: `q`, `format=json`, `limit=1`.
    pub fn search_url(&self, address: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", address)
            .append_pair("format", "json")
            .append_pair("limit", "1");
        url
    }
}

impl Geocoder for NominatimClient {
    async fn lookup(&self, address: &str) -> Result<Option<Coordinate>> {
        let url = self.search_url(address);
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| GeocodeError::Http {
                address: address.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status {
                address: address.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(|source| GeocodeError::Http {
            address: address.to_string(),
            source,
        })?;

        parse_first_hit(&body).map_err(|reason| GeocodeError::MalformedResponse {
            address: address.to_string(),
            reason,
        })
    }
}

/// Parse a `/search` response body, returning the first candidate if any.
pub fn parse_first_hit(body: &[u8]) -> std::result::Result<Option<Coordinate>, String> {
    let hits: Vec<SearchHit> = serde_json::from_slice(body).map_err(|e| e.to_string())?;

    let Some(hit) = hits.into_iter().next() else {
        return Ok(None);
    };

    let lat = hit
        .lat
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad lat '{}': {}", hit.lat, e))?;
    let lng = hit
        .lon
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad lon '{}': {}", hit.lon, e))?;

    Ok(Some(Coordinate::new(lat, lng)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn client() -> NominatimClient {
        NominatimClient::new(
            "https://nominatim.openstreetmap.org/search",
            "test-agent/0.1",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_search_url_shape() {
        let url = client().search_url("1 Harvard Yard, Cambridge, MA");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(url.path(), "/search");
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "1 Harvard Yard, Cambridge, MA".to_string()),
                ("format".to_string(), "json".to_string()),
                ("limit".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        let result = NominatimClient::new("not a url", "ua", Duration::from_secs(1));
        assert!(matches!(result, Err(GeocodeError::Config(_))));
    }

    #[test]
    fn test_parse_empty_array() {
        assert_eq!(parse_first_hit(b"[]").unwrap(), None);
    }

    #[test]
    fn test_parse_takes_first_hit() {
        let body = br#"[
            {"place_id": 1, "lat": "42.3770", "lon": "-71.1167", "display_name": "Harvard Yard"},
            {"place_id": 2, "lat": "0", "lon": "0"}
        ]"#;
        assert_eq!(
            parse_first_hit(body).unwrap(),
            Some(Coordinate::new(42.377, -71.1167))
        );
    }

    #[test]
    fn test_parse_non_numeric_lat() {
        let body = br#"[{"lat": "north", "lon": "-71.1"}]"#;
        assert!(parse_first_hit(body).is_err());
    }

    #[test]
    fn test_parse_not_an_array() {
        assert!(parse_first_hit(br#"{"error": "rate limited"}"#).is_err());
    }

    /// Answer a single HTTP request with a canned response and hand back the
    /// raw request head.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/search", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8(request).unwrap()
        });

        (endpoint, handle)
    }

    fn local_client(endpoint: &str) -> NominatimClient {
        NominatimClient::new(endpoint, "HarvardLibrariesMap/1.0", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_lookup_sends_query_and_user_agent() {
        let (endpoint, server) =
            serve_once("200 OK", r#"[{"lat": "42.3770", "lon": "-71.1167"}]"#).await;

        let result = local_client(&endpoint).lookup("1 Harvard Yard").await.unwrap();
        assert_eq!(result, Some(Coordinate::new(42.377, -71.1167)));

        let request = server.await.unwrap();
        assert!(
            request.starts_with("GET /search?q=1+Harvard+Yard&format=json&limit=1 HTTP/1.1\r\n"),
            "{}",
            request
        );
        assert!(request
            .to_ascii_lowercase()
            .contains("\r\nuser-agent: harvardlibrariesmap/1.0\r\n"));
    }

    #[tokio::test]
    async fn test_lookup_empty_array_is_none() {
        let (endpoint, server) = serve_once("200 OK", "[]").await;

        let result = local_client(&endpoint).lookup("Nowhere").await.unwrap();
        assert_eq!(result, None);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_lookup_error_status() {
        let (endpoint, server) = serve_once("503 Service Unavailable", "").await;

        let err = local_client(&endpoint).lookup("1 Harvard Yard").await.unwrap_err();
        match err {
            GeocodeError::Status { address, status } => {
                assert_eq!(address, "1 Harvard Yard");
                assert_eq!(status, reqwest::StatusCode::SERVICE_UNAVAILABLE);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_lookup_malformed_body() {
        let (endpoint, server) = serve_once("200 OK", r#"{"error": "bad"}"#).await;

        let err = local_client(&endpoint).lookup("x").await.unwrap_err();
        assert!(matches!(err, GeocodeError::MalformedResponse { .. }));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_lookup_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/search", listener.local_addr().unwrap());
        drop(listener);

        let err = local_client(&endpoint).lookup("x").await.unwrap_err();
        assert!(matches!(err, GeocodeError::Http { .. }));
    }
}
