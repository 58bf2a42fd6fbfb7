//! Transport to the Jyotish backend
//!
//! The page talks to the backend only through [`KundliApi`]; [`HttpBackend`]
//! is the real implementation.

use std::future::Future;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::ApiSection;
use crate::error::ApiError;
use crate::models::{BirthDetails, KundliResponse, PlaceCandidate};

#[cfg(test)]
pub(crate) mod stub;

const GEO_SEARCH_PATH: &str = "/api/v1/geo/search";
const GENERATE_PATH: &str = "/api/v1/kundli/generate";

/// The two backend calls the page depends on
pub trait KundliApi: Send + Sync + 'static {
    /// `GET /api/v1/geo/search?q=<query>`
    fn search_places(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<PlaceCandidate>, ApiError>> + Send;

    /// `POST /api/v1/kundli/generate`
    fn generate(
        &self,
        details: &BirthDetails,
    ) -> impl Future<Output = Result<KundliResponse, ApiError>> + Send;
}

/// reqwest-backed client for a running backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &ApiSection) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::Status(status));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl KundliApi for HttpBackend {
    async fn search_places(&self, query: &str) -> Result<Vec<PlaceCandidate>, ApiError> {
        tracing::debug!(query, "geo search request");

        let response = self
            .client
            .get(self.url(GEO_SEARCH_PATH))
            .query(&[("q", query)])
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn generate(&self, details: &BirthDetails) -> Result<KundliResponse, ApiError> {
        tracing::debug!(city = %details.place_name, dob = %details.date_of_birth, "generate request");

        let response = self
            .client
            .post(self.url(GENERATE_PATH))
            .json(details)
            .send()
            .await?;

        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::delhi_fixture;
    use crate::config::AppConfig;
    use crate::page::{GenerateOutcome, KundliPage, GENERATE_FAILED};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    const PLACES_JSON: &str = include_str!("../../fixtures/places_london.json");
    const KUNDLI_JSON: &str = include_str!("../../fixtures/kundli_delhi.json");

    /// Answer one request with a canned response; yields the raw request
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });

        (base_url, server)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut raw = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&raw);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if raw.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&raw).into_owned()
    }

    fn backend_for(base_url: &str) -> HttpBackend {
        HttpBackend::new(&ApiSection {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn page_for(base_url: &str) -> KundliPage<HttpBackend> {
        let mut config = AppConfig::default();
        config.api.base_url = base_url.to_string();
        KundliPage::new(Arc::new(HttpBackend::new(&config.api).unwrap()), &config)
    }

    fn sample_details() -> BirthDetails {
        let mut form = crate::page::BirthForm::default();
        form.city = "Delhi".to_string();
        form.latitude = "28.6139".to_string();
        form.longitude = "77.2090".to_string();
        form.timezone = "5.5".to_string();
        form.to_details()
    }

    #[tokio::test]
    async fn test_search_sends_get_with_query() {
        let (base_url, server) = serve_once("200 OK", PLACES_JSON).await;

        let places = backend_for(&base_url).search_places("London").await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("GET /api/v1/geo/search?q=London HTTP/1.1\r\n"));
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].timezone_identifier, "Europe/London");
    }

    #[tokio::test]
    async fn test_generate_posts_json_body() {
        let (base_url, server) = serve_once("200 OK", KUNDLI_JSON).await;

        let response = backend_for(&base_url).generate(&sample_details()).await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("POST /api/v1/kundli/generate HTTP/1.1\r\n"));
        let body = request.split("\r\n\r\n").nth(1).unwrap();
        let sent: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(sent["dob"], "1989-02-24");
        assert_eq!(sent["tob"], "16:30:00");
        assert_eq!(sent["lat"], 28.6139);
        assert_eq!(sent["timezone"], 5.5);
        assert_eq!(sent["ayanamsa"], 1);
        assert_eq!(sent["city"], "Delhi");
        assert_eq!(response, delhi_fixture());
    }

    #[tokio::test]
    async fn test_only_200_is_success() {
        for status in ["201 Created", "202 Accepted", "500 Internal Server Error"] {
            let (base_url, server) = serve_once(status, KUNDLI_JSON).await;

            let err = backend_for(&base_url)
                .generate(&sample_details())
                .await
                .unwrap_err();
            server.await.unwrap();

            assert!(
                matches!(&err, ApiError::Status(code) if status.starts_with(code.as_str())),
                "{status}: {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_decode_error() {
        let (base_url, server) = serve_once("200 OK", "{\"planets\":").await;

        let err = backend_for(&base_url).search_places("London").await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, ApiError::Decode(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_page_messages_for_http_failures() {
        let (base_url, server) = serve_once("500 Internal Server Error", "{}").await;
        let page = page_for(&base_url);

        assert_eq!(
            page.submit().await,
            GenerateOutcome::Failed {
                error: GENERATE_FAILED.to_string()
            }
        );
        server.await.unwrap();

        let (base_url, server) = serve_once("200 OK", "{\"planets\": [").await;
        let page = page_for(&base_url);

        let GenerateOutcome::Failed { error } = page.submit().await else {
            panic!("malformed body rendered");
        };
        server.await.unwrap();
        assert!(error.starts_with("malformed response body: "), "{error}");
        assert_eq!(page.status().error, Some(error));
        assert!(!page.status().loading);
    }

    #[tokio::test]
    async fn test_unreachable_backend_surfaces_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = backend_for(&base_url).search_places("London").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)), "{err:?}");

        let page = page_for(&base_url);
        let GenerateOutcome::Failed { error } = page.submit().await else {
            panic!("unreachable backend rendered");
        };
        assert_ne!(error, GENERATE_FAILED);
        assert!(!error.is_empty());
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let backend = HttpBackend::new(&ApiSection {
            base_url: "http://localhost:8000/".to_string(),
            timeout_secs: 5,
        })
        .unwrap();

        assert_eq!(
            backend.url(GEO_SEARCH_PATH),
            "http://localhost:8000/api/v1/geo/search"
        );
        assert_eq!(
            backend.url(GENERATE_PATH),
            "http://localhost:8000/api/v1/kundli/generate"
        );
    }

    #[test]
    fn test_query_is_urlencoded() {
        let backend = HttpBackend::new(&ApiSection::default()).unwrap();
        let request = backend
            .client
            .get(backend.url(GEO_SEARCH_PATH))
            .query(&[("q", "São Paulo & Co")])
            .build()
            .unwrap();

        assert_eq!(request.url().path(), "/api/v1/geo/search");
        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs, vec![("q".to_string(), "São Paulo & Co".to_string())]);
        assert!(!request.url().query().unwrap().contains(' '));
    }

    #[test]
    fn test_status_error_is_distinguishable() {
        let err = ApiError::Status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_http_status());
        assert_eq!(err.to_string(), "backend returned HTTP 500 Internal Server Error");

        let decode = serde_json::from_str::<KundliResponse>("{").unwrap_err();
        assert!(!ApiError::from(decode).is_http_status());
    }
}
