//! In-memory backend for tests

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use super::KundliApi;
use crate::error::ApiError;
use crate::models::{BirthDetails, KundliResponse, PlaceCandidate};

pub(crate) fn delhi_fixture() -> KundliResponse {
    serde_json::from_str(include_str!("../../fixtures/kundli_delhi.json")).unwrap()
}

pub(crate) fn london_places() -> Vec<PlaceCandidate> {
    serde_json::from_str(include_str!("../../fixtures/places_london.json")).unwrap()
}

pub(crate) fn decode_error() -> ApiError {
    ApiError::Decode(serde_json::from_str::<KundliResponse>("{\"planets\":").unwrap_err())
}

#[derive(Default)]
pub(crate) struct StubBackend {
    places: Mutex<HashMap<String, Vec<PlaceCandidate>>>,
    failing_queries: Mutex<Vec<String>>,
    search_latency: Mutex<HashMap<String, Duration>>,
    generate_results: Mutex<VecDeque<Result<KundliResponse, ApiError>>>,
    generate_latency: Mutex<Duration>,
    pub search_calls: Mutex<Vec<String>>,
    pub generate_calls: Mutex<Vec<BirthDetails>>,
}

impl StubBackend {
    pub fn with_places(self, query: &str, places: Vec<PlaceCandidate>) -> Self {
        self.places.lock().unwrap().insert(query.to_string(), places);
        self
    }

    pub fn with_failing_query(self, query: &str) -> Self {
        self.failing_queries.lock().unwrap().push(query.to_string());
        self
    }

    pub fn with_search_latency(self, query: &str, latency: Duration) -> Self {
        self.search_latency
            .lock()
            .unwrap()
            .insert(query.to_string(), latency);
        self
    }

    pub fn with_generate_latency(self, latency: Duration) -> Self {
        *self.generate_latency.lock().unwrap() = latency;
        self
    }

    pub fn push_generate(&self, result: Result<KundliResponse, ApiError>) {
        self.generate_results.lock().unwrap().push_back(result);
    }

    pub fn searches(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }
}

impl KundliApi for StubBackend {
    async fn search_places(&self, query: &str) -> Result<Vec<PlaceCandidate>, ApiError> {
        self.search_calls.lock().unwrap().push(query.to_string());

        let latency = self.search_latency.lock().unwrap().get(query).copied();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if self.failing_queries.lock().unwrap().iter().any(|q| q == query) {
            return Err(ApiError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE));
        }

        Ok(self
            .places
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn generate(&self, details: &BirthDetails) -> Result<KundliResponse, ApiError> {
        self.generate_calls.lock().unwrap().push(details.clone());

        let latency = *self.generate_latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        self.generate_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(delhi_fixture()))
    }
}
