//! Search-as-you-type place lookup for the city field
//!
//! Keystrokes re-arm a debounce timer; only the timer armed by the latest
//! keystroke may issue a request, and a response is applied only if its
//! ticket is still the current one when it arrives.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;

use super::lock;
use crate::api::KundliApi;
use crate::config::SearchSection;
use crate::error::{ApiError, FormError};
use crate::models::PlaceCandidate;

/// Identifies one armed lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    query: String,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Dropdown state of the city field
#[derive(Debug, Default)]
pub struct SearchState {
    text: String,
    open: bool,
    busy: bool,
    results: Vec<PlaceCandidate>,
    seq: u64,
    min_query_chars: usize,
}

/// What the city field currently shows
#[derive(Debug, Clone, Serialize)]
pub struct SearchView {
    pub query: String,
    pub open: bool,
    pub busy: bool,
    pub results: Vec<PlaceCandidate>,
}

impl SearchState {
    pub fn new(min_query_chars: usize) -> Self {
        Self {
            min_query_chars,
            ..Self::default()
        }
    }

    /// The user typed into the city field. Invalidates every earlier ticket
    /// and returns a new one if the text is long enough to search.
    pub fn input(&mut self, text: &str) -> Option<SearchTicket> {
        self.text = text.to_string();
        self.open = true;
        self.busy = false;
        self.seq += 1;

        let query = text.trim();
        (query.chars().count() > self.min_query_chars).then(|| SearchTicket {
            seq: self.seq,
            query: query.to_string(),
        })
    }

    /// Debounce timer fired. Returns false if the ticket went stale meanwhile.
    pub fn fire(&mut self, ticket: &SearchTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.busy = true;
        true
    }

    /// Apply a lookup outcome. Returns false (and changes nothing) when the
    /// ticket no longer matches the current input.
    pub fn complete(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<Vec<PlaceCandidate>, ApiError>,
    ) -> bool {
        if !self.is_current(ticket) {
            tracing::trace!(query = %ticket.query, "discarding stale place results");
            return false;
        }

        self.busy = false;
        match outcome {
            Ok(results) => {
                tracing::debug!(query = %ticket.query, count = results.len(), "place results");
                self.results = results;
            }
            Err(e) => {
                tracing::warn!(query = %ticket.query, error = %e, "place search failed");
                self.results.clear();
            }
        }
        true
    }

    /// Pick a candidate from the open dropdown
    pub fn select(&mut self, index: usize) -> Result<PlaceCandidate, FormError> {
        if !self.open {
            return Err(FormError::NoSuchCandidate(index));
        }
        let candidate = self
            .results
            .get(index)
            .cloned()
            .ok_or(FormError::NoSuchCandidate(index))?;

        self.text = candidate.name.clone();
        self.open = false;
        self.busy = false;
        self.seq += 1;
        Ok(candidate)
    }

    pub fn view(&self) -> SearchView {
        SearchView {
            query: self.text.clone(),
            open: self.open,
            busy: self.busy,
            results: if self.open {
                self.results.clone()
            } else {
                Vec::new()
            },
        }
    }

    fn is_current(&self, ticket: &SearchTicket) -> bool {
        self.open && ticket.seq == self.seq && ticket.query == self.text.trim()
    }
}

/// Drives [`SearchState`] with a debounce timer and backend lookups
pub struct GeoSearchController<B: KundliApi> {
    backend: Arc<B>,
    state: Arc<Mutex<SearchState>>,
    pending: Mutex<Option<JoinHandle<()>>>,
    debounce: Duration,
}

impl<B: KundliApi> GeoSearchController<B> {
    pub fn new(backend: Arc<B>, config: &SearchSection) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(SearchState::new(config.min_query_chars))),
            pending: Mutex::new(None),
            debounce: config.debounce(),
        }
    }

    /// Keystroke in the city field
    pub fn on_input(&self, text: &str) {
        // `pending` is held until the new task is stored, so tickets and
        // tasks are replaced in the same order.
        let mut pending = lock(&self.pending);
        let ticket = lock(&self.state).input(text);

        if let Some(task) = pending.take() {
            task.abort();
        }

        if let Some(ticket) = ticket {
            let backend = Arc::clone(&self.backend);
            let state = Arc::clone(&self.state);
            let debounce = self.debounce;

            *pending = Some(tokio::spawn(async move {
                tokio::time::sleep(debounce).await;
                if !lock(&state).fire(&ticket) {
                    return;
                }
                let outcome = backend.search_places(ticket.query()).await;
                lock(&state).complete(&ticket, outcome);
            }));
        }
    }

    /// Choose a candidate; closes the dropdown and cancels any armed lookup
    pub fn select(&self, index: usize) -> Result<PlaceCandidate, FormError> {
        let mut pending = lock(&self.pending);
        let candidate = lock(&self.state).select(index)?;
        if let Some(task) = pending.take() {
            task.abort();
        }
        Ok(candidate)
    }

    pub fn view(&self) -> SearchView {
        lock(&self.state).view()
    }

    fn cancel_pending(&self) {
        if let Some(task) = lock(&self.pending).take() {
            task.abort();
        }
    }
}

impl<B: KundliApi> Drop for GeoSearchController<B> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
