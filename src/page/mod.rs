//! The Kundli page: birth form, place search, and the views of the last
//! generated chart.
//!
//! [`KundliPage`] owns every component and the loading/error state. A
//! successful generation replaces the displayed result in one step; a
//! failed one leaves the previous result on screen.

pub mod birth_form;
pub mod chart;
pub mod dasha;
pub mod details;
pub mod geo_search;
pub mod planet_table;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::api::KundliApi;
use crate::config::AppConfig;
use crate::error::FormError;
use crate::models::{BirthDetails, KundliResponse};

pub use birth_form::{BirthField, BirthForm};
pub use chart::ChartRenderModel;
pub use dasha::{DashaTimeline, DashaView};
pub use details::DetailsView;
pub use geo_search::{GeoSearchController, SearchView};
pub use planet_table::PlanetRow;

/// Shown for any non-success status from the generation endpoint
pub const GENERATE_FAILED: &str = "Failed to generate Kundli";

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct PageState {
    loading: bool,
    error: Option<String>,
    result: Option<Arc<KundliResponse>>,
    dasha: DashaTimeline,
}

/// Result of one submit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GenerateOutcome {
    Rendered,
    Failed { error: String },
    /// A generation was already in flight
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageStatus {
    pub loading: bool,
    pub error: Option<String>,
    pub has_result: bool,
}

/// Every view of the current result, rendered from one response
#[derive(Debug, Clone, Serialize)]
pub struct PageSnapshot {
    pub status: PageStatus,
    pub chart: Option<ChartRenderModel>,
    pub planets: Option<Vec<PlanetRow>>,
    pub dasha: Option<DashaView>,
    pub details: Option<DetailsView>,
}

/// Marks the page as loading for as long as it lives
struct LoadingGuard<'a> {
    state: &'a Mutex<PageState>,
}

impl<'a> LoadingGuard<'a> {
    /// `None` while another generation holds the page
    fn acquire(state: &'a Mutex<PageState>) -> Option<Self> {
        let mut page = lock(state);
        if page.loading {
            return None;
        }
        page.loading = true;
        page.error = None;
        Some(Self { state })
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        lock(self.state).loading = false;
    }
}

pub struct KundliPage<B: KundliApi> {
    backend: Arc<B>,
    form: Mutex<BirthForm>,
    search: GeoSearchController<B>,
    state: Mutex<PageState>,
    date_format: String,
}

impl<B: KundliApi> KundliPage<B> {
    pub fn new(backend: Arc<B>, config: &AppConfig) -> Self {
        Self {
            search: GeoSearchController::new(Arc::clone(&backend), &config.search),
            backend,
            form: Mutex::new(BirthForm::default()),
            state: Mutex::new(PageState::default()),
            date_format: config.display.date_format.clone(),
        }
    }

    /// Keystroke in the city field
    pub fn type_place(&self, text: &str) -> SearchView {
        lock(&self.form).city = text.to_string();
        self.search.on_input(text);
        self.search.view()
    }

    pub fn place_results(&self) -> SearchView {
        self.search.view()
    }

    /// Pick a search result and copy it into the form
    pub fn select_place(&self, index: usize) -> Result<BirthForm, FormError> {
        let place = self.search.select(index)?;
        let mut form = lock(&self.form);
        form.apply_place(&place);
        Ok(form.clone())
    }

    pub fn set_field(&self, field: BirthField, value: &str) -> Result<BirthForm, FormError> {
        if field == BirthField::City {
            self.type_place(value);
            return Ok(self.form());
        }
        let mut form = lock(&self.form);
        form.set(field, value)?;
        Ok(form.clone())
    }

    pub fn form(&self) -> BirthForm {
        lock(&self.form).clone()
    }

    /// Submit the form as it currently stands
    pub async fn submit(&self) -> GenerateOutcome {
        let generation = lock(&self.form).submit(|details| self.generate(details));
        generation.await
    }

    /// Request a chart and swap it in on success
    pub async fn generate(&self, details: BirthDetails) -> GenerateOutcome {
        let Some(_loading) = LoadingGuard::acquire(&self.state) else {
            tracing::debug!("generation already in flight, ignoring submit");
            return GenerateOutcome::Ignored;
        };

        tracing::info!(city = %details.place_name, dob = %details.date_of_birth, "generating kundli");

        match self.backend.generate(&details).await {
            Ok(response) => {
                tracing::info!(
                    planets = response.planets.len(),
                    lagna = ?response.lagna(),
                    "kundli generated"
                );
                let mut page = lock(&self.state);
                page.result = Some(Arc::new(response));
                page.dasha.collapse();
                GenerateOutcome::Rendered
            }
            Err(e) => {
                let error = if e.is_http_status() {
                    GENERATE_FAILED.to_string()
                } else {
                    e.to_string()
                };
                tracing::error!(error = %e, "kundli generation failed");
                lock(&self.state).error = Some(error.clone());
                GenerateOutcome::Failed { error }
            }
        }
    }

    pub fn status(&self) -> PageStatus {
        let page = lock(&self.state);
        PageStatus {
            loading: page.loading,
            error: page.error.clone(),
            has_result: page.result.is_some(),
        }
    }

    pub fn result(&self) -> Option<Arc<KundliResponse>> {
        lock(&self.state).result.clone()
    }

    pub fn chart(&self) -> Option<ChartRenderModel> {
        let result = self.result()?;
        Some(chart::layout(
            &result.planets,
            result.houses.as_deref(),
            result.lagna_sign,
        ))
    }

    pub fn planet_table(&self) -> Option<Vec<PlanetRow>> {
        self.result()
            .map(|result| planet_table::planet_rows(&result.planets))
    }

    pub fn details(&self) -> Option<DetailsView> {
        let result = self.result()?;
        details::details_view(result.basic_details.as_ref(), result.ghatak_details.as_ref())
    }

    pub fn dasha(&self) -> Option<DashaView> {
        let page = lock(&self.state);
        self.render_dasha(&page)
    }

    /// Click on major period `index`. Clicks outside the list are ignored.
    pub fn toggle_dasha(&self, index: usize) -> Option<DashaView> {
        let mut page = lock(&self.state);
        let count = page
            .result
            .as_ref()
            .and_then(|r| r.dasha.as_ref())
            .and_then(|d| d.mahadashas.as_ref())
            .map(Vec::len)?;

        if index < count {
            page.dasha.toggle(index);
        } else {
            tracing::debug!(index, count, "dasha click outside list");
        }
        self.render_dasha(&page)
    }

    /// All views rendered from a single result
    pub fn snapshot(&self) -> PageSnapshot {
        let page = lock(&self.state);
        let result = page.result.as_deref();

        PageSnapshot {
            status: PageStatus {
                loading: page.loading,
                error: page.error.clone(),
                has_result: result.is_some(),
            },
            chart: result.map(|r| chart::layout(&r.planets, r.houses.as_deref(), r.lagna_sign)),
            planets: result.map(|r| planet_table::planet_rows(&r.planets)),
            dasha: self.render_dasha(&page),
            details: result.and_then(|r| {
                details::details_view(r.basic_details.as_ref(), r.ghatak_details.as_ref())
            }),
        }
    }

    fn render_dasha(&self, page: &PageState) -> Option<DashaView> {
        let result = page.result.as_ref()?;
        page.dasha.render(result.dasha.as_ref(), &self.date_format)
    }
}
