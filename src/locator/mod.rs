//! Locator filter: turns search text into parsed location results, one request at a time.

mod beautify;
mod parse;

pub use beautify::{BeautifyOptions, beautify_group, break_camelcase};
pub use parse::{
    Category, ParseError, SearchResult, box_to_rectangle, parse_results, rank_to_priority,
};

use std::sync::Mutex;

use futures::future::{AbortHandle, AbortRegistration, Abortable};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::geoadmin::{SearchClient, SearchError, SearchQuery};

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("{0}")]
    Search(#[from] SearchError),

    #[error("{0}; the location search service changed its categories")]
    UnknownCategory(String),
}

/// How a single `fetch_results` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Text too short; no request was issued.
    Skipped,
    /// Aborted by the host or superseded by a newer search.
    Cancelled,
    /// The service answered with a status other than 200.
    Rejected { status: u16 },
    Completed { emitted: usize, skipped: usize },
}

/// Location search filter for a host locator bar.
///
/// Owns a single "current request" slot: starting a search aborts whichever
/// search is still in flight.
pub struct LocatorFilter<C> {
    client: C,
    settings: Settings,
    locale: String,
    current: Mutex<Option<AbortHandle>>,
}

impl<C: SearchClient> LocatorFilter<C> {
    pub const NAME: &'static str = "SwissLocatorFilter";
    pub const DISPLAY_NAME: &'static str = "Swiss Geoadmin locations";
    pub const PREFIX: &'static str = "swi";

    pub fn new(client: C, settings: Settings, locale: impl Into<String>) -> Self {
        Self {
            client,
            settings,
            locale: locale.into(),
            current: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn configure(&mut self, settings: Settings) {
        debug!(?settings, "filter reconfigured");
        self.settings = settings;
    }

    /// Aborts the in-flight search, if any.
    pub fn cancel(&self) {
        if let Some(handle) = self.slot().take() {
            handle.abort();
        }
    }

    /// Runs one search, calling `emit` for every result in response order.
    ///
    /// `feedback` is the host's cancellation channel; aborting it ends the search
    /// silently with [`SearchOutcome::Cancelled`].
    pub async fn fetch_results<F>(
        &self,
        search: &str,
        feedback: Option<AbortRegistration>,
        emit: F,
    ) -> Result<SearchOutcome, FilterError>
    where
        F: FnMut(SearchResult),
    {
        let lang = self.settings.effective_lang(&self.locale);
        let Some(query) = SearchQuery::new(search, lang, self.settings.crs) else {
            debug!(search, "search text too short, skipping");
            return Ok(SearchOutcome::Skipped);
        };

        let (handle, registration) = AbortHandle::new_pair();
        if let Some(previous) = self.slot().replace(handle) {
            debug!("aborting previous search");
            previous.abort();
        }

        info!(search = %query.text(), lang = %lang, crs = %query.crs(), "location search");
        let run = Abortable::new(self.run(query, emit), registration);
        let outcome = match feedback {
            Some(feedback) => Abortable::new(run, feedback).await.ok().and_then(Result::ok),
            None => run.await.ok(),
        };
        outcome.unwrap_or_else(|| {
            debug!("search cancelled");
            Ok(SearchOutcome::Cancelled)
        })
    }

    async fn run<F>(&self, query: SearchQuery, mut emit: F) -> Result<SearchOutcome, FilterError>
    where
        F: FnMut(SearchResult),
    {
        let response = match self.client.search(&query).await {
            Ok(response) => response,
            Err(SearchError::Status(status)) => {
                warn!(status, "search rejected, no results");
                return Ok(SearchOutcome::Rejected { status });
            }
            Err(e) => {
                warn!(error = %e, "search failed");
                return Err(e.into());
            }
        };

        let mut emitted = 0;
        let mut skipped = 0;
        for parsed in parse_results(response) {
            match parsed {
                Ok(result) => {
                    debug!(
                        label = %result.label,
                        detail = result.detail.as_deref().unwrap_or_default(),
                        priority = result.priority,
                        rank = result.rank,
                        category = result.category.label(),
                        bbox = ?result.bbox,
                        "result"
                    );
                    emit(result);
                    emitted += 1;
                }
                Err(ParseError::InvalidBoundingBox(raw)) => {
                    warn!(bbox = %raw, "skipping result with unparsable bounding box");
                    skipped += 1;
                }
                Err(e @ ParseError::UnknownCategory(_)) => {
                    warn!(error = %e, "unknown result category");
                    return Err(FilterError::UnknownCategory(e.to_string()));
                }
            }
        }

        info!(emitted, skipped, "search complete");
        Ok(SearchOutcome::Completed { emitted, skipped })
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<AbortHandle>> {
        self.current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
