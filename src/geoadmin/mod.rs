//! geo.admin.ch SearchServer access: query building, wire types, and the HTTP client.

mod query;
pub mod types;

pub use query::{Crs, Lang, MIN_SEARCH_CHARS, SEARCH_ENDPOINT, SearchQuery};

use reqwest::Client;
use tracing::{debug, warn};

use types::SearchResponse;

/// Errors returned by a SearchServer request.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("SearchServer returned status {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid search URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Malformed search response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Abstraction over the location search endpoint.
/// Implemented by `GeoAdminClient` for production; mock implementations used in tests.
pub trait SearchClient {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError>;
}

/// HTTP client for the geo.admin.ch location search.
#[derive(Clone)]
pub struct GeoAdminClient {
    http: Client,
    base_url: String,
}

impl GeoAdminClient {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            base_url: SEARCH_ENDPOINT.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }
}

impl SearchClient for GeoAdminClient {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError> {
        let url = query.url(&self.base_url)?;
        debug!(url = %url, lang = %query.lang(), "location search");

        let response = self
            .http
            .get(url)
            .header("User-Agent", crate::USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!(status = %status, "SearchServer error");
            return Err(SearchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed = SearchResponse::from_json(&body)?;
        debug!(results = parsed.results.len(), "location search complete");
        Ok(parsed)
    }
}

#[cfg(test)]
mod http_tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn search_url(server: &MockServer) -> String {
        format!("{}/rest/services/api/SearchServer", server.uri())
    }

    #[tokio::test]
    async fn search_sends_parameters_and_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/services/api/SearchServer"))
            .and(query_param("type", "locations"))
            .and(query_param("searchText", "Bern"))
            .and(query_param("returnGeometry", "true"))
            .and(query_param("lang", "de"))
            .and(query_param("sr", "2056"))
            .and(header("User-Agent", crate::USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{
                    "attrs": {
                        "label": "<b>Bern</b>",
                        "origin": "gg25",
                        "rank": 2,
                        "geom_st_box2d": "BOX(2590000 1190000,2610000 1210000)",
                        "detail": "bern be"
                    }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeoAdminClient::with_base_url(Client::new(), &search_url(&server));
        let query = SearchQuery::new("Bern", Lang::De, Crs::Lv95).unwrap();
        let response = client.search(&query).await.unwrap();

        assert_eq!(response.results.len(), 1);
        let attrs = &response.results[0].attrs;
        assert_eq!(attrs.label, "<b>Bern</b>");
        assert_eq!(attrs.origin, "gg25");
        assert_eq!(attrs.rank, 2);
        assert_eq!(attrs.detail.as_deref(), Some("bern be"));
    }

    #[tokio::test]
    async fn search_non_200_returns_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = GeoAdminClient::with_base_url(Client::new(), &search_url(&server));
        let query = SearchQuery::new("Bern", Lang::En, Crs::Lv95).unwrap();
        let result = client.search(&query).await;
        assert!(matches!(result, Err(SearchError::Status(503))));
    }

    #[tokio::test]
    async fn search_other_success_status_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = GeoAdminClient::with_base_url(Client::new(), &search_url(&server));
        let query = SearchQuery::new("Bern", Lang::En, Crs::Lv95).unwrap();
        let result = client.search(&query).await;
        assert!(matches!(result, Err(SearchError::Status(204))));
    }

    #[tokio::test]
    async fn search_invalid_json_returns_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = GeoAdminClient::with_base_url(Client::new(), &search_url(&server));
        let query = SearchQuery::new("Bern", Lang::En, Crs::Lv95).unwrap();
        let result = client.search(&query).await;
        assert!(matches!(result, Err(SearchError::Decode(_))));
    }

    #[tokio::test]
    async fn search_missing_results_field_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = GeoAdminClient::with_base_url(Client::new(), &search_url(&server));
        let query = SearchQuery::new("Bern", Lang::En, Crs::Lv95).unwrap();
        let result = client.search(&query).await;
        assert!(matches!(result, Err(SearchError::Decode(_))));
    }
}
