use serde::Deserialize;

/// Response from `GET /rest/services/api/SearchServer?type=locations`.
#[derive(Deserialize, Debug)]
pub struct SearchResponse {
    pub results: Vec<Location>,
}

impl SearchResponse {
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

#[derive(Deserialize, Debug)]
pub struct Location {
    pub attrs: Attrs,
}

/// Attributes of a location hit. Only the fields consumed downstream are declared.
#[derive(Deserialize, Debug)]
pub struct Attrs {
    pub label: String,
    pub origin: String,
    pub rank: i64,
    pub geom_st_box2d: String,
    pub detail: Option<String>,
}
