use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::geoadmin::types::{Location, SearchResponse};
use crate::geometry::Rectangle;

/// Lowest (worst) rank the SearchServer hands out.
const RANK_SCALE: f64 = 7.0;

static BOX_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([0-9]+(?:\.[0-9]+)?)\b").expect("bounding box pattern is valid")
});

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown result category '{0}'")]
    UnknownCategory(String),

    #[error("Could not parse bounding box: {0}")]
    InvalidBoundingBox(String),
}

/// Result group, keyed by the service's `origin` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    ZipCode,
    MunicipalBoundary,
    District,
    Canton,
    Index,
    Address,
    Parcel,
}

impl Category {
    /// The category vocabulary is owned by the service; unknown keys mean the contract changed.
    pub fn from_origin(origin: &str) -> Result<Category, ParseError> {
        match origin {
            "zipcode" => Ok(Category::ZipCode),
            "gg25" => Ok(Category::MunicipalBoundary),
            "district" => Ok(Category::District),
            "kantone" => Ok(Category::Canton),
            "gazetteer" => Ok(Category::Index),
            "address" => Ok(Category::Address),
            "parcel" => Ok(Category::Parcel),
            other => Err(ParseError::UnknownCategory(other.to_string())),
        }
    }

    /// Group heading shown next to results.
    pub fn label(self) -> &'static str {
        match self {
            Category::ZipCode => "ZIP code",
            Category::MunicipalBoundary => "Municipal boundaries",
            Category::District => "District",
            Category::Canton => "Cantons",
            Category::Index => "Index",
            Category::Address => "Address",
            Category::Parcel => "Parcel",
        }
    }
}

/// A parsed location hit, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub label: String,
    pub detail: Option<String>,
    pub category: Category,
    pub rank: i64,
    pub priority: f64,
    pub bbox: Rectangle,
}

impl TryFrom<Location> for SearchResult {
    type Error = ParseError;

    fn try_from(location: Location) -> Result<Self, Self::Error> {
        let attrs = location.attrs;
        let category = Category::from_origin(&attrs.origin)?;
        let bbox = box_to_rectangle(&attrs.geom_st_box2d)?;
        Ok(SearchResult {
            label: attrs.label,
            detail: attrs.detail,
            category,
            rank: attrs.rank,
            priority: rank_to_priority(attrs.rank),
            bbox,
        })
    }
}

/// Maps a rank (1 best, 7 worst) onto a priority in `[0, 1]`. Out-of-range ranks pass through.
pub fn rank_to_priority(rank: i64) -> f64 {
    1.0 - rank as f64 / RANK_SCALE
}

/// Parses `BOX(xmin ymin,xmax ymax)`-style text. Exactly four unsigned numbers are required.
pub fn box_to_rectangle(text: &str) -> Result<Rectangle, ParseError> {
    let coords: Vec<f64> = BOX_NUMBER
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| ParseError::InvalidBoundingBox(text.to_string()))?;

    match coords.as_slice() {
        &[xmin, ymin, xmax, ymax] => Ok(Rectangle::new(xmin, ymin, xmax, ymax)),
        _ => Err(ParseError::InvalidBoundingBox(text.to_string())),
    }
}

/// Lazily projects each response entry into a [`SearchResult`]. One pass, in response order.
pub fn parse_results(
    response: SearchResponse,
) -> impl Iterator<Item = Result<SearchResult, ParseError>> {
    response.results.into_iter().map(SearchResult::try_from)
}
