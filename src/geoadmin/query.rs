use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use url::Url;

pub const SEARCH_ENDPOINT: &str = "https://api3.geo.admin.ch/rest/services/api/SearchServer";

/// Shortest search text that is sent to the service.
pub const MIN_SEARCH_CHARS: usize = 2;

/// Response language accepted by the SearchServer `lang` parameter.
#[derive(Debug, ValueEnum, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lang {
    De,
    Fr,
    It,
    Rm,
    #[default]
    En,
}

impl Lang {
    pub fn code(self) -> &'static str {
        match self {
            Lang::De => "de",
            Lang::Fr => "fr",
            Lang::It => "it",
            Lang::Rm => "rm",
            Lang::En => "en",
        }
    }

    /// Resolves a host locale to a supported language, falling back to English.
    ///
    /// Accepts the host's language names (`German`, `SwissGerman`, ...) as well as
    /// POSIX locale strings such as `de_CH.UTF-8`.
    pub fn from_locale(locale: &str) -> Lang {
        let locale = locale.trim();
        match locale {
            "German" | "SwissGerman" => return Lang::De,
            "French" => return Lang::Fr,
            "Italian" => return Lang::It,
            "Romansh" => return Lang::Rm,
            "English" => return Lang::En,
            _ => {}
        }
        locale
            .get(..2)
            .filter(|_| {
                locale.len() == 2 || matches!(locale.as_bytes()[2], b'_' | b'-' | b'.')
            })
            .and_then(|prefix| prefix.to_ascii_lowercase().parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "de" => Ok(Lang::De),
            "fr" => Ok(Lang::Fr),
            "it" => Ok(Lang::It),
            "rm" => Ok(Lang::Rm),
            "en" => Ok(Lang::En),
            other => Err(format!("unsupported language '{other}'")),
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Swiss reference frames the service can return geometries in.
#[derive(Debug, ValueEnum, Clone, Copy, Default, PartialEq, Eq)]
pub enum Crs {
    /// CH1903+ / LV95
    #[default]
    #[value(name = "2056")]
    Lv95,
    /// CH1903 / LV03
    #[value(name = "21781")]
    Lv03,
}

impl Crs {
    pub fn epsg(self) -> u32 {
        match self {
            Crs::Lv95 => 2056,
            Crs::Lv03 => 21781,
        }
    }

    pub fn authid(self) -> String {
        format!("EPSG:{}", self.epsg())
    }
}

impl FromStr for Crs {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches("EPSG:") {
            "2056" => Ok(Crs::Lv95),
            "21781" => Ok(Crs::Lv03),
            other => Err(format!("unsupported coordinate system '{other}'")),
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.epsg())
    }
}

/// A single location search, built per search event and dropped afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    lang: Lang,
    crs: Crs,
}

impl SearchQuery {
    /// Returns `None` for text shorter than [`MIN_SEARCH_CHARS`]; such input never hits the network.
    pub fn new(text: &str, lang: Lang, crs: Crs) -> Option<Self> {
        if text.chars().count() < MIN_SEARCH_CHARS {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            lang,
            crs,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    pub fn url(&self, base: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(base)?;
        url.query_pairs_mut()
            .append_pair("type", "locations")
            .append_pair("searchText", &self.text)
            .append_pair("returnGeometry", "true")
            .append_pair("lang", self.lang.code())
            .append_pair("sr", &self.crs.epsg().to_string());
        Ok(url)
    }
}
