use std::env;

use crate::geoadmin::{Crs, Lang};
use crate::locator::BeautifyOptions;

const LANG_VAR: &str = "SWISS_LOCATOR_LANG";
const CRS_VAR: &str = "SWISS_LOCATOR_CRS";
const REMOVE_LEADING_DIGITS_VAR: &str = "SWISS_LOCATOR_REMOVE_LEADING_DIGITS";
const REPLACE_UNDERSCORE_VAR: &str = "SWISS_LOCATOR_REPLACE_UNDERSCORE";
const BREAK_CAMELCASE_VAR: &str = "SWISS_LOCATOR_BREAK_CAMELCASE";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Filter settings, passed explicitly to the filter instead of read from a global store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    /// Explicit response language; `None` follows the host locale.
    pub lang: Option<Lang>,
    pub crs: Crs,
    pub beautify: BeautifyOptions,
}

impl Settings {
    /// Loads settings from `SWISS_LOCATOR_*` environment variables. Blank values count as unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let lang = get(LANG_VAR)
            .map(|v| v.parse::<Lang>())
            .transpose()
            .map_err(|reason| ConfigError::Invalid {
                var: LANG_VAR,
                reason,
            })?;
        let crs = get(CRS_VAR)
            .map(|v| v.parse::<Crs>())
            .transpose()
            .map_err(|reason| ConfigError::Invalid {
                var: CRS_VAR,
                reason,
            })?
            .unwrap_or_default();

        let flag = |var: &'static str| -> Result<bool, ConfigError> {
            match get(var).as_deref() {
                None => Ok(false),
                Some(v) => parse_flag(v).ok_or_else(|| ConfigError::Invalid {
                    var,
                    reason: format!("expected a boolean, got '{v}'"),
                }),
            }
        };

        Ok(Self {
            lang,
            crs,
            beautify: BeautifyOptions {
                remove_leading_digits: flag(REMOVE_LEADING_DIGITS_VAR)?,
                replace_underscore: flag(REPLACE_UNDERSCORE_VAR)?,
                break_camelcase: flag(BREAK_CAMELCASE_VAR)?,
            },
        })
    }

    /// The configured language, or the one derived from the host locale.
    pub fn effective_lang(&self, locale: &str) -> Lang {
        self.lang.unwrap_or_else(|| Lang::from_locale(locale))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let settings = load(&[]).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.crs, Crs::Lv95);
        assert_eq!(settings.lang, None);
    }

    #[test]
    fn reads_all_variables() {
        let settings = load(&[
            (LANG_VAR, "rm"),
            (CRS_VAR, "21781"),
            (REMOVE_LEADING_DIGITS_VAR, "true"),
            (REPLACE_UNDERSCORE_VAR, "1"),
            (BREAK_CAMELCASE_VAR, "off"),
        ])
        .unwrap();
        assert_eq!(settings.lang, Some(Lang::Rm));
        assert_eq!(settings.crs, Crs::Lv03);
        assert!(settings.beautify.remove_leading_digits);
        assert!(settings.beautify.replace_underscore);
        assert!(!settings.beautify.break_camelcase);
    }

    #[test]
    fn blank_values_are_unset() {
        let settings = load(&[(LANG_VAR, "  "), (CRS_VAR, "")]).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = load(&[(CRS_VAR, "4326")]).unwrap_err();
        assert!(err.to_string().starts_with(CRS_VAR), "got: {err}");

        let err = load(&[(BREAK_CAMELCASE_VAR, "maybe")]).unwrap_err();
        assert!(err.to_string().contains("maybe"), "got: {err}");
    }

    #[test]
    fn effective_lang_prefers_configured_value() {
        let configured = Settings {
            lang: Some(Lang::It),
            ..Default::default()
        };
        assert_eq!(configured.effective_lang("German"), Lang::It);
        assert_eq!(Settings::default().effective_lang("German"), Lang::De);
        assert_eq!(Settings::default().effective_lang(""), Lang::En);
    }
}
