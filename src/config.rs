//! # Negotiation Configuration
//!
//! Settings that shape how the client's preferences are computed and what happens
//! when nothing matches.
//!
//! ## Sources
//!
//! 1. Defaults ([`NegotiationConfig::default`])
//! 2. The `negotiation:` section of a route file (serde, every field optional)
//! 3. Environment overrides ([`NegotiationConfig::apply_env`])
//!
//! ## Environment Variables
//!
//! | Variable | Field |
//! |---|---|
//! | `PRODUCES_FORMAT_PARAMETER` | `format_parameter` |
//! | `PRODUCES_RESPECT_BROWSER_ACCEPT_HEADER` | `respect_browser_accept_header` |
//! | `PRODUCES_RETURN_HTTP_NOT_ACCEPTABLE` | `return_http_not_acceptable` |
//!
//! Booleans accept `true`/`false`/`1`/`0`. Unparseable values are ignored with a
//! warning and the previous value is kept.

use crate::media_type::MediaTypePattern;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use tracing::warn;

/// Query parameter that overrides the `Accept` header by default.
pub const DEFAULT_FORMAT_PARAMETER: &str = "$format";

pub const ENV_FORMAT_PARAMETER: &str = "PRODUCES_FORMAT_PARAMETER";
pub const ENV_RESPECT_BROWSER_ACCEPT_HEADER: &str = "PRODUCES_RESPECT_BROWSER_ACCEPT_HEADER";
pub const ENV_RETURN_HTTP_NOT_ACCEPTABLE: &str = "PRODUCES_RETURN_HTTP_NOT_ACCEPTABLE";

/// Case-insensitive map from `$format` values to media types.
///
/// Keys are stored lower-cased. [`FormatMappings::iter`] yields them in insertion
/// order; serialized output is sorted by key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, MediaTypePattern>", into = "BTreeMap<String, MediaTypePattern>")]
pub struct FormatMappings {
    entries: Vec<(String, MediaTypePattern)>,
}

impl FormatMappings {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace a mapping.
    pub fn insert(&mut self, key: &str, media_type: MediaTypePattern) {
        let key = key.trim().to_ascii_lowercase();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = media_type,
            None => self.entries.push((key, media_type)),
        }
    }

    /// Look up a format name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MediaTypePattern> {
        let key = key.trim();
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MediaTypePattern)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FormatMappings {
    fn default() -> Self {
        let mut mappings = Self::empty();
        mappings.insert("html", text_html());
        mappings.insert("json", application_json());
        mappings
    }
}

impl From<BTreeMap<String, MediaTypePattern>> for FormatMappings {
    /// Mappings given in a route file extend the defaults rather than replace them.
    fn from(value: BTreeMap<String, MediaTypePattern>) -> Self {
        let mut mappings = Self::default();
        for (key, media_type) in value {
            mappings.insert(&key, media_type);
        }
        mappings
    }
}

impl From<FormatMappings> for BTreeMap<String, MediaTypePattern> {
    fn from(value: FormatMappings) -> Self {
        value.entries.into_iter().collect()
    }
}

/// How client preferences are computed and how misses are resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegotiationConfig {
    /// Query parameter that overrides `Accept` (e.g. `?$format=json`)
    pub format_parameter: String,
    /// Values accepted for [`format_parameter`](Self::format_parameter)
    pub format_mappings: FormatMappings,
    /// Preference list used instead of a bare `*/*` or a missing `Accept`
    pub default_content_types: Vec<MediaTypePattern>,
    /// Treat `*/*` in `Accept` literally instead of substituting the defaults
    pub respect_browser_accept_header: bool,
    /// Answer unmatched requests with the 406 escape instead of the first entry
    pub return_http_not_acceptable: bool,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            format_parameter: DEFAULT_FORMAT_PARAMETER.to_string(),
            format_mappings: FormatMappings::default(),
            default_content_types: vec![text_html(), application_json()],
            respect_browser_accept_header: false,
            return_http_not_acceptable: false,
        }
    }
}

impl NegotiationConfig {
    /// Defaults overlaid with environment overrides.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay environment overrides onto this configuration.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    pub(crate) fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(param) = lookup(ENV_FORMAT_PARAMETER) {
            let param = param.trim();
            if param.is_empty() {
                warn!(variable = ENV_FORMAT_PARAMETER, "Ignoring empty override");
            } else {
                self.format_parameter = param.to_string();
            }
        }
        if let Some(value) = lookup(ENV_RESPECT_BROWSER_ACCEPT_HEADER) {
            match parse_bool(&value) {
                Some(flag) => self.respect_browser_accept_header = flag,
                None => warn!(
                    variable = ENV_RESPECT_BROWSER_ACCEPT_HEADER,
                    value = %value,
                    "Ignoring invalid boolean override"
                ),
            }
        }
        if let Some(value) = lookup(ENV_RETURN_HTTP_NOT_ACCEPTABLE) {
            match parse_bool(&value) {
                Some(flag) => self.return_http_not_acceptable = flag,
                None => warn!(
                    variable = ENV_RETURN_HTTP_NOT_ACCEPTABLE,
                    value = %value,
                    "Ignoring invalid boolean override"
                ),
            }
        }
    }

    #[must_use]
    pub fn with_format_parameter(mut self, name: impl Into<String>) -> Self {
        self.format_parameter = name.into();
        self
    }

    #[must_use]
    pub fn with_format_mapping(mut self, key: &str, media_type: MediaTypePattern) -> Self {
        self.format_mappings.insert(key, media_type);
        self
    }

    #[must_use]
    pub fn with_default_content_types(mut self, defaults: Vec<MediaTypePattern>) -> Self {
        self.default_content_types = defaults;
        self
    }

    #[must_use]
    pub fn with_respect_browser_accept_header(mut self, respect: bool) -> Self {
        self.respect_browser_accept_header = respect;
        self
    }

    #[must_use]
    pub fn with_return_http_not_acceptable(mut self, reject: bool) -> Self {
        self.return_http_not_acceptable = reject;
        self
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn text_html() -> MediaTypePattern {
    MediaTypePattern::parse("text/html").unwrap_or_else(|_| MediaTypePattern::any())
}

fn application_json() -> MediaTypePattern {
    MediaTypePattern::parse("application/json").unwrap_or_else(|_| MediaTypePattern::any())
}
