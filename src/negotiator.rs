//! # Request-Time Negotiation
//!
//! Pure functions over a prebuilt [`NegotiationTable`] and one request. Nothing
//! here locks, allocates shared state, or performs I/O, so a single table can be
//! negotiated against concurrently from any number of threads.
//!
//! ## Preference Sources
//!
//! 1. The format query parameter (default `$format`), mapped through
//!    [`FormatMappings`](crate::config::FormatMappings). When present it replaces
//!    `Accept` entirely, even if none of its values map.
//! 2. The `Accept` header, ordered by quality.
//! 3. The configured default list, used when `Accept` is missing or empty, or
//!    when it contains `*/*` and browser headers are not respected.
//!
//! ## Selection
//!
//! Preferences are walked in order. For each one, every table entry that is a
//! subset of it is collected; a single match wins, several matches are an
//! [`NegotiationError::AmbiguousMatch`]. When nothing matches the request falls
//! back to the escape destination (strict mode) or the most specific entry.

use crate::accept::AcceptHeader;
use crate::config::NegotiationConfig;
use crate::error::NegotiationError;
use crate::media_type::MediaTypePattern;
use crate::table::{NegotiationTable, Selection};
use http::header::ACCEPT;
use smallvec::SmallVec;
use std::borrow::Cow;
use tracing::{debug, warn};

/// Read access to the parts of a request that influence negotiation.
pub trait NegotiationRequest {
    /// Every `Accept` header value, in the order received.
    fn accept_values(&self) -> SmallVec<[&str; 2]>;

    /// Raw query string without the leading `?`.
    fn query(&self) -> Option<&str>;
}

impl NegotiationRequest for http::request::Parts {
    fn accept_values(&self) -> SmallVec<[&str; 2]> {
        header_values(&self.headers)
    }

    fn query(&self) -> Option<&str> {
        self.uri.query()
    }
}

impl<B> NegotiationRequest for http::Request<B> {
    fn accept_values(&self) -> SmallVec<[&str; 2]> {
        header_values(self.headers())
    }

    fn query(&self) -> Option<&str> {
        self.uri().query()
    }
}

fn header_values(headers: &http::HeaderMap) -> SmallVec<[&str; 2]> {
    headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect()
}

/// Where the acceptable list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceSource {
    FormatParameter,
    AcceptHeader,
    Defaults,
}

/// The client's acceptable content types, most preferred first.
#[derive(Debug, Clone)]
pub struct Preferences<'c> {
    source: PreferenceSource,
    media_types: SmallVec<[Cow<'c, MediaTypePattern>; 4]>,
}

impl<'c> Preferences<'c> {
    #[must_use]
    pub fn source(&self) -> PreferenceSource {
        self.source
    }

    pub fn iter(&self) -> impl Iterator<Item = &MediaTypePattern> {
        self.media_types.iter().map(|m| &**m)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.media_types.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.media_types.len()
    }

    fn defaults(config: &'c NegotiationConfig) -> Self {
        Self {
            source: PreferenceSource::Defaults,
            media_types: config
                .default_content_types
                .iter()
                .map(Cow::Borrowed)
                .collect(),
        }
    }
}

/// Compute the ordered acceptable content types for a request.
pub fn acceptable_media_types<'c, R>(config: &'c NegotiationConfig, request: &R) -> Preferences<'c>
where
    R: NegotiationRequest + ?Sized,
{
    if let Some(formats) = format_values(config, request) {
        let media_types = formats
            .iter()
            .filter(|value| !value.trim().is_empty())
            .filter_map(|value| {
                let mapped = config.format_mappings.get(value);
                if mapped.is_none() {
                    debug!(format = %value, "Ignoring unmapped format value");
                }
                mapped
            })
            .map(Cow::Borrowed)
            .collect();
        return Preferences {
            source: PreferenceSource::FormatParameter,
            media_types,
        };
    }

    let accept = AcceptHeader::parse_values(request.accept_values());
    if accept.is_empty() {
        return Preferences::defaults(config);
    }
    if !config.respect_browser_accept_header && accept.iter().any(MediaTypePattern::matches_all_types) {
        return Preferences::defaults(config);
    }

    Preferences {
        source: PreferenceSource::AcceptHeader,
        media_types: accept.media_types().iter().cloned().map(Cow::Owned).collect(),
    }
}

/// Values of the format parameter, or `None` when the parameter is absent.
fn format_values<R>(config: &NegotiationConfig, request: &R) -> Option<SmallVec<[String; 1]>>
where
    R: NegotiationRequest + ?Sized,
{
    let query = request.query()?;
    let mut found = false;
    let values: SmallVec<[String; 1]> = url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key.eq_ignore_ascii_case(&config.format_parameter))
        .map(|(_, value)| {
            found = true;
            value.into_owned()
        })
        .collect();
    found.then_some(values)
}

/// Pick the destination for one request.
///
/// Returns the escape destination's [`Selection`] for 406 outcomes; check
/// [`Selection::is_not_acceptable`]. Fails only when a preference matches more
/// than one entry.
pub fn negotiate<'t, R>(table: &'t NegotiationTable, request: &R) -> Result<Selection<'t>, NegotiationError>
where
    R: NegotiationRequest + ?Sized,
{
    let entries = table.entries();
    if let [only] = entries {
        return Ok(table.selection(only.destination));
    }

    let preferences = acceptable_media_types(table.config(), request);

    for acceptable in preferences.iter() {
        let matched: SmallVec<[usize; 2]> = entries
            .iter()
            .filter(|entry| entry.media_type.is_subset_of(acceptable))
            .map(|entry| entry.destination)
            .collect();

        match matched.as_slice() {
            [] => continue,
            [destination] => {
                debug!(
                    source = ?preferences.source(),
                    acceptable = %acceptable,
                    destination,
                    "Content type negotiated"
                );
                return Ok(table.selection(*destination));
            }
            _ => {
                warn!(
                    acceptable = %acceptable,
                    destinations = ?matched,
                    "Ambiguous content type match"
                );
                return Err(NegotiationError::AmbiguousMatch {
                    media_type: acceptable.to_string(),
                    destinations: matched.to_vec(),
                });
            }
        }
    }

    let destination = if table.config().return_http_not_acceptable {
        table.escape_destination()
    } else {
        // build_table always leaves at least the */* entry
        entries.first().map_or(table.escape_destination(), |e| e.destination)
    };
    debug!(
        source = ?preferences.source(),
        preferences = preferences.len(),
        destination,
        strict = table.config().return_http_not_acceptable,
        "No acceptable content type matched; falling back"
    );
    Ok(table.selection(destination))
}
