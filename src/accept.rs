//! `Accept` header parsing.
//!
//! Entries that fail to parse are dropped rather than failing the request. The
//! remaining ranges, `q=0` included, are ordered by descending quality; the sort
//! is stable so header order decides between equal weights.

use crate::media_type::{split_unquoted, MediaTypePattern};
use tracing::trace;

/// A parsed, quality-ordered `Accept` header.
#[derive(Debug, Clone, Default)]
pub struct AcceptHeader {
    media_types: Vec<MediaTypePattern>,
}

impl AcceptHeader {
    /// Parse a single header value.
    ///
    /// ```rust
    /// use produces_router::AcceptHeader;
    ///
    /// let accept = AcceptHeader::parse("text/plain, image/*;q=0.9, application/xml;q=0.8");
    /// let ordered: Vec<String> = accept.iter().map(ToString::to_string).collect();
    /// assert_eq!(ordered, ["text/plain", "image/*", "application/xml"]);
    /// ```
    #[must_use]
    pub fn parse(header: &str) -> Self {
        Self::parse_values(std::iter::once(header))
    }

    /// Parse several header lines as one list, in the order they were received.
    pub fn parse_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut media_types: Vec<MediaTypePattern> = values
            .into_iter()
            .flat_map(|value| split_unquoted(value, ','))
            .filter(|entry| !entry.trim().is_empty())
            .filter_map(|entry| match MediaTypePattern::parse(entry) {
                Ok(media_type) => Some(media_type),
                Err(err) => {
                    trace!(entry = %entry.trim(), error = %err, "Dropping malformed Accept entry");
                    None
                }
            })
            .collect();

        // Vec::sort_by is stable: equal qualities keep header order.
        media_types.sort_by(|a, b| b.effective_quality().total_cmp(&a.effective_quality()));

        Self { media_types }
    }

    /// An empty header.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Ranges ordered by preference.
    #[must_use]
    pub fn media_types(&self) -> &[MediaTypePattern] {
        &self.media_types
    }

    /// Iterate ranges in preference order.
    pub fn iter(&self) -> std::slice::Iter<'_, MediaTypePattern> {
        self.media_types.iter()
    }

    /// Whether nothing usable was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.media_types.is_empty()
    }

    /// Number of usable ranges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.media_types.len()
    }
}

impl<'a> IntoIterator for &'a AcceptHeader {
    type Item = &'a MediaTypePattern;
    type IntoIter = std::slice::Iter<'a, MediaTypePattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
