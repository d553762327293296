//! # Media Type Module
//!
//! Parsing and comparison of content-type ranges such as `application/json`,
//! `text/*`, `application/*+json` or `*/*`, with optional parameters and a
//! quality weight.
//!
//! The central operation is [`MediaTypePattern::is_subset_of`]: every concrete
//! content type matched by `self` is also matched by the argument. Negotiation
//! asks "is this declared edge a subset of what the client accepts?", and edge
//! building asks "is this edge a subset of what the handler produces?".
//!
//! ```rust
//! use produces_router::MediaTypePattern;
//!
//! let json: MediaTypePattern = "application/json".parse().unwrap();
//! let any_app: MediaTypePattern = "application/*".parse().unwrap();
//! assert!(json.is_subset_of(&any_app));
//! assert!(!any_app.is_subset_of(&json));
//! ```

use crate::error::MediaTypeError;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Universal wildcard range.
pub const ANY_CONTENT_TYPE: &str = "*/*";

/// A parsed `type/subtype[+suffix][;params]` range.
///
/// Type, subtype, suffix and parameter names are stored lower-cased; comparisons
/// are therefore case-insensitive. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MediaTypePattern {
    main_type: String,
    subtype: String,
    suffix: Option<String>,
    parameters: Vec<(String, String)>,
    quality: Option<f64>,
}

impl MediaTypePattern {
    /// Parse a media range.
    ///
    /// `q` is lifted out of the parameter list into [`quality`](Self::quality).
    pub fn parse(input: &str) -> Result<Self, MediaTypeError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(MediaTypeError::Empty);
        }

        let segments = split_unquoted(trimmed, ';');
        let essence = segments[0].trim();
        let (main_type, subtype) =
            essence
                .split_once('/')
                .ok_or_else(|| MediaTypeError::MissingSubtype {
                    input: trimmed.to_string(),
                })?;
        let main_type = main_type.trim().to_ascii_lowercase();
        let subtype = subtype.trim().to_ascii_lowercase();

        if !is_token(&main_type) || !is_token(&subtype) {
            return Err(MediaTypeError::InvalidToken {
                input: trimmed.to_string(),
            });
        }
        if main_type == "*" && subtype != "*" {
            return Err(MediaTypeError::WildcardTypeWithConcreteSubtype {
                input: trimmed.to_string(),
            });
        }

        let suffix = match subtype.rsplit_once('+') {
            Some((base, suffix)) => {
                if base.is_empty() || suffix.is_empty() {
                    return Err(MediaTypeError::InvalidToken {
                        input: trimmed.to_string(),
                    });
                }
                Some(suffix.to_string())
            }
            None => None,
        };

        let mut parameters = Vec::new();
        let mut quality = None;
        for segment in segments.iter().skip(1) {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let (name, value) =
                segment
                    .split_once('=')
                    .ok_or_else(|| MediaTypeError::InvalidParameter {
                        input: trimmed.to_string(),
                    })?;
            let name = name.trim().to_ascii_lowercase();
            if !is_token(&name) {
                return Err(MediaTypeError::InvalidParameter {
                    input: trimmed.to_string(),
                });
            }
            let value = unquote(value.trim());

            // everything after q is an accept-extension and takes no part in matching
            if quality.is_some() {
                continue;
            }
            if name == "q" {
                let q: f64 = value.parse().map_err(|_| MediaTypeError::InvalidQuality {
                    input: trimmed.to_string(),
                })?;
                if !(0.0..=1.0).contains(&q) {
                    return Err(MediaTypeError::InvalidQuality {
                        input: trimmed.to_string(),
                    });
                }
                quality = Some(q);
            } else {
                parameters.push((name, value));
            }
        }

        Ok(Self {
            main_type,
            subtype,
            suffix,
            parameters,
            quality,
        })
    }

    /// The `*/*` range.
    #[must_use]
    pub fn any() -> Self {
        Self {
            main_type: "*".to_string(),
            subtype: "*".to_string(),
            suffix: None,
            parameters: Vec::new(),
            quality: None,
        }
    }

    /// Top-level type (`application` in `application/json`).
    #[must_use]
    pub fn main_type(&self) -> &str {
        &self.main_type
    }

    /// Full subtype including any suffix (`vnd.api+json`).
    #[must_use]
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// Structured syntax suffix (`json` in `vnd.api+json`).
    #[must_use]
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// Subtype with the `+suffix` removed.
    #[must_use]
    pub fn subtype_without_suffix(&self) -> &str {
        match &self.suffix {
            Some(suffix) => &self.subtype[..self.subtype.len() - suffix.len() - 1],
            None => &self.subtype,
        }
    }

    /// Parameters other than `q`, in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// Look up a parameter value by (case-insensitive) name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Explicit quality weight, if one was supplied.
    #[must_use]
    pub fn quality(&self) -> Option<f64> {
        self.quality
    }

    /// Quality weight, defaulting to `1.0`.
    #[inline]
    #[must_use]
    pub fn effective_quality(&self) -> f64 {
        self.quality.unwrap_or(1.0)
    }

    /// `*/*`
    #[inline]
    #[must_use]
    pub fn matches_all_types(&self) -> bool {
        self.main_type == "*"
    }

    /// `type/*`
    #[inline]
    #[must_use]
    pub fn matches_all_subtypes(&self) -> bool {
        self.subtype == "*"
    }

    /// `type/*+suffix`
    #[inline]
    #[must_use]
    pub fn matches_all_subtypes_without_suffix(&self) -> bool {
        self.subtype_without_suffix() == "*"
    }

    /// Whether every content type matched by `self` is also matched by `set`.
    #[must_use]
    pub fn is_subset_of(&self, set: &MediaTypePattern) -> bool {
        self.matches_type(set) && self.matches_subtype(set) && self.contains_all_parameters(set)
    }

    fn matches_type(&self, set: &MediaTypePattern) -> bool {
        set.matches_all_types() || set.main_type == self.main_type
    }

    fn matches_subtype(&self, set: &MediaTypePattern) -> bool {
        if set.matches_all_subtypes() {
            return true;
        }

        match (&set.suffix, &self.suffix) {
            (Some(set_suffix), Some(suffix)) => {
                let base_matches = set.matches_all_subtypes_without_suffix()
                    || set.subtype_without_suffix() == self.subtype_without_suffix();
                base_matches && set_suffix == suffix
            }
            // application/json never satisfies application/*+json
            (Some(_), None) => false,
            // application/vnd.api+json satisfies application/json
            (None, _) => set.subtype == self.subtype || self.suffix.as_deref() == Some(&set.subtype),
        }
    }

    fn contains_all_parameters(&self, set: &MediaTypePattern) -> bool {
        set.parameters.iter().all(|(name, value)| {
            self.parameter(name)
                .is_some_and(|own| own.eq_ignore_ascii_case(value))
        })
    }
}

impl fmt::Display for MediaTypePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.subtype)?;
        for (name, value) in &self.parameters {
            if is_token(value) {
                write!(f, "; {name}={value}")?;
            } else {
                write!(f, "; {name}=\"{}\"", value.replace('"', "\\\""))?;
            }
        }
        Ok(())
    }
}

impl FromStr for MediaTypePattern {
    type Err = MediaTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MediaTypePattern {
    type Error = MediaTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MediaTypePattern> for String {
    fn from(value: MediaTypePattern) -> Self {
        value.to_string()
    }
}

/// Split on `delimiter`, ignoring delimiters inside double-quoted strings.
pub(crate) fn split_unquoted(input: &str, delimiter: char) -> SmallVec<[&str; 4]> {
    let mut parts = SmallVec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;

    for (idx, ch) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                parts.push(&input[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

fn unquote(value: &str) -> String {
    match value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => {
            let mut out = String::with_capacity(inner.len());
            let mut chars = inner.chars();
            while let Some(c) = chars.next() {
                if c == '\\' {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                } else {
                    out.push(c);
                }
            }
            out
        }
        None => value.to_string(),
    }
}

// RFC 9110 tchar
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'!' | b'#'
                        | b'$'
                        | b'%'
                        | b'&'
                        | b'\''
                        | b'*'
                        | b'+'
                        | b'-'
                        | b'.'
                        | b'^'
                        | b'_'
                        | b'`'
                        | b'|'
                        | b'~'
                )
        })
}
