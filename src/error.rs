//! Error types shared across the negotiation engine.
//!
//! Build-time problems (malformed declarations, broken route files) and the one
//! request-time failure, [`NegotiationError::AmbiguousMatch`], are kept apart so a
//! host can treat the latter as a 500-class route misconfiguration while the
//! former abort startup.

use std::fmt;

/// A content-type string could not be parsed into a [`crate::MediaTypePattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaTypeError {
    /// The input was empty or whitespace only
    Empty,
    /// No `/` separating type and subtype
    MissingSubtype {
        /// The rejected input
        input: String,
    },
    /// A type, subtype, suffix or parameter name contains characters outside the token grammar
    InvalidToken {
        /// The rejected input
        input: String,
    },
    /// `*/concrete` is not a valid range; a wildcard type needs a wildcard subtype
    WildcardTypeWithConcreteSubtype {
        /// The rejected input
        input: String,
    },
    /// A parameter is not of the form `name=value`
    InvalidParameter {
        /// The rejected input
        input: String,
    },
    /// The `q` parameter is not a number in `[0, 1]`
    InvalidQuality {
        /// The rejected input
        input: String,
    },
}

impl fmt::Display for MediaTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaTypeError::Empty => write!(f, "media type is empty"),
            MediaTypeError::MissingSubtype { input } => {
                write!(f, "media type '{input}' has no subtype (expected type/subtype)")
            }
            MediaTypeError::InvalidToken { input } => {
                write!(f, "media type '{input}' contains an invalid token")
            }
            MediaTypeError::WildcardTypeWithConcreteSubtype { input } => {
                write!(
                    f,
                    "media type '{input}' uses a wildcard type with a concrete subtype; only */* is allowed"
                )
            }
            MediaTypeError::InvalidParameter { input } => {
                write!(f, "media type '{input}' has a malformed parameter (expected name=value)")
            }
            MediaTypeError::InvalidQuality { input } => {
                write!(f, "media type '{input}' has a quality outside 0..=1")
            }
        }
    }
}

impl std::error::Error for MediaTypeError {}

/// Request-time negotiation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NegotiationError {
    /// More than one table entry is a subset of the same acceptable media type.
    ///
    /// The route declares overlapping content types and neither the client nor the
    /// specificity order can pick one.
    AmbiguousMatch {
        /// The acceptable media type that matched several entries
        media_type: String,
        /// Destinations of every matching entry, in table order
        destinations: Vec<usize>,
    },
}

impl fmt::Display for NegotiationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NegotiationError::AmbiguousMatch {
                media_type,
                destinations,
            } => write!(
                f,
                "The request matched multiple endpoints for the media type {media_type} (destinations {destinations:?})"
            ),
        }
    }
}

impl std::error::Error for NegotiationError {}

/// A route declaration could not be turned into handler metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The HTTP method is not recognised
    UnknownMethod {
        /// Handler that declared it
        handler: String,
        /// The rejected method string
        method: String,
    },
    /// A declared content type failed to parse
    InvalidContentType {
        /// Handler (or group) that declared it
        owner: String,
        /// Underlying parse failure
        source: MediaTypeError,
    },
    /// Two handlers share a name
    DuplicateHandler {
        /// The repeated name
        name: String,
    },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::UnknownMethod { handler, method } => {
                write!(f, "handler '{handler}' uses unknown HTTP method '{method}'")
            }
            RouteError::InvalidContentType { owner, source } => {
                write!(f, "'{owner}' declares an invalid content type: {source}")
            }
            RouteError::DuplicateHandler { name } => {
                write!(f, "handler name '{name}' is declared more than once")
            }
        }
    }
}

impl std::error::Error for RouteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RouteError::InvalidContentType { source, .. } => Some(source),
            _ => None,
        }
    }
}
