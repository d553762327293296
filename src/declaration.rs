//! Response content-type declarations and the resolver that picks the active one.
//!
//! A handler may declare the content types it produces, and so may the group
//! (controller) it belongs to. The handler's own declaration replaces the group's
//! outright; the two are never merged.

use crate::error::MediaTypeError;
use crate::media_type::MediaTypePattern;
use serde::{Deserialize, Serialize};

/// Ordered content types a handler or group advertises.
///
/// The raw strings are kept verbatim (they become edge keys) alongside their
/// parsed form. First-declared is the most preferred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ProducesDeclaration {
    content_types: Vec<String>,
    patterns: Vec<MediaTypePattern>,
}

impl ProducesDeclaration {
    /// Build a declaration, validating every entry.
    pub fn new<I, S>(content_types: I) -> Result<Self, MediaTypeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let content_types: Vec<String> = content_types
            .into_iter()
            .map(|ct| ct.into().trim().to_string())
            .collect();
        let patterns = content_types
            .iter()
            .map(|ct| MediaTypePattern::parse(ct))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            content_types,
            patterns,
        })
    }

    /// A declaration with no content types.
    ///
    /// Treated as "no declaration" when building edges and comparing priority.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            content_types: Vec::new(),
            patterns: Vec::new(),
        }
    }

    /// Declared strings, in declaration order.
    #[must_use]
    pub fn content_types(&self) -> &[String] {
        &self.content_types
    }

    /// Parsed ranges, index-aligned with [`content_types`](Self::content_types).
    #[must_use]
    pub fn patterns(&self) -> &[MediaTypePattern] {
        &self.patterns
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content_types.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.content_types.len()
    }
}

impl TryFrom<Vec<String>> for ProducesDeclaration {
    type Error = MediaTypeError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProducesDeclaration> for Vec<String> {
    fn from(value: ProducesDeclaration) -> Self {
        value.content_types
    }
}

/// The two places a declaration can come from for one handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclarationSources<'a> {
    /// Declared on the handler (action) itself
    pub handler: Option<&'a ProducesDeclaration>,
    /// Declared on the enclosing group (controller)
    pub group: Option<&'a ProducesDeclaration>,
}

impl<'a> DeclarationSources<'a> {
    /// Pick the active declaration: handler first, then group, else none.
    #[must_use]
    pub fn resolve(&self) -> Option<&'a ProducesDeclaration> {
        self.handler.or(self.group)
    }
}

/// Free-function form of [`DeclarationSources::resolve`].
#[must_use]
pub fn resolve<'a>(
    handler: Option<&'a ProducesDeclaration>,
    group: Option<&'a ProducesDeclaration>,
) -> Option<&'a ProducesDeclaration> {
    DeclarationSources { handler, group }.resolve()
}
