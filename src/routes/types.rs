use crate::config::NegotiationConfig;
use crate::declaration::ProducesDeclaration;
use crate::media_type::MediaTypePattern;
use http::Method;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared handle to a registered handler.
pub type HandlerRef = Arc<HandlerMeta>;

/// A registered handler after declaration resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerMeta {
    pub name: Arc<str>,
    pub method: Method,
    pub path: String,
    /// Group (controller) the handler was declared in, if any
    pub group: Option<Arc<str>>,
    /// Active content-type declaration, already resolved against the group
    pub produces: Option<ProducesDeclaration>,
}

impl HandlerMeta {
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, method: Method, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            path: path.into(),
            group: None,
            produces: None,
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<Arc<str>>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn with_produces(mut self, produces: ProducesDeclaration) -> Self {
        self.produces = Some(produces);
        self
    }

    /// Declared content-type strings; empty when nothing is declared.
    #[must_use]
    pub fn content_types(&self) -> &[String] {
        self.produces
            .as_ref()
            .map_or(&[], ProducesDeclaration::content_types)
    }

    /// Parsed declared ranges; empty when nothing is declared.
    #[must_use]
    pub fn declared_patterns(&self) -> &[MediaTypePattern] {
        self.produces
            .as_ref()
            .map_or(&[], ProducesDeclaration::patterns)
    }

    /// Whether the handler constrains its response content types at all.
    ///
    /// An explicitly empty declaration counts as unconstrained.
    #[inline]
    #[must_use]
    pub fn has_declared_content_types(&self) -> bool {
        self.produces.as_ref().is_some_and(|p| !p.is_empty())
    }
}

/// Every handler that could serve one method + path, in registration order.
///
/// Built once per route and immutable afterwards.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    method: Method,
    path: String,
    handlers: Vec<HandlerRef>,
}

impl CandidateSet {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>, handlers: Vec<HandlerRef>) -> Self {
        Self {
            method,
            path: path.into(),
            handlers,
        }
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn handlers(&self) -> &[HandlerRef] {
        &self.handlers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Root of a route declaration file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RouteFile {
    /// Negotiation settings applied to every route in the file
    pub negotiation: NegotiationConfig,
    /// Handlers declared inside a group
    pub groups: Vec<GroupDef>,
    /// Handlers without a group
    pub handlers: Vec<HandlerDef>,
}

impl RouteFile {
    /// Every handler definition with its group, in file order (groups first).
    pub fn iter_handlers(&self) -> impl Iterator<Item = (Option<&GroupDef>, &HandlerDef)> {
        self.groups
            .iter()
            .flat_map(|group| group.handlers.iter().map(move |h| (Some(group), h)))
            .chain(self.handlers.iter().map(|h| (None, h)))
    }
}

/// A group (controller) of handlers sharing an optional declaration.
///
/// Content types stay as raw strings here so the linter can report bad entries
/// individually; they are validated in [`crate::routes::build_handlers`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GroupDef {
    pub name: String,
    #[serde(default)]
    pub produces: Option<Vec<String>>,
    #[serde(default)]
    pub handlers: Vec<HandlerDef>,
}

/// A single handler declaration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HandlerDef {
    pub name: String,
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub produces: Option<Vec<String>>,
}
