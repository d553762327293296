//! Partitioning a candidate set into content-type edges.
//!
//! An edge is one distinct declared content type together with every candidate
//! that can serve it. The algorithm mirrors how method and consumes policies build
//! their nodes: collect all keys first, then assign handlers, so that edge
//! membership never depends on iteration order.

use crate::media_type::{MediaTypePattern, ANY_CONTENT_TYPE};
use crate::routes::{CandidateSet, HandlerRef};
use std::sync::Arc;
use tracing::debug;

/// What an edge leads to.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeTarget {
    /// A real handler
    Handler(HandlerRef),
    /// Synthesized marker: respond `406 Not Acceptable`
    Reject,
}

impl EdgeTarget {
    #[must_use]
    pub fn is_reject(&self) -> bool {
        matches!(self, EdgeTarget::Reject)
    }

    #[must_use]
    pub fn handler(&self) -> Option<&HandlerRef> {
        match self {
            EdgeTarget::Handler(handler) => Some(handler),
            EdgeTarget::Reject => None,
        }
    }

    /// Display name used in logs and CLI output.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            EdgeTarget::Handler(handler) => &handler.name,
            EdgeTarget::Reject => "HTTP 406 Not Acceptable",
        }
    }
}

/// One content-type key and the candidates that serve it.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pattern: String,
    media_type: MediaTypePattern,
    targets: Vec<EdgeTarget>,
}

impl Edge {
    /// Build an edge directly; the host supplies the targets.
    #[must_use]
    pub fn new(pattern: impl Into<String>, media_type: MediaTypePattern, targets: Vec<EdgeTarget>) -> Self {
        Self {
            pattern: pattern.into(),
            media_type,
            targets,
        }
    }

    /// The `*/*` edge whose sole target is the reject marker.
    #[must_use]
    pub fn reject() -> Self {
        Self::new(ANY_CONTENT_TYPE, MediaTypePattern::any(), vec![EdgeTarget::Reject])
    }

    /// The literal content-type string this edge was keyed on.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn media_type(&self) -> &MediaTypePattern {
        &self.media_type
    }

    #[must_use]
    pub fn targets(&self) -> &[EdgeTarget] {
        &self.targets
    }

    /// Real handlers on this edge, in candidate order.
    pub fn handlers(&self) -> impl Iterator<Item = &HandlerRef> {
        self.targets.iter().filter_map(EdgeTarget::handler)
    }

    /// Whether this is the universal `*/*` edge.
    #[must_use]
    pub fn is_universal(&self) -> bool {
        self.pattern == ANY_CONTENT_TYPE
    }

    /// Whether selecting this edge means answering 406.
    #[must_use]
    pub fn is_reject(&self) -> bool {
        !self.targets.is_empty() && self.targets.iter().all(EdgeTarget::is_reject)
    }
}

/// Whether content negotiation has anything to decide for this candidate set.
///
/// True when at least one candidate declares a non-empty list of content types.
#[must_use]
pub fn applies_to(candidates: &CandidateSet) -> bool {
    candidates
        .handlers()
        .iter()
        .any(|h| h.has_declared_content_types())
}

/// Partition candidates into edges.
///
/// 1. Every distinct declared string (case-insensitive) becomes an edge key;
///    undeclared candidates contribute `*/*`.
/// 2. Undeclared candidates join every edge. Declared candidates join each edge
///    whose pattern is a subset of any of their declared patterns, at most once.
/// 3. If no `*/*` edge exists, a reject edge is appended.
///
/// Edge order is discovery order; handler order within an edge is candidate order.
#[must_use]
pub fn build_edges(candidates: &CandidateSet) -> Vec<Edge> {
    let mut edges: Vec<Edge> = Vec::new();

    for handler in candidates.handlers() {
        if handler.has_declared_content_types() {
            for (literal, pattern) in handler
                .content_types()
                .iter()
                .zip(handler.declared_patterns())
            {
                insert_key(&mut edges, literal, pattern);
            }
        } else {
            insert_key(&mut edges, ANY_CONTENT_TYPE, &MediaTypePattern::any());
        }
    }

    for handler in candidates.handlers() {
        if !handler.has_declared_content_types() {
            for edge in &mut edges {
                edge.targets.push(EdgeTarget::Handler(Arc::clone(handler)));
            }
            continue;
        }

        let declared = handler.declared_patterns();
        for edge in &mut edges {
            // Overlapping declarations (e.g. text/* and text/html) add the handler once.
            if declared.iter().any(|p| edge.media_type.is_subset_of(p)) {
                edge.targets.push(EdgeTarget::Handler(Arc::clone(handler)));
            }
        }
    }

    if !edges.iter().any(Edge::is_universal) {
        edges.push(Edge::reject());
    }

    debug!(
        method = %candidates.method(),
        path = %candidates.path(),
        candidates = candidates.len(),
        edges = ?edges.iter().map(Edge::pattern).collect::<Vec<_>>(),
        "Content-type edges built"
    );

    edges
}

fn insert_key(edges: &mut Vec<Edge>, literal: &str, pattern: &MediaTypePattern) {
    if !edges
        .iter()
        .any(|e| e.pattern.eq_ignore_ascii_case(literal))
    {
        edges.push(Edge::new(literal, pattern.clone(), Vec::new()));
    }
}
