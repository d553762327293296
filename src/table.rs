//! # Negotiation Table
//!
//! Edges ordered from most to least specific, built once per candidate set and
//! shared read-only between requests.
//!
//! ## Specificity
//!
//! | Pattern | Rank |
//! |---|---|
//! | `type/subtype` | 1 |
//! | `type/*+suffix` | 2 |
//! | `type/*` | 3 |
//! | `*/*` | 4 |
//!
//! Equal ranks keep discovery order, which follows handler registration order.
//! The `*/*` entry is the escape destination used for 406 responses.

use crate::config::NegotiationConfig;
use crate::edges::{Edge, EdgeTarget};
use crate::error::NegotiationError;
use crate::media_type::MediaTypePattern;
use crate::negotiator::{self, NegotiationRequest};
use crate::routes::HandlerRef;
use std::sync::Arc;
use tracing::{info, warn};

/// Rank a pattern: lower is more specific.
#[inline]
#[must_use]
pub fn specificity_rank(media_type: &MediaTypePattern) -> u8 {
    if media_type.matches_all_types() {
        4
    } else if media_type.matches_all_subtypes() {
        3
    } else if media_type.matches_all_subtypes_without_suffix() {
        2
    } else {
        1
    }
}

/// One row of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableEntry {
    pub media_type: MediaTypePattern,
    /// Index of the edge in discovery order
    pub destination: usize,
}

/// Immutable, specificity-ordered decision table for one candidate set.
#[derive(Debug, Clone)]
pub struct NegotiationTable {
    entries: Vec<TableEntry>,
    escape_destination: usize,
    edges: Vec<Edge>,
    config: Arc<NegotiationConfig>,
}

impl NegotiationTable {
    /// Sorted entries, most specific first.
    #[must_use]
    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    /// Destination of the `*/*` edge.
    #[must_use]
    pub fn escape_destination(&self) -> usize {
        self.escape_destination
    }

    /// Edges in discovery order; a destination indexes into this slice.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub fn edge(&self, destination: usize) -> Option<&Edge> {
        self.edges.get(destination)
    }

    #[must_use]
    pub fn config(&self) -> &NegotiationConfig {
        &self.config
    }

    /// Only one destination exists, so no request inspection is needed.
    #[must_use]
    pub fn is_single_destination(&self) -> bool {
        self.entries.len() == 1
    }

    /// Pick the destination for a request. See [`negotiator::negotiate`].
    pub fn negotiate<R>(&self, request: &R) -> Result<Selection<'_>, NegotiationError>
    where
        R: NegotiationRequest + ?Sized,
    {
        negotiator::negotiate(self, request)
    }

    pub(crate) fn selection(&self, destination: usize) -> Selection<'_> {
        Selection {
            destination,
            edge: &self.edges[destination],
        }
    }
}

/// The outcome of negotiating one request.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'t> {
    destination: usize,
    edge: &'t Edge,
}

impl<'t> Selection<'t> {
    #[must_use]
    pub fn destination(&self) -> usize {
        self.destination
    }

    #[must_use]
    pub fn edge(&self) -> &'t Edge {
        self.edge
    }

    /// Whether the host should answer `406 Not Acceptable`.
    #[must_use]
    pub fn is_not_acceptable(&self) -> bool {
        self.edge.is_reject()
    }

    /// First handler on the selected edge.
    #[must_use]
    pub fn handler(&self) -> Option<&'t HandlerRef> {
        self.edge.targets().iter().find_map(EdgeTarget::handler)
    }

    /// All handlers on the selected edge, for hosts that disambiguate further.
    pub fn handlers(&self) -> impl Iterator<Item = &'t HandlerRef> {
        self.edge.handlers()
    }
}

/// Order edges by specificity and designate the `*/*` edge as the escape.
///
/// Destinations are the edges' positions in `edges`. If the input has no `*/*`
/// edge, a reject edge is appended so the escape always exists.
#[must_use]
pub fn build_table(mut edges: Vec<Edge>, config: Arc<NegotiationConfig>) -> NegotiationTable {
    if !edges.iter().any(Edge::is_universal) {
        warn!("Edge list has no */* edge; appending a 406 edge");
        edges.push(Edge::reject());
    }

    let mut entries: Vec<TableEntry> = edges
        .iter()
        .enumerate()
        .map(|(destination, edge)| TableEntry {
            media_type: edge.media_type().clone(),
            destination,
        })
        .collect();
    // sort_by_key is stable
    entries.sort_by_key(|e| specificity_rank(&e.media_type));

    // first all-types entry in specificity order
    let escape_destination = entries
        .iter()
        .find(|e| e.media_type.matches_all_types())
        .map_or(edges.len() - 1, |e| e.destination);

    info!(
        entries = entries.len(),
        escape_destination,
        order = ?entries
            .iter()
            .map(|e| edges[e.destination].pattern())
            .collect::<Vec<_>>(),
        "Negotiation table built"
    );

    NegotiationTable {
        entries,
        escape_destination,
        edges,
        config,
    }
}
