//! # Matcher Policies
//!
//! The capability contract a host router uses to plug content negotiation into
//! its own candidate selection.
//!
//! ## Overview
//!
//! A host typically runs several policies over one candidate set in ascending
//! [`NodeBuilderPolicy::order`]: method matching, request body type matching,
//! then response content type matching. Each applicable policy partitions the set
//! into edges and builds a table that is consulted per request.
//!
//! ## Usage
//!
//! ```rust
//! use http::Method;
//! use produces_router::{CandidateSet, HandlerMeta, NegotiationConfig, ProducesDeclaration, ProducesPolicy};
//! use std::sync::Arc;
//!
//! let json = HandlerMeta::new("orders_json", Method::GET, "/orders")
//!     .with_produces(ProducesDeclaration::new(["application/json"]).unwrap());
//! let html = HandlerMeta::new("orders_html", Method::GET, "/orders")
//!     .with_produces(ProducesDeclaration::new(["text/html"]).unwrap());
//! let candidates = CandidateSet::new(Method::GET, "/orders", vec![Arc::new(json), Arc::new(html)]);
//!
//! let policy = ProducesPolicy::new(Arc::new(NegotiationConfig::default()));
//! let table = policy.table_for(&candidates).unwrap();
//!
//! let request = http::Request::get("/orders?$format=json").body(()).unwrap();
//! let selection = table.negotiate(&request).unwrap();
//! assert_eq!(&*selection.handler().unwrap().name, "orders_json");
//! ```

use crate::comparator;
use crate::config::NegotiationConfig;
use crate::edges::{self, Edge};
use crate::routes::{CandidateSet, HandlerMeta};
use crate::table::{self, NegotiationTable};
use std::cmp::Ordering;
use std::sync::Arc;

/// Builds a decision node for candidate sets it applies to.
pub trait NodeBuilderPolicy {
    /// Position among the host's policies; lower runs first.
    fn order(&self) -> i32;

    fn applies_to(&self, candidates: &CandidateSet) -> bool;

    fn edges(&self, candidates: &CandidateSet) -> Vec<Edge>;

    fn build_table(&self, edges: Vec<Edge>) -> NegotiationTable;
}

/// Contributes a tie-break to the host's endpoint ordering.
pub trait EndpointComparerPolicy {
    fn compare(&self, a: &HandlerMeta, b: &HandlerMeta) -> Ordering;
}

/// Response content type negotiation.
#[derive(Debug, Clone, Default)]
pub struct ProducesPolicy {
    config: Arc<NegotiationConfig>,
}

impl ProducesPolicy {
    /// Runs after method and request-body policies, which use orders `<= 0`.
    pub const ORDER: i32 = 1;

    #[must_use]
    pub fn new(config: Arc<NegotiationConfig>) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &Arc<NegotiationConfig> {
        &self.config
    }

    /// Edges and table in one step, or `None` when nothing is declared.
    #[must_use]
    pub fn table_for(&self, candidates: &CandidateSet) -> Option<NegotiationTable> {
        if !self.applies_to(candidates) {
            return None;
        }
        Some(self.build_table(self.edges(candidates)))
    }
}

impl NodeBuilderPolicy for ProducesPolicy {
    fn order(&self) -> i32 {
        Self::ORDER
    }

    fn applies_to(&self, candidates: &CandidateSet) -> bool {
        edges::applies_to(candidates)
    }

    fn edges(&self, candidates: &CandidateSet) -> Vec<Edge> {
        edges::build_edges(candidates)
    }

    fn build_table(&self, edges: Vec<Edge>) -> NegotiationTable {
        table::build_table(edges, Arc::clone(&self.config))
    }
}

impl EndpointComparerPolicy for ProducesPolicy {
    fn compare(&self, a: &HandlerMeta, b: &HandlerMeta) -> Ordering {
        comparator::compare(a, b)
    }
}
