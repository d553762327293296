//! # Negotiation Registry
//!
//! Per-route negotiation tables published behind a lock-free pointer.
//!
//! ## Overview
//!
//! The registry groups handlers into candidate sets by method and path, runs
//! [`ProducesPolicy`] over each, and keeps the tables for sets the policy applies
//! to. Request threads call [`NegotiationRegistry::select`], which loads the
//! current snapshot without locking.
//!
//! [`NegotiationRegistry::reload`] builds a complete new snapshot first and then
//! swaps it in. Requests already holding the old snapshot finish against it.
//!
//! ## Usage
//!
//! ```rust
//! use http::Method;
//! use produces_router::{HandlerMeta, NegotiationConfig, NegotiationRegistry, ProducesDeclaration};
//! use std::sync::Arc;
//!
//! let registry = NegotiationRegistry::from_handlers(
//!     NegotiationConfig::default(),
//!     vec![
//!         Arc::new(HandlerMeta::new("pets_json", Method::GET, "/pets")
//!             .with_produces(ProducesDeclaration::new(["application/json"]).unwrap())),
//!         Arc::new(HandlerMeta::new("pets_page", Method::GET, "/pets")
//!             .with_produces(ProducesDeclaration::new(["text/html"]).unwrap())),
//!     ],
//! );
//!
//! let request = http::Request::get("/pets").header("accept", "*/*").body(()).unwrap();
//! let selected = registry.select(&Method::GET, "/pets", &request).unwrap().unwrap();
//! assert_eq!(&*selected.handler().unwrap().name, "pets_page");
//! ```

use crate::config::NegotiationConfig;
use crate::edges::Edge;
use crate::error::NegotiationError;
use crate::negotiator::NegotiationRequest;
use crate::policy::ProducesPolicy;
use crate::routes::{group_candidates, HandlerRef};
use crate::table::NegotiationTable;
use arc_swap::ArcSwap;
use http::Method;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

type RouteTables = HashMap<Method, HashMap<String, Arc<NegotiationTable>>>;

#[derive(Debug, Default)]
struct Snapshot {
    config: Arc<NegotiationConfig>,
    tables: RouteTables,
    /// Negotiated routes in registration order
    routes: Vec<(Method, String)>,
}

impl Snapshot {
    fn build(config: Arc<NegotiationConfig>, handlers: &[HandlerRef]) -> Self {
        let policy = ProducesPolicy::new(Arc::clone(&config));
        let mut tables: RouteTables = HashMap::new();
        let mut routes = Vec::new();
        let mut skipped = 0usize;

        for candidates in group_candidates(handlers) {
            let Some(table) = policy.table_for(&candidates) else {
                skipped += 1;
                continue;
            };
            routes.push((candidates.method().clone(), candidates.path().to_string()));
            tables
                .entry(candidates.method().clone())
                .or_default()
                .insert(candidates.path().to_string(), Arc::new(table));
        }

        info!(
            handlers_count = handlers.len(),
            negotiated_routes = routes.len(),
            skipped_routes = skipped,
            "Negotiation tables built"
        );

        Self {
            config,
            tables,
            routes,
        }
    }
}

/// The result of negotiating one request against a registered route.
///
/// Holds the route's table alive, so it stays valid across a concurrent reload.
#[derive(Debug, Clone)]
pub struct RouteSelection {
    table: Arc<NegotiationTable>,
    destination: usize,
}

impl RouteSelection {
    #[must_use]
    pub fn destination(&self) -> usize {
        self.destination
    }

    #[must_use]
    pub fn table(&self) -> &Arc<NegotiationTable> {
        &self.table
    }

    #[must_use]
    pub fn edge(&self) -> &Edge {
        &self.table.edges()[self.destination]
    }

    /// Whether the host should answer `406 Not Acceptable`.
    #[must_use]
    pub fn is_not_acceptable(&self) -> bool {
        self.edge().is_reject()
    }

    #[must_use]
    pub fn handler(&self) -> Option<&HandlerRef> {
        self.edge().handlers().next()
    }
}

/// Lock-free lookup of negotiation tables by method and path.
#[derive(Debug)]
pub struct NegotiationRegistry {
    snapshot: ArcSwap<Snapshot>,
}

impl Default for NegotiationRegistry {
    fn default() -> Self {
        Self::new(NegotiationConfig::default())
    }
}

impl NegotiationRegistry {
    /// An empty registry; every lookup returns `None` until [`reload`](Self::reload).
    #[must_use]
    pub fn new(config: NegotiationConfig) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(Snapshot {
                config: Arc::new(config),
                ..Snapshot::default()
            }),
        }
    }

    #[must_use]
    pub fn from_handlers(config: NegotiationConfig, handlers: Vec<HandlerRef>) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(Snapshot::build(Arc::new(config), &handlers)),
        }
    }

    /// Rebuild every table with the current configuration.
    pub fn reload(&self, handlers: &[HandlerRef]) {
        let config = Arc::clone(&self.snapshot.load().config);
        self.snapshot.store(Arc::new(Snapshot::build(config, handlers)));
    }

    /// Rebuild every table with a new configuration.
    pub fn reload_with_config(&self, config: NegotiationConfig, handlers: &[HandlerRef]) {
        self.snapshot
            .store(Arc::new(Snapshot::build(Arc::new(config), handlers)));
    }

    #[must_use]
    pub fn config(&self) -> Arc<NegotiationConfig> {
        Arc::clone(&self.snapshot.load().config)
    }

    /// Table for a route, or `None` when the route is not negotiated.
    #[must_use]
    pub fn table(&self, method: &Method, path: &str) -> Option<Arc<NegotiationTable>> {
        self.snapshot
            .load()
            .tables
            .get(method)
            .and_then(|by_path| by_path.get(path))
            .cloned()
    }

    /// Negotiated routes in registration order.
    #[must_use]
    pub fn routes(&self) -> Vec<(Method, String)> {
        self.snapshot.load().routes.clone()
    }

    /// Negotiate a request for a route.
    ///
    /// `Ok(None)` means the route has no declared content types and the host keeps
    /// its own selection.
    pub fn select<R>(
        &self,
        method: &Method,
        path: &str,
        request: &R,
    ) -> Result<Option<RouteSelection>, NegotiationError>
    where
        R: NegotiationRequest + ?Sized,
    {
        let Some(table) = self.table(method, path) else {
            debug!(method = %method, path = %path, "Route not negotiated");
            return Ok(None);
        };
        let destination = table.negotiate(request)?.destination();
        Ok(Some(RouteSelection { table, destination }))
    }
}
