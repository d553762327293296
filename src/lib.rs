//! # produces-router
//!
//! **produces-router** picks which handler serves a request when several handlers
//! share one method and path but produce different response content types. The
//! choice is driven by the `Accept` header, an optional `$format` query override
//! and per-handler content-type declarations.
//!
//! ## Overview
//!
//! Work is split between build time and request time. When routes are registered,
//! every set of handlers sharing a method and path is partitioned into
//! content-type edges and sorted into an immutable [`NegotiationTable`]. On each
//! request, [`negotiate`] walks the client's preferences against that table with
//! no locking and no I/O.
//!
//! ## Architecture
//!
//! - **[`media_type`]** - Media range parsing and the subset relation
//! - **[`accept`]** - `Accept` header parsing and quality ordering
//! - **[`declaration`]** - Handler-over-group declaration precedence
//! - **[`edges`]** - Partitioning a candidate set into content-type edges
//! - **[`table`]** - Specificity ordering and the 406 escape destination
//! - **[`negotiator`]** - Request-time preference computation and selection
//! - **[`comparator`]** - Coarse handler priority for host routers
//! - **[`policy`]** - Policy traits a host router plugs into
//! - **[`routes`]** - Route declaration files and candidate sets
//! - **[`registry`]** - Lock-free per-route table lookup with atomic reload
//! - **[`hot_reload`]** - Rebuilding tables when the route file changes
//! - **[`linter`]** - Route file checks
//! - **[`config`]** - Negotiation settings and environment overrides
//! - **[`logging`]** - Structured logging setup
//! - **[`cli`]** - The `produces-router` command line
//!
//! ### Negotiation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Host
//!     participant Registry as registry::NegotiationRegistry
//!     participant Edges as edges::build_edges
//!     participant Table as table::build_table
//!     participant Negotiator as negotiator::negotiate
//!
//!     Host->>Registry: from_handlers(config, handlers)
//!     Registry->>Edges: candidate set per (method, path)
//!     Edges-->>Registry: Vec<Edge> (+ 406 edge if no */*)
//!     Registry->>Table: build_table(edges)
//!     Table-->>Registry: NegotiationTable
//!
//!     Host->>Registry: select(method, path, request)
//!     Registry->>Negotiator: negotiate(table, request)
//!     Negotiator->>Negotiator: $format, Accept or defaults
//!     Negotiator->>Negotiator: first preference with exactly one match
//!     Negotiator-->>Registry: destination | AmbiguousMatch
//!     Registry-->>Host: RouteSelection
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use http::Method;
//! use produces_router::{CandidateSet, HandlerMeta, NegotiationConfig, ProducesDeclaration, ProducesPolicy};
//! use std::sync::Arc;
//!
//! let xml = HandlerMeta::new("export_xml", Method::GET, "/export")
//!     .with_produces(ProducesDeclaration::new(["application/xml"]).unwrap());
//! let page = HandlerMeta::new("export_page", Method::GET, "/export")
//!     .with_produces(ProducesDeclaration::new(["text/html", "image/*"]).unwrap());
//! let candidates = CandidateSet::new(Method::GET, "/export", vec![Arc::new(xml), Arc::new(page)]);
//!
//! let policy = ProducesPolicy::new(Arc::new(NegotiationConfig::default()));
//! let table = policy.table_for(&candidates).unwrap();
//!
//! let request = http::Request::get("/export")
//!     .header("accept", "text/plain, image/*;q=0.9, application/xml;q=0.8")
//!     .body(())
//!     .unwrap();
//! let selection = table.negotiate(&request).unwrap();
//! assert_eq!(selection.edge().pattern(), "image/*");
//! assert_eq!(&*selection.handler().unwrap().name, "export_page");
//! ```
//!
//! ## Outcomes
//!
//! - A destination whose edge has handlers: dispatch to them.
//! - The escape destination ([`Selection::is_not_acceptable`]): respond `406`.
//! - [`NegotiationError::AmbiguousMatch`]: two declared types match one
//!   preference equally; a route configuration error.

pub mod accept;
pub mod cli;
pub mod comparator;
pub mod config;
pub mod declaration;
pub mod edges;
pub mod error;
pub mod hot_reload;
pub mod linter;
pub mod logging;
pub mod media_type;
pub mod negotiator;
pub mod policy;
pub mod registry;
pub mod routes;
pub mod table;

pub use accept::AcceptHeader;
pub use config::{FormatMappings, NegotiationConfig};
pub use declaration::{DeclarationSources, ProducesDeclaration};
pub use edges::{applies_to, build_edges, Edge, EdgeTarget};
pub use error::{MediaTypeError, NegotiationError, RouteError};
pub use media_type::{MediaTypePattern, ANY_CONTENT_TYPE};
pub use negotiator::{acceptable_media_types, negotiate, NegotiationRequest, PreferenceSource, Preferences};
pub use policy::{EndpointComparerPolicy, NodeBuilderPolicy, ProducesPolicy};
pub use registry::{NegotiationRegistry, RouteSelection};
pub use routes::{
    build_handlers, group_candidates, load_routes, CandidateSet, HandlerMeta, HandlerRef, RouteFile,
};
pub use table::{build_table, specificity_rank, NegotiationTable, Selection, TableEntry};
