//! # Routes Module
//!
//! Static handler metadata: which handlers exist, which method and path they
//! serve, and which response content types they declare.
//!
//! ## Overview
//!
//! Route declarations are read from a YAML or JSON file ([`load_routes`]),
//! turned into resolved [`HandlerMeta`] values ([`build_handlers`], which applies
//! the handler-over-group declaration precedence), and grouped into
//! [`CandidateSet`]s by method and path ([`group_candidates`]). A candidate set is
//! the unit the negotiation engine builds one table for.
//!
//! ```yaml
//! groups:
//!   - name: orders_api
//!     produces: [application/json, application/xml]
//!     handlers:
//!       - { name: list_orders, method: GET, path: /orders }
//!   - name: orders_pages
//!     produces: [text/html]
//!     handlers:
//!       - { name: orders_index, method: GET, path: /orders }
//! ```

mod build;
mod load;
mod types;

pub use build::*;
pub use load::*;
pub use types::*;
