//! # CLI Module
//!
//! Command-line access to the negotiation tables built from a route file.
//!
//! ## Commands
//!
//! ### `inspect`
//!
//! Print every negotiated route with its entries in specificity order, the edge
//! each entry points at and the escape destination:
//!
//! ```bash
//! produces-router inspect --routes routes.yaml
//! ```
//!
//! ### `negotiate`
//!
//! Run one request through the tables:
//!
//! ```bash
//! produces-router negotiate --routes routes.yaml --path /orders \
//!     --accept 'text/plain, image/*;q=0.9'
//! produces-router negotiate --routes routes.yaml --path /orders --query '$format=json'
//! ```
//!
//! An ambiguous match exits with an error.
//!
//! ### `lint`
//!
//! ```bash
//! produces-router lint --routes routes.yaml --fail-on-error
//! ```
//!
//! Negotiation settings come from the route file's `negotiation` section,
//! overlaid by `PRODUCES_*` environment variables.
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use produces_router::cli::{Cli, run_cli};
//! use clap::Parser;
//!
//! run_cli(Cli::parse())?;
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run_cli, Cli, Commands};
