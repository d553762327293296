//! # Hot Reload Module
//!
//! Live reloading of a route declaration file without restarting the host.
//!
//! ## Overview
//!
//! [`watch_routes`] watches the file and, on every modification:
//! - Reloads and parses the route file
//! - Resolves handler declarations
//! - Overlays environment overrides on the file's negotiation section
//! - Rebuilds every negotiation table and swaps them into the registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use produces_router::{hot_reload::watch_routes, NegotiationRegistry};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(NegotiationRegistry::default());
//! let _watcher = watch_routes("routes.yaml", Arc::clone(&registry))?;
//! ```
//!
//! The watcher stops when the returned handle is dropped.
//!
//! ## Error Handling
//!
//! If the new file fails to parse or validate the error is logged, the previous
//! tables remain active and requests keep being served.

use crate::registry::NegotiationRegistry;
use crate::routes::{build_handlers, load_routes};
use anyhow::Context;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Load `path` and swap the resulting tables into `registry`.
pub fn reload_routes(path: &Path, registry: &NegotiationRegistry) -> anyhow::Result<usize> {
    let routes = load_routes(path)?;
    let handlers = build_handlers(&routes)
        .with_context(|| format!("invalid route declarations in {}", path.display()))?;
    let mut config = routes.negotiation;
    config.apply_env();
    registry.reload_with_config(config, &handlers);
    Ok(handlers.len())
}

/// Watch a route file and rebuild the registry's tables when it changes.
pub fn watch_routes<P>(
    routes_path: P,
    registry: Arc<NegotiationRegistry>,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
{
    let path: PathBuf = routes_path.as_ref().to_path_buf();
    let watch_path = path.clone();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    match reload_routes(&watch_path, &registry) {
                        Ok(handlers_count) => info!(
                            path = %watch_path.display(),
                            handlers_count,
                            "hot-reload: negotiation tables replaced"
                        ),
                        Err(e) => error!(
                            path = %watch_path.display(),
                            error = %format!("{e:#}"),
                            "hot-reload: keeping previous tables"
                        ),
                    }
                }
            }
            Err(e) => error!(error = %e, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use http::Method;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reload_routes_replaces_tables() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(
            file,
            r#"
negotiation:
  return_http_not_acceptable: true
handlers:
  - {{ name: a, method: GET, path: /a, produces: [application/json] }}
"#
        )
        .unwrap();
        file.flush().unwrap();

        let registry = NegotiationRegistry::default();
        assert!(registry.table(&Method::GET, "/a").is_none());

        assert_eq!(reload_routes(file.path(), &registry).unwrap(), 1);
        assert!(registry.table(&Method::GET, "/a").is_some());
        assert!(registry.config().return_http_not_acceptable);
    }

    #[test]
    fn test_invalid_file_keeps_previous_tables() {
        let mut good = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(good, "handlers: [{{ name: a, method: GET, path: /a, produces: [text/html] }}]").unwrap();
        good.flush().unwrap();
        let registry = NegotiationRegistry::default();
        reload_routes(good.path(), &registry).unwrap();

        let mut bad = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(bad, "handlers: [{{ name: a, method: GET, path: /a, produces: ['*/html'] }}]").unwrap();
        bad.flush().unwrap();
        assert!(reload_routes(bad.path(), &registry).is_err());
        assert!(registry.table(&Method::GET, "/a").is_some());
    }
}
