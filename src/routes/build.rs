use super::types::{CandidateSet, HandlerMeta, HandlerRef, RouteFile};
use crate::declaration::{DeclarationSources, ProducesDeclaration};
use crate::error::RouteError;
use http::Method;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Methods a route file may use.
const SUPPORTED_METHODS: [Method; 8] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
    Method::OPTIONS,
    Method::HEAD,
    Method::TRACE,
];

/// Parse a method name case-insensitively, restricted to the supported verbs.
#[must_use]
pub fn parse_method(method: &str) -> Option<Method> {
    let upper = method.trim().to_ascii_uppercase();
    SUPPORTED_METHODS
        .iter()
        .find(|m| m.as_str() == upper)
        .cloned()
}

/// Resolve every handler in the file into [`HandlerMeta`].
///
/// Each handler's active declaration is its own `produces` if present, otherwise
/// its group's. Invalid content types, unknown methods and duplicate names are
/// rejected.
pub fn build_handlers(routes: &RouteFile) -> Result<Vec<HandlerRef>, RouteError> {
    let mut group_declarations = HashMap::with_capacity(routes.groups.len());
    for group in &routes.groups {
        if let Some(types) = &group.produces {
            let declaration = ProducesDeclaration::new(types.iter().cloned()).map_err(|source| {
                RouteError::InvalidContentType {
                    owner: group.name.clone(),
                    source,
                }
            })?;
            group_declarations.insert(group.name.as_str(), declaration);
        }
    }

    let mut seen = HashSet::new();
    let mut handlers = Vec::new();

    for (group, def) in routes.iter_handlers() {
        if !seen.insert(def.name.as_str()) {
            return Err(RouteError::DuplicateHandler {
                name: def.name.clone(),
            });
        }

        let method = parse_method(&def.method).ok_or_else(|| RouteError::UnknownMethod {
            handler: def.name.clone(),
            method: def.method.clone(),
        })?;

        let own = def
            .produces
            .as_ref()
            .map(|types| ProducesDeclaration::new(types.iter().cloned()))
            .transpose()
            .map_err(|source| RouteError::InvalidContentType {
                owner: def.name.clone(),
                source,
            })?;

        let sources = DeclarationSources {
            handler: own.as_ref(),
            group: group.and_then(|g| group_declarations.get(g.name.as_str())),
        };
        let produces = sources.resolve().cloned();

        debug!(
            handler = %def.name,
            method = %method,
            path = %def.path,
            group = ?group.map(|g| g.name.as_str()),
            produces = ?produces.as_ref().map(ProducesDeclaration::content_types),
            "Resolved handler declaration"
        );

        let mut meta = HandlerMeta::new(def.name.as_str(), method, def.path.as_str());
        meta.group = group.map(|g| Arc::from(g.name.as_str()));
        meta.produces = produces;
        handlers.push(Arc::new(meta));
    }

    info!(handlers_count = handlers.len(), "Route declarations resolved");
    Ok(handlers)
}

/// Group handlers by method and path, keeping registration order both between
/// sets (first appearance) and within each set.
#[must_use]
pub fn group_candidates(handlers: &[HandlerRef]) -> Vec<CandidateSet> {
    let mut order: Vec<(Method, &str)> = Vec::new();
    let mut grouped: HashMap<(Method, &str), Vec<HandlerRef>> = HashMap::new();

    for handler in handlers {
        let key = (handler.method.clone(), handler.path.as_str());
        grouped
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(Arc::clone(handler));
    }

    order
        .into_iter()
        .filter_map(|key| {
            grouped
                .remove(&key)
                .map(|members| CandidateSet::new(key.0, key.1, members))
        })
        .collect()
}
