//! # Route Declaration Linter
//!
//! Reports problems in a route file before its tables are built, including the
//! ones [`build_handlers`](crate::routes::build_handlers) would reject outright
//! and the ones that only surface as surprising negotiation results at runtime.
//!
//! ## Checks Performed
//!
//! 1. **invalid_content_type** - Every declared entry must parse as a media range
//! 2. **unknown_method** - Handler methods must be standard HTTP verbs
//! 3. **duplicate_handler_name** - Handler names must be unique across the file
//! 4. **empty_produces** - An empty declaration is treated as no declaration
//! 5. **duplicate_content_type** - Two handlers of one route declare the same type
//! 6. **overlapping_content_types** - One declared type is covered by another
//! 7. **group_override** - A handler declaration replaces its group's entirely
//!
//! ## Usage
//!
//! ```rust,ignore
//! use produces_router::linter::{lint_file, print_lint_issues};
//!
//! let issues = lint_file(Path::new("routes.yaml"))?;
//! print_lint_issues(&issues);
//! ```

use crate::media_type::{MediaTypePattern, ANY_CONTENT_TYPE};
use crate::routes::{load_routes, parse_method, RouteFile};
use http::Method;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;


/// Severity level for lint issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Error - The route file will be rejected
    Error,
    /// Warning - Loads, but likely not what was intended
    Warning,
    /// Info - Worth knowing about
    Info,
}

impl fmt::Display for LintSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintSeverity::Error => write!(f, "error"),
            LintSeverity::Warning => write!(f, "warning"),
            LintSeverity::Info => write!(f, "info"),
        }
    }
}

/// A lint issue found in a route file
#[derive(Debug, Clone)]
pub struct LintIssue {
    /// Where the issue occurred (e.g., "handler:list_orders", "route:GET /orders")
    pub location: String,
    pub severity: LintSeverity,
    /// Type of lint issue (e.g., "invalid_content_type")
    pub kind: String,
    /// Human-readable description of the problem
    pub message: String,
    /// Optional suggestion for how to fix it
    pub suggestion: Option<String>,
}

impl LintIssue {
    /// Create a new lint issue
    pub fn new(
        location: impl Into<String>,
        severity: LintSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LintIssue {
            location: location.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Add a suggestion for fixing the issue
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Load and lint a route file.
pub fn lint_file(path: &Path) -> anyhow::Result<Vec<LintIssue>> {
    let routes = load_routes(path)?;
    Ok(lint_routes(&routes))
}

/// A handler after declaration resolution, keeping only entries that parse.
struct ResolvedHandler<'a> {
    name: &'a str,
    method: Method,
    path: &'a str,
    declared: Vec<(&'a str, MediaTypePattern)>,
}

/// Lint parsed route declarations.
#[must_use]
pub fn lint_routes(routes: &RouteFile) -> Vec<LintIssue> {
    let mut issues = Vec::new();

    for group in &routes.groups {
        if let Some(types) = &group.produces {
            lint_declaration(&mut issues, &format!("group:{}", group.name), types);
        }
    }

    let mut seen = HashSet::new();
    let mut resolved = Vec::new();

    for (group, handler) in routes.iter_handlers() {
        let location = format!("handler:{}", handler.name);

        if !seen.insert(handler.name.as_str()) {
            issues.push(
                LintIssue::new(
                    &location,
                    LintSeverity::Error,
                    "duplicate_handler_name",
                    format!("Handler name '{}' is declared more than once", handler.name),
                )
                .with_suggestion("Give every handler a unique name"),
            );
        }

        let Some(method) = parse_method(&handler.method) else {
            issues.push(
                LintIssue::new(
                    &location,
                    LintSeverity::Error,
                    "unknown_method",
                    format!("Unknown HTTP method '{}'", handler.method),
                )
                .with_suggestion("Use one of GET, POST, PUT, DELETE, PATCH, OPTIONS, HEAD, TRACE"),
            );
            continue;
        };

        let group_types = group.and_then(|g| g.produces.as_ref());
        if let Some(types) = &handler.produces {
            lint_declaration(&mut issues, &location, types);
            if let (Some(group), Some(group_types)) = (group, group_types) {
                issues.push(LintIssue::new(
                    &location,
                    LintSeverity::Info,
                    "group_override",
                    format!(
                        "Declaration [{}] replaces group '{}' declaration [{}]; they are not merged",
                        types.join(", "),
                        group.name,
                        group_types.join(", ")
                    ),
                ));
            }
        }

        let active = handler.produces.as_ref().or(group_types);
        resolved.push(ResolvedHandler {
            name: &handler.name,
            method,
            path: &handler.path,
            declared: active.map(|types| valid_patterns(types)).unwrap_or_default(),
        });
    }

    for (method, path, members) in candidate_sets(&resolved) {
        lint_candidate_set(&mut issues, &format!("route:{method} {path}"), &members);
    }

    issues
}

fn lint_declaration(issues: &mut Vec<LintIssue>, location: &str, types: &[String]) {
    if types.is_empty() {
        issues.push(
            LintIssue::new(
                location,
                LintSeverity::Warning,
                "empty_produces",
                "Empty produces list is treated as no declaration",
            )
            .with_suggestion("Remove the produces key or list at least one content type"),
        );
        return;
    }

    for content_type in types {
        if let Err(e) = MediaTypePattern::parse(content_type) {
            issues.push(
                LintIssue::new(
                    location,
                    LintSeverity::Error,
                    "invalid_content_type",
                    format!("Invalid content type '{content_type}': {e}"),
                )
                .with_suggestion("Use type/subtype, type/* or */* (e.g., application/json)"),
            );
        }
    }
}

fn valid_patterns(types: &[String]) -> Vec<(&str, MediaTypePattern)> {
    types
        .iter()
        .filter_map(|t| MediaTypePattern::parse(t).ok().map(|p| (t.trim(), p)))
        .collect()
}

/// Group by method and path in first-seen order.
fn candidate_sets<'r, 'a>(
    resolved: &'r [ResolvedHandler<'a>],
) -> Vec<(Method, &'a str, Vec<&'r ResolvedHandler<'a>>)> {
    let mut sets: Vec<(Method, &'a str, Vec<&'r ResolvedHandler<'a>>)> = Vec::new();
    for handler in resolved {
        match sets
            .iter_mut()
            .find(|(m, p, _)| *m == handler.method && *p == handler.path)
        {
            Some((_, _, members)) => members.push(handler),
            None => sets.push((handler.method.clone(), handler.path, vec![handler])),
        }
    }
    sets
}

fn lint_candidate_set(issues: &mut Vec<LintIssue>, location: &str, members: &[&ResolvedHandler<'_>]) {
    if members.iter().all(|h| h.declared.is_empty()) {
        return;
    }

    // (lower-cased literal, first declaring handler)
    let mut owners: Vec<(String, &str)> = Vec::new();
    for handler in members {
        let mut own: HashSet<String> = HashSet::new();
        for (literal, _) in &handler.declared {
            let key = literal.to_ascii_lowercase();
            if !own.insert(key.clone()) {
                continue;
            }
            match owners.iter().find(|(k, _)| *k == key) {
                Some((_, first)) => issues.push(
                    LintIssue::new(
                        location,
                        LintSeverity::Warning,
                        "duplicate_content_type",
                        format!(
                            "'{literal}' is declared by both '{first}' and '{}'; the host must choose between them",
                            handler.name
                        ),
                    )
                    .with_suggestion("Declare each content type on a single handler per route"),
                ),
                None => owners.push((key, handler.name)),
            }
        }
    }

    let mut distinct: Vec<(&str, &MediaTypePattern)> = Vec::new();
    for (literal, pattern) in members.iter().flat_map(|h| h.declared.iter()) {
        if literal.eq_ignore_ascii_case(ANY_CONTENT_TYPE) {
            continue;
        }
        if !distinct.iter().any(|(l, _)| l.eq_ignore_ascii_case(literal)) {
            distinct.push((*literal, pattern));
        }
    }

    for (narrow, narrow_pattern) in &distinct {
        for (wide, wide_pattern) in &distinct {
            if narrow == wide || !narrow_pattern.is_subset_of(wide_pattern) {
                continue;
            }
            issues.push(
                LintIssue::new(
                    location,
                    LintSeverity::Info,
                    "overlapping_content_types",
                    format!(
                        "'{narrow}' is covered by '{wide}'; an Accept of '{wide}' matches both and is ambiguous"
                    ),
                ),
            );
        }
    }
}

/// Number of error-level issues.
#[must_use]
pub fn error_count(issues: &[LintIssue]) -> usize {
    issues
        .iter()
        .filter(|i| i.severity == LintSeverity::Error)
        .count()
}

/// Print lint issues grouped by severity
pub fn print_lint_issues(issues: &[LintIssue]) {
    if issues.is_empty() {
        println!("✅ No lint issues found!");
        return;
    }

    let sections = [
        (LintSeverity::Error, "❌ Errors (must fix):"),
        (LintSeverity::Warning, "⚠️  Warnings (should fix):"),
        (LintSeverity::Info, "ℹ️  Info:"),
    ];
    let count = |severity: LintSeverity| issues.iter().filter(|i| i.severity == severity).count();

    println!("\n📋 Lint Results:");
    println!(
        "   {} error(s), {} warning(s), {} info(s)\n",
        count(LintSeverity::Error),
        count(LintSeverity::Warning),
        count(LintSeverity::Info)
    );

    for (severity, heading) in sections {
        if count(severity) == 0 {
            continue;
        }
        println!("{heading}");
        for issue in issues.iter().filter(|i| i.severity == severity) {
            println!("   [{}] {}", issue.kind, issue.location);
            println!("      {}", issue.message);
            if let Some(suggestion) = &issue.suggestion {
                println!("      💡 Suggestion: {suggestion}");
            }
        }
        println!();
    }
}
