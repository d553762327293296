#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Unit tests for CLI commands

use super::commands::{negotiate, render_tables};
use crate::cli::{run_cli, Cli, Commands};
use crate::registry::NegotiationRegistry;
use crate::hot_reload::reload_routes;
use clap::Parser;
use std::io::Write;
use tempfile::NamedTempFile;

const ROUTES: &str = r#"
negotiation:
  format_mappings:
    xml: application/xml
groups:
  - name: orders_api
    produces: [application/json]
    handlers:
      - { name: orders_json, method: GET, path: /orders }
  - name: orders_pages
    produces: [text/html]
    handlers:
      - { name: orders_page, method: GET, path: /orders }
handlers:
  - { name: orders_xml, method: GET, path: /orders, produces: [application/xml] }
  - { name: health, method: GET, path: /health }
"#;

fn routes_file(content: &str) -> NamedTempFile {
    let mut temp = NamedTempFile::with_suffix(".yaml").expect("create temp file");
    temp.write_all(content.as_bytes()).expect("write routes");
    temp.flush().expect("flush");
    temp
}

fn registry(content: &str) -> NegotiationRegistry {
    let file = routes_file(content);
    let registry = NegotiationRegistry::default();
    reload_routes(file.path(), &registry).expect("load routes");
    registry
}

#[test]
fn test_negotiate_command_parses() {
    let cli = Cli::try_parse_from([
        "produces-router",
        "negotiate",
        "--routes",
        "routes.yaml",
        "--path",
        "/orders",
        "--accept",
        "text/html",
        "--accept",
        "application/json;q=0.5",
        "--query",
        "$format=json",
    ])
    .unwrap();

    match cli.command {
        Commands::Negotiate {
            method,
            path,
            accept,
            query,
            ..
        } => {
            assert_eq!(method, "GET");
            assert_eq!(path, "/orders");
            assert_eq!(accept.len(), 2);
            assert_eq!(query.as_deref(), Some("$format=json"));
        }
        _ => panic!("Expected Negotiate command"),
    }
}

#[test]
fn test_all_commands_parse() {
    let commands = vec![
        vec!["produces-router", "inspect", "--routes", "r.yaml"],
        vec!["produces-router", "negotiate", "-r", "r.yaml", "-p", "/x"],
        vec!["produces-router", "lint", "--routes", "r.yaml", "--fail-on-error", "--errors-only"],
    ];

    for args in commands {
        let cli = Cli::try_parse_from(&args);
        assert!(cli.is_ok(), "Failed to parse command: {:?}", args);
    }
}

#[test]
fn test_render_tables_lists_specific_entries_first() {
    let rendered = render_tables(&registry(ROUTES));
    assert!(rendered.starts_with("GET /orders\n"));
    assert!(!rendered.contains("/health"));
    let json = rendered.find("application/json").unwrap();
    let any = rendered.find("*/*").unwrap();
    assert!(json < any);
    assert!(rendered.contains("HTTP 406 Not Acceptable"));
    assert!(rendered.contains("escape destination: 3"));
}

#[test]
fn test_negotiate_outcomes() {
    let registry = registry(ROUTES);

    let out = negotiate(&registry, "GET", "/orders", &[], None).unwrap();
    assert_eq!(out, "text/html (destination 1) -> orders_page");

    let out = negotiate(&registry, "get", "/orders", &[], Some("$format=xml")).unwrap();
    assert_eq!(out, "application/xml (destination 2) -> orders_xml");

    let out = negotiate(&registry, "GET", "/health", &["text/html".to_string()], None).unwrap();
    assert!(out.contains("not negotiated"));

    assert!(negotiate(&registry, "BREW", "/orders", &[], None).is_err());
}

#[test]
fn test_negotiate_strict_mode_reports_406() {
    let strict = ROUTES.replace(
        "negotiation:\n",
        "negotiation:\n  return_http_not_acceptable: true\n",
    );
    let registry = registry(&strict);
    let out = negotiate(&registry, "GET", "/orders", &["image/png".to_string()], None).unwrap();
    assert_eq!(out, "406 Not Acceptable (destination 3)");
}

#[test]
fn test_lint_fail_on_error() {
    let file = routes_file("handlers: [{ name: a, method: GET, path: /a, produces: ['*/json'] }]");
    let cli = Cli::try_parse_from([
        "produces-router",
        "lint",
        "--routes",
        file.path().to_str().unwrap(),
        "--fail-on-error",
    ])
    .unwrap();
    let err = run_cli(cli).unwrap_err();
    assert!(err.to_string().contains("1 lint error(s)"));
}
