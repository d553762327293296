#![allow(clippy::unwrap_used, clippy::expect_used)]

use produces_router::{
    applies_to, build_edges, build_table, Edge, NegotiationConfig, NegotiationError,
    ProducesPolicy,
};
use std::sync::Arc;

mod common;
use common::{candidates, declared, request, selected, table, undeclared};

fn strict() -> NegotiationConfig {
    NegotiationConfig::default().with_return_http_not_acceptable(true)
}

fn respecting() -> NegotiationConfig {
    NegotiationConfig::default().with_respect_browser_accept_header(true)
}

#[test]
fn test_highest_quality_type_with_a_handler_wins() {
    let table = table(
        NegotiationConfig::default(),
        vec![
            declared("xml", &["application/xml"]),
            declared("json", &["application/json"]),
            declared("images", &["image/*"]),
            declared("page", &["text/html"]),
        ],
    );
    let req = request(Some("text/plain, image/*;q=0.9, application/xml;q=0.8"), None);
    let selection = table.negotiate(&req).unwrap();
    assert_eq!(selection.edge().pattern(), "image/*");
    assert_eq!(&*selection.handler().unwrap().name, "images");
}

#[test]
fn test_unmatched_request_falls_back_to_first_entry() {
    let table = table(
        NegotiationConfig::default(),
        vec![
            declared("xml", &["application/xml"]),
            declared("page", &["text/html", "image/*"]),
        ],
    );
    let selection = table.negotiate(&request(Some("application/json"), None)).unwrap();
    assert_eq!(selection.edge().pattern(), "application/xml");
    assert!(!selection.is_not_acceptable());
}

#[test]
fn test_unmatched_request_returns_406_in_strict_mode() {
    let table = table(
        strict(),
        vec![
            declared("xml", &["application/xml"]),
            declared("page", &["text/html", "image/*"]),
        ],
    );
    let selection = table.negotiate(&request(Some("application/json"), None)).unwrap();
    // application/xml, text/html, image/* and then the synthesized edge
    assert_eq!(selection.destination(), 3);
    assert_eq!(selection.edge().pattern(), "*/*");
    assert!(selection.is_not_acceptable());
    assert!(selection.handler().is_none());
    assert_eq!(table.escape_destination(), 3);
}

#[test]
fn test_wildcard_accept_prefers_html_by_default() {
    let handlers = || {
        vec![
            declared("json", &["application/json"]),
            declared("page", &["text/html"]),
        ]
    };
    let table = table(NegotiationConfig::default(), handlers());
    assert!(applies_to(&candidates(handlers())));
    assert_eq!(selected(&table, &request(Some("*/*"), None)), "text/html");
    assert_eq!(selected(&table, &request(None, None)), "text/html");
}

#[test]
fn test_wildcard_anywhere_in_accept_substitutes_defaults() {
    let handlers = || {
        vec![
            declared("json", &["application/json"]),
            declared("page", &["text/html"]),
        ]
    };
    let req = request(Some("application/json, */*;q=0.9"), None);

    let lenient = table(NegotiationConfig::default(), handlers());
    assert_eq!(selected(&lenient, &req), "text/html");

    let literal = table(respecting(), handlers());
    assert_eq!(selected(&literal, &req), "application/json");
}

#[test]
fn test_json_is_second_default() {
    let table = table(
        NegotiationConfig::default(),
        vec![
            declared("xml", &["application/xml"]),
            declared("json", &["application/json"]),
        ],
    );
    assert_eq!(selected(&table, &request(Some("*/*"), None)), "application/json");
}

#[test]
fn test_specific_type_honored_when_browser_header_respected() {
    let handlers = || {
        vec![
            declared("plain", &["text/plain"]),
            declared("json", &["application/json"]),
        ]
    };
    let req = request(Some("text/plain, */*;q=0.9"), None);

    let lenient = table(NegotiationConfig::default(), handlers());
    assert_eq!(selected(&lenient, &req), "application/json");

    let literal = table(respecting(), handlers());
    assert_eq!(selected(&literal, &req), "text/plain");
}

#[test]
fn test_format_parameter_overrides_accept() {
    let table = table(
        NegotiationConfig::default(),
        vec![
            declared("page", &["text/html"]),
            declared("json", &["application/json"]),
        ],
    );
    let req = request(Some("text/html"), Some("$format=json"));
    assert_eq!(selected(&table, &req), "application/json");
}

#[test]
fn test_custom_format_mapping() {
    let config = NegotiationConfig::default()
        .with_format_mapping("xml", "application/xml".parse().unwrap());
    let table = table(
        config,
        vec![
            declared("page", &["text/html"]),
            declared("json", &["application/json"]),
            declared("xml", &["application/xml"]),
        ],
    );
    let req = request(Some("text/html"), Some("$format=xml"));
    assert_eq!(selected(&table, &req), "application/xml");
}

#[test]
fn test_unmapped_format_does_not_fall_back_to_accept() {
    let handlers = || {
        vec![
            declared("page", &["text/html"]),
            declared("json", &["application/json"]),
        ]
    };
    let req = request(Some("application/json"), Some("$format=yaml"));

    let lenient = table(NegotiationConfig::default(), handlers());
    assert_eq!(selected(&lenient, &req), "text/html");

    let strict = table(strict(), handlers());
    assert!(strict.negotiate(&req).unwrap().is_not_acceptable());
}

#[test]
fn test_custom_format_parameter_name() {
    let config = NegotiationConfig::default().with_format_parameter("format");
    let table = table(
        config,
        vec![
            declared("page", &["text/html"]),
            declared("json", &["application/json"]),
        ],
    );
    assert_eq!(selected(&table, &request(None, Some("format=json"))), "application/json");
    // the default name is no longer special
    assert_eq!(selected(&table, &request(None, Some("$format=json"))), "text/html");
}

#[test]
fn test_overlapping_declarations_are_ambiguous() {
    let table = table(
        NegotiationConfig::default(),
        vec![
            declared("page", &["text/html"]),
            declared("text", &["text/*"]),
        ],
    );
    let err = table.negotiate(&request(Some("text/*"), None)).unwrap_err();
    assert_eq!(
        err,
        NegotiationError::AmbiguousMatch {
            media_type: "text/*".to_string(),
            destinations: vec![0, 1],
        }
    );

    // a concrete preference is still unambiguous
    assert_eq!(selected(&table, &request(Some("text/html"), None)), "text/html");
}

#[test]
fn test_literal_wildcard_matches_every_entry() {
    let table = table(
        respecting(),
        vec![
            declared("json", &["application/json"]),
            declared("page", &["text/html"]),
        ],
    );
    let result = table.negotiate(&request(Some("*/*"), None));
    assert!(matches!(result, Err(NegotiationError::AmbiguousMatch { .. })));
}

#[test]
fn test_zero_quality_wildcard_still_substitutes_defaults() {
    let table = table(
        NegotiationConfig::default(),
        vec![
            declared("json", &["application/json"]),
            declared("page", &["text/html"]),
        ],
    );
    let selection = table
        .negotiate(&request(Some("application/json, */*;q=0"), None))
        .unwrap();
    assert_eq!(&*selection.handler().unwrap().name, "page");
}

#[test]
fn test_zero_quality_types_are_tried_last() {
    let table = table(
        respecting(),
        vec![
            declared("page", &["text/html"]),
            declared("json", &["application/json"]),
        ],
    );
    let req = request(Some("text/html;q=0, application/json;q=0.1"), None);
    assert_eq!(selected(&table, &req), "application/json");

    // nothing better on offer, so the q=0 entry is still used
    let req = request(Some("image/png, text/html;q=0"), None);
    assert_eq!(selected(&table, &req), "text/html");
}

#[test]
fn test_structured_suffix_satisfies_base_type() {
    let table = table(
        strict(),
        vec![
            declared("page", &["text/html"]),
            declared("api", &["application/vnd.api+json"]),
        ],
    );
    let selection = table.negotiate(&request(Some("application/json"), None)).unwrap();
    assert_eq!(&*selection.handler().unwrap().name, "api");
}

#[test]
fn test_declared_wildcard_with_parameters_is_the_escape() {
    let table = table(
        strict(),
        vec![
            declared("json", &["application/json"]),
            declared("any_utf8", &["*/*; charset=utf-8"]),
        ],
    );
    let selection = table.negotiate(&request(Some("image/png"), None)).unwrap();
    assert_eq!(selection.destination(), table.escape_destination());
    assert!(!selection.is_not_acceptable());
    assert_eq!(&*selection.handler().unwrap().name, "any_utf8");
}

#[test]
fn test_undeclared_handler_catches_everything_else() {
    let table = table(
        strict(),
        vec![declared("json", &["application/json"]), undeclared("fallback")],
    );
    let selection = table.negotiate(&request(Some("text/csv"), None)).unwrap();
    assert_eq!(selection.destination(), table.escape_destination());
    assert!(!selection.is_not_acceptable());
    assert_eq!(&*selection.handler().unwrap().name, "fallback");

    let selection = table.negotiate(&request(Some("application/json"), None)).unwrap();
    let names: Vec<&str> = selection.handlers().map(|h| &*h.name).collect();
    assert_eq!(names, ["json", "fallback"]);
}

#[test]
fn test_single_destination_skips_inspection() {
    let table = table(strict(), vec![declared("any", &["*/*"])]);
    assert!(table.is_single_destination());
    let selection = table.negotiate(&request(Some("image/png"), Some("$format=xml"))).unwrap();
    assert_eq!(&*selection.handler().unwrap().name, "any");
}

#[test]
fn test_applies_only_with_a_non_empty_declaration() {
    assert!(!applies_to(&candidates(vec![undeclared("a"), undeclared("b")])));
    assert!(!applies_to(&candidates(vec![declared("a", &[]), undeclared("b")])));
    assert!(applies_to(&candidates(vec![declared("a", &["text/csv"]), undeclared("b")])));
    assert!(ProducesPolicy::default()
        .table_for(&candidates(vec![declared("a", &[])]))
        .is_none());
}

#[test]
fn test_tables_are_idempotent() {
    let set = candidates(vec![
        declared("xml", &["application/xml"]),
        declared("page", &["text/html", "image/*"]),
        undeclared("fallback"),
    ]);
    let config = Arc::new(NegotiationConfig::default());
    let first = build_table(build_edges(&set), Arc::clone(&config));
    let second = build_table(build_edges(&set), config);
    assert_eq!(first.entries(), second.entries());
    assert_eq!(first.edges(), second.edges());
    assert_eq!(first.escape_destination(), second.escape_destination());
}

#[test]
fn test_exactly_one_universal_edge() {
    let sets = vec![
        vec![declared("a", &["application/json"])],
        vec![declared("a", &["*/*"]), declared("b", &["text/html"])],
        vec![declared("a", &["text/html"]), undeclared("b"), undeclared("c")],
        vec![declared("a", &["*/*", "application/json"]), undeclared("b")],
    ];
    for handlers in sets {
        let edges = build_edges(&candidates(handlers));
        assert_eq!(edges.iter().filter(|e| e.is_universal()).count(), 1);
    }
}

#[test]
fn test_exact_types_ordered_before_wildcards() {
    let table = table(
        NegotiationConfig::default(),
        vec![
            declared("xml", &["application/xml"]),
            declared("images", &["image/*"]),
            declared("json", &["application/json"]),
            declared("page", &["text/html"]),
        ],
    );
    let order: Vec<&str> = table
        .entries()
        .iter()
        .map(|e| table.edges()[e.destination].pattern())
        .collect();
    assert_eq!(order, ["application/xml", "application/json", "text/html", "image/*", "*/*"]);
    assert!(table.edges().iter().any(Edge::is_reject));
}
