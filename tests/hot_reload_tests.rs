#![allow(clippy::unwrap_used, clippy::expect_used)]

use http::Method;
use produces_router::hot_reload::{reload_routes, watch_routes};
use produces_router::NegotiationRegistry;
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::{request, temp_routes};

const ROUTES_V1: &str = r#"
handlers:
  - { name: foo_json, method: GET, path: /foo, produces: [application/json] }
  - { name: foo_page, method: GET, path: /foo, produces: [text/html] }
"#;

const ROUTES_V2: &str = r#"
handlers:
  - { name: foo_json, method: GET, path: /foo, produces: [application/json] }
  - { name: foo_csv, method: GET, path: /foo, produces: [text/csv] }
"#;

fn selected_handler(registry: &NegotiationRegistry) -> String {
    let req = request(None, None);
    let selection = registry
        .select(&Method::GET, "/foo", &req)
        .unwrap()
        .unwrap();
    selection.handler().unwrap().name.to_string()
}

#[test]
fn test_watch_routes_reload() {
    let file = temp_routes(ROUTES_V1);
    let registry = Arc::new(NegotiationRegistry::default());
    reload_routes(file.path(), &registry).unwrap();
    assert_eq!(selected_handler(&registry), "foo_page");

    let watcher = watch_routes(file.path(), Arc::clone(&registry)).expect("watch_routes");

    // allow watcher thread to start
    std::thread::sleep(Duration::from_millis(100));

    std::fs::write(file.path(), ROUTES_V2).unwrap();

    // wait for the new tables to be swapped in
    let mut reloaded = false;
    for _ in 0..40 {
        if selected_handler(&registry) == "foo_json" {
            reloaded = true;
            break;
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    drop(watcher);
    assert!(reloaded, "route file change was not picked up");
}

#[test]
fn test_broken_file_keeps_serving_previous_tables() {
    let file = temp_routes(ROUTES_V1);
    let registry = NegotiationRegistry::default();
    reload_routes(file.path(), &registry).unwrap();

    std::fs::write(file.path(), "handlers: [{ name: x, method: NOPE, path: /foo }]").unwrap();
    let err = reload_routes(file.path(), &registry).unwrap_err();
    assert!(format!("{err:#}").contains("NOPE"));
    assert_eq!(selected_handler(&registry), "foo_page");
}
