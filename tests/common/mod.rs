#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use http::Method;
use produces_router::{
    CandidateSet, HandlerMeta, HandlerRef, NegotiationConfig, NegotiationTable, ProducesDeclaration,
    ProducesPolicy,
};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

pub const PATH: &str = "/resource";

/// A GET handler declaring `types`.
pub fn declared(name: &str, types: &[&str]) -> HandlerRef {
    Arc::new(
        HandlerMeta::new(name, Method::GET, PATH)
            .with_produces(ProducesDeclaration::new(types.iter().copied()).expect("valid types")),
    )
}

/// A GET handler without any declaration.
pub fn undeclared(name: &str) -> HandlerRef {
    Arc::new(HandlerMeta::new(name, Method::GET, PATH))
}

pub fn candidates(handlers: Vec<HandlerRef>) -> CandidateSet {
    CandidateSet::new(Method::GET, PATH, handlers)
}

/// Build the table the policy would build, panicking if it does not apply.
pub fn table(config: NegotiationConfig, handlers: Vec<HandlerRef>) -> NegotiationTable {
    ProducesPolicy::new(Arc::new(config))
        .table_for(&candidates(handlers))
        .expect("policy applies")
}

pub fn request(accept: Option<&str>, query: Option<&str>) -> http::Request<()> {
    let uri = match query {
        Some(q) => format!("{PATH}?{q}"),
        None => PATH.to_string(),
    };
    let mut builder = http::Request::get(uri);
    if let Some(accept) = accept {
        builder = builder.header(http::header::ACCEPT, accept);
    }
    builder.body(()).expect("valid request")
}

/// Pattern of the edge selected for `req`.
pub fn selected(table: &NegotiationTable, req: &http::Request<()>) -> String {
    table
        .negotiate(req)
        .expect("unambiguous")
        .edge()
        .pattern()
        .to_string()
}

pub fn temp_routes(content: &str) -> NamedTempFile {
    let mut temp = NamedTempFile::with_suffix(".yaml").expect("create temp file");
    temp.write_all(content.as_bytes()).expect("write routes");
    temp.flush().expect("flush");
    temp
}
