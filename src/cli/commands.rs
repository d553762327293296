use crate::hot_reload::reload_routes;
use crate::linter::{error_count, lint_file, print_lint_issues, LintSeverity};
use crate::registry::{NegotiationRegistry, RouteSelection};
use crate::routes::parse_method;
use crate::table::NegotiationTable;
use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use http::header::ACCEPT;
use std::path::{Path, PathBuf};

/// Command-line interface for produces-router
///
/// Inspects and exercises the negotiation tables built from a route file.
#[derive(Parser)]
#[command(name = "produces-router")]
#[command(about = "Content negotiation tables for multi-handler routes", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print each negotiated route's table in specificity order
    Inspect {
        /// Path to the route file (YAML or JSON)
        #[arg(short, long)]
        routes: PathBuf,
    },
    /// Negotiate one request against a route file
    Negotiate {
        /// Path to the route file (YAML or JSON)
        #[arg(short, long)]
        routes: PathBuf,

        /// HTTP method of the request
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Request path, matched exactly against declared paths
        #[arg(short, long)]
        path: String,

        /// Accept header value; repeat for several header lines
        #[arg(short, long)]
        accept: Vec<String>,

        /// Query string without the leading '?', e.g. '$format=json'
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Lint a route file
    Lint {
        /// Path to the route file (YAML or JSON)
        #[arg(short, long)]
        routes: PathBuf,

        /// Exit with an error if any error-level issue is found
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,

        /// Only report error-level issues
        #[arg(long, default_value_t = false)]
        errors_only: bool,
    },
}

/// Execute a parsed command line.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Inspect { routes } => {
            let registry = load_registry(&routes)?;
            print!("{}", render_tables(&registry));
            Ok(())
        }
        Commands::Negotiate {
            routes,
            method,
            path,
            accept,
            query,
        } => {
            let registry = load_registry(&routes)?;
            let outcome = negotiate(&registry, &method, &path, &accept, query.as_deref())?;
            println!("{outcome}");
            Ok(())
        }
        Commands::Lint {
            routes,
            fail_on_error,
            errors_only,
        } => {
            let mut issues = lint_file(&routes)?;
            if errors_only {
                issues.retain(|i| i.severity == LintSeverity::Error);
            }
            print_lint_issues(&issues);

            let errors = error_count(&issues);
            if fail_on_error && errors > 0 {
                bail!("{errors} lint error(s) in {}", routes.display());
            }
            Ok(())
        }
    }
}

fn load_registry(path: &Path) -> anyhow::Result<NegotiationRegistry> {
    let registry = NegotiationRegistry::default();
    reload_routes(path, &registry)?;
    Ok(registry)
}

/// Human-readable dump of every negotiated route.
pub(crate) fn render_tables(registry: &NegotiationRegistry) -> String {
    let routes = registry.routes();
    if routes.is_empty() {
        return "No routes declare response content types.\n".to_string();
    }

    let mut out = String::new();
    for (method, path) in routes {
        let Some(table) = registry.table(&method, &path) else {
            continue;
        };
        out.push_str(&format!("{method} {path}\n"));
        render_table(&mut out, &table);
        out.push('\n');
    }
    out
}

fn render_table(out: &mut String, table: &NegotiationTable) {
    for (rank, entry) in table.entries().iter().enumerate() {
        let edge = &table.edges()[entry.destination];
        let targets: Vec<&str> = edge.targets().iter().map(|t| t.display_name()).collect();
        out.push_str(&format!(
            "  {:>2}. {:<32} -> [{}] {}\n",
            rank + 1,
            edge.pattern(),
            entry.destination,
            targets.join(", ")
        ));
    }
    out.push_str(&format!(
        "  escape destination: {}\n",
        table.escape_destination()
    ));
}

/// Negotiate one synthetic request and describe the outcome.
pub(crate) fn negotiate(
    registry: &NegotiationRegistry,
    method: &str,
    path: &str,
    accept: &[String],
    query: Option<&str>,
) -> anyhow::Result<String> {
    let method = parse_method(method).ok_or_else(|| anyhow!("unknown HTTP method '{method}'"))?;

    let uri = match query {
        Some(q) if !q.is_empty() => format!("{path}?{}", q.trim_start_matches('?')),
        _ => path.to_string(),
    };
    let mut builder = http::Request::builder().method(method.clone()).uri(&uri);
    for value in accept {
        builder = builder.header(ACCEPT, value.as_str());
    }
    let request = builder
        .body(())
        .with_context(|| format!("invalid request {method} {uri}"))?;

    let selection = registry.select(&method, path, &request)?;
    Ok(describe(&method, path, selection.as_ref()))
}

fn describe(method: &http::Method, path: &str, selection: Option<&RouteSelection>) -> String {
    let Some(selection) = selection else {
        return format!("{method} {path} is not negotiated; the router keeps its own choice");
    };
    if selection.is_not_acceptable() {
        return format!(
            "406 Not Acceptable (destination {})",
            selection.destination()
        );
    }
    let edge = selection.edge();
    let handlers: Vec<&str> = edge.handlers().map(|h| &*h.name).collect();
    format!(
        "{} (destination {}) -> {}",
        edge.pattern(),
        selection.destination(),
        handlers.join(", ")
    )
}
