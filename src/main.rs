use clap::Parser;
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use http::Method;
use serde_json::{Value, json};
use waypoint::{
    config::{self, RouteTableValidator},
    core::MatchError,
    tracing_setup,
};

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    #[clap(subcommand)]
    command: Commands,

    /// Route table file (TOML, YAML, JSON or INI)
    #[clap(short, long, global = true, default_value = "routes.toml")]
    config: String,

    /// Log filter, e.g. "debug" or "waypoint=trace"
    #[clap(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[clap(long, global = true)]
    json: bool,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Validate a route table file
    Validate,
    /// List every registered route
    Routes,
    /// Resolve one request against the route table
    Match {
        /// HTTP method, e.g. GET
        method: String,
        /// Request path, e.g. /users/42
        path: String,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    match (&args.log_level, args.json) {
        (Some(level), json) => tracing_setup::init_tracing_with_config(level, json, json)?,
        (None, true) => tracing_setup::init_tracing()?,
        (None, false) => tracing_setup::init_console_tracing()?,
    }
    match args.command {
        Commands::Validate => validate_command(&args.config),
        Commands::Routes => routes_command(&args.config),
        Commands::Match { method, path } => match_command(&args.config, &method, &path),
    }
}

fn validate_command(config_path: &str) -> Result<()> {
    let table = config::load_route_table_unchecked(config_path)
        .with_context(|| format!("Failed to load route table from {config_path}"))?;

    match RouteTableValidator::validate(&table) {
        Ok(()) => {
            println!(
                "✅ {config_path} is valid ({} routes)",
                table.routes.len()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ {config_path} is invalid:\n{e}");
            Err(eyre!("Route table validation failed"))
        }
    }
}

fn routes_command(config_path: &str) -> Result<()> {
    let table = config::load_route_table(config_path)?;
    let router = config::build_router(&table)?;

    for (method, pattern, handler) in router.snapshot().routes() {
        println!("{:<7} {pattern} -> {handler}", method.as_str());
    }
    Ok(())
}

fn match_command(config_path: &str, method: &str, path: &str) -> Result<()> {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("Invalid HTTP method: {method}"))?;
    let table = config::load_route_table(config_path)?;
    let router = config::build_router(&table)?;

    let span = tracing_setup::create_dispatch_span(method.as_str(), path);
    let _entered = span.enter();

    let outcome: Value = match router.dispatch(&method, path) {
        Ok(ctx) => {
            let (handler, params, pattern) = ctx.into_parts();
            span.record("http.route", &*pattern);
            span.record("outcome", "matched");
            json!({
                "outcome": "matched",
                "handler": &*handler,
                "pattern": &*pattern,
                "params": params,
            })
        }
        Err(miss) => {
            span.record("outcome", tracing::field::display(&miss));
            miss_to_json(&miss)
        }
    };
    tracing::debug!(%outcome, "dispatch finished");

    println!(
        "{}",
        serde_json::to_string_pretty(&outcome).wrap_err("Failed to render match outcome")?
    );
    Ok(())
}

fn miss_to_json(miss: &MatchError) -> Value {
    match miss {
        MatchError::NotFound => json!({ "outcome": "not_found" }),
        MatchError::MethodNotAllowed { allowed } => json!({
            "outcome": "method_not_allowed",
            "allowed": allowed.iter().map(Method::as_str).collect::<Vec<_>>(),
        }),
        MatchError::TrailingSlashRedirect { location } => json!({
            "outcome": "redirect",
            "location": location,
        }),
        MatchError::TooManySegments { limit } => json!({
            "outcome": "too_many_segments",
            "limit": limit,
        }),
        other => json!({ "outcome": "miss", "reason": other.to_string() }),
    }
}
