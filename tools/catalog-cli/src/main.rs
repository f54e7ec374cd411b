//! Catalog CLI - Resolve storefront listing queries from the command line.
//!
//! Commands:
//! - `catalog query` - Resolve one page of products for a set of filters
//! - `catalog browse` - Interactive listing session with debounced search
//! - `catalog url` - Encode and decode shareable listing URLs
//! - `catalog refs` - Show categories, flavors, weights and the price bound
//! - `catalog config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{BrowseArgs, ConfigArgs, QueryArgs, RefsArgs, UrlArgs};

/// Catalog CLI - Query a storefront product catalog
#[derive(Parser)]
#[command(name = "catalog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Store API base URL, overriding the config file
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Serve queries from a JSON fixture instead of the store API
    #[arg(long, global = true)]
    fixture: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one page of products
    Query(QueryArgs),

    /// Browse interactively; plain lines search, `:help` lists commands
    Browse(BrowseArgs),

    /// Encode or decode listing URLs
    Url(UrlArgs),

    /// Show filter reference data
    Refs(RefsArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = context::Context::load(cli.config.as_deref(), output)?
        .with_base_url(cli.base_url)
        .with_fixture(cli.fixture.as_deref());

    let log_format = if cli.json {
        logging::LogFormat::Json
    } else {
        ctx.config.output.log_format
    };
    logging::init(log_format, &ctx.config.output.log_level, cli.verbose)?;

    let result = match cli.command {
        Commands::Query(args) => commands::query::run(args, &ctx).await,
        Commands::Browse(args) => commands::browse::run(args, &ctx).await,
        Commands::Url(args) => commands::url::run(args, &ctx).await,
        Commands::Refs(args) => commands::refs::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
