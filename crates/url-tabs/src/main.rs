//! URL tabs developer harness.
//!
//! Resolves endpoints, renders block lists and prints the editor snapshot
//! using the endpoint registry configured in the environment.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use url_tabs::block::ParsedBlock;
use url_tabs::config::Config;
use url_tabs::editor::EditorSnapshot;
use url_tabs::filter::RenderPipeline;
use url_tabs::request::RequestContext;
use url_tabs::resolver::EndpointResolver;
use url_tabs::tab::base_url;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the value of every registered endpoint for a request URI.
    Resolve {
        /// Request URI, e.g. `/products/tab/specs/?ref=home`.
        uri: String,
    },
    /// Render a JSON list of parsed blocks for a request URI.
    Render {
        /// Request URI.
        uri: String,
        /// Block list file; reads stdin when omitted.
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Print the editor snapshot for a page.
    Snapshot {
        /// Page path on the configured site.
        #[arg(default_value = "/")]
        path: String,
    },
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;
    let registry = config.registry()?;
    info!(endpoints = registry.len(), "endpoint registry loaded");

    match cli.command {
        Command::Resolve { uri } => {
            let ctx = RequestContext::new(&uri, registry);
            let resolver = EndpointResolver::new(&ctx);
            let endpoints: serde_json::Map<_, _> = ctx
                .registry()
                .names()
                .map(|name| (name.to_string(), json!(resolver.resolve(name))))
                .collect();
            let output = json!({
                "path": ctx.path(),
                "base": base_url(&ctx),
                "endpoints": endpoints,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Render { uri, file } => {
            let input = read_input(file.as_ref())?;
            let blocks: Vec<ParsedBlock> =
                serde_json::from_str(&input).context("block list is not valid JSON")?;
            let ctx = RequestContext::new(&uri, registry);
            println!("{}", RenderPipeline::with_defaults().render_html(&blocks, &ctx));
        }
        Command::Snapshot { path } => {
            let snapshot = EditorSnapshot::new(&registry, config.page_url(&path));
            println!("{}", snapshot.to_json()?);
        }
    }

    Ok(())
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
