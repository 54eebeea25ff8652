// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use rag_search::utils::logging::{
    format_badge, format_error, format_info, format_success, format_warning,
};
use rag_search::{Config, Model, QueryClient, SearchRequest, Validator, annotate_plain};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "rag_search")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Cited answers from a hosted vector store", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the search page
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run one search and print the cited answer
    Search {
        /// Search query text
        query: String,

        #[arg(short, long)]
        model: Option<String>,

        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Do not request the raw retrieved passages
        #[arg(long)]
        no_results: bool,

        /// Print the normalized result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration with the credential redacted
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    rag_search::utils::logging::init_logger(cli.color, cli.verbose);

    let loaded = if cli.config.exists() {
        info!("Loading configuration from: {}", cli.config.display());
        Config::load(Some(cli.config.as_path()))
    } else {
        warn!(
            "Config file {} not found, using defaults and environment",
            cli.config.display()
        );
        Config::load(None)
    };
    let config = loaded.context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve { host, port } => {
            cmd_serve(config, host, port).await?;
        }
        Commands::Search {
            query,
            model,
            limit,
            no_results,
            json,
        } => {
            cmd_search(&config, &query, model.as_deref(), limit, !no_results, json).await?;
        }
        Commands::Config => {
            println!("{:#?}", config);
        }
    }

    Ok(())
}

async fn cmd_serve(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        Validator::validate_port(port)?;
        config.server.port = port;
    }

    rag_search::serve(&config).await.context("Server error")?;
    Ok(())
}

async fn cmd_search(
    config: &Config,
    query: &str,
    model: Option<&str>,
    limit: Option<i64>,
    include_results: bool,
    json: bool,
) -> Result<()> {
    let model = match model {
        Some(raw) => raw.parse::<Model>()?,
        None => config.search.model,
    };
    let limit = limit.unwrap_or(i64::from(config.search.max_results));

    let request = match SearchRequest::new(query, model, limit, include_results) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            return Err(e.into());
        }
    };

    let client = QueryClient::from_config(&config.provider)?;

    let result = match client.execute(&request).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{}", format_error(e.title()));
            eprintln!("  {}", e.detail());
            if e.is_retryable() {
                eprintln!("{}", format_warning("The request was not retried; run it again to retry"));
            }
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("\n{}\n", format_info(&format!("Answer for: \"{}\"", request.query)));
    println!("{}", annotate_plain(&result));

    let cards = result.source_cards();
    if !cards.is_empty() {
        println!("\nSources & Citations");
        println!("{}", "=".repeat(80));
        for card in cards {
            let score = card
                .score
                .map(|s| format!(" (Score: {:.4})", s))
                .unwrap_or_default();
            println!("{} {}{}", format_badge(card.number), card.file, score);
            for snippet in &card.snippets {
                println!("     {}", Validator::truncate_text(snippet, 200));
            }
        }
    }

    if !result.results.is_empty() {
        println!("\nRaw Search Results ({})", result.results.len());
        println!("{}", "=".repeat(80));
        for (idx, item) in result.results.iter().enumerate() {
            print!("{}. {}", idx + 1, item.format_summary(300));
        }
    }

    println!();
    println!("{}", format_success("Search complete"));

    Ok(())
}
