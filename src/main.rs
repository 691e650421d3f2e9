//! Command-line front end for the URL shortener core.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! url-shortener migrate
//!
//! # Shorten a URL
//! url-shortener create https://www.rust-lang.org
//!
//! # Record a click and show statistics
//! url-shortener click Xy9k2Q --user-agent "curl/8.5"
//! url-shortener stats Xy9k2Q
//!
//! # List every link (as consumed by the health monitor)
//! url-shortener links --json
//! ```
//!
//! # Environment Variables
//!
//! See [`url_shortener_core::config`]. `DATABASE_URL=memory` runs against a
//! throwaway in-process store.

use url_shortener_core::AppError;
use url_shortener_core::config::{Config, load_from_env};
use url_shortener_core::domain::click_event::ClickEvent;
use url_shortener_core::runtime::{self, Runtime};
use url_shortener_core::telemetry::init_tracing;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;

/// CLI tool for the URL shortener.
#[derive(Parser)]
#[command(name = "url-shortener")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Shorten a URL
    Create {
        /// Absolute URL to shorten
        url: String,
    },

    /// Show a link and its total clicks
    Stats {
        /// Short code of the link
        code: String,
    },

    /// Record a click on a link through the click queue
    Click {
        /// Short code of the link
        code: String,

        #[arg(long)]
        user_agent: Option<String>,

        #[arg(long)]
        referer: Option<String>,

        #[arg(long)]
        ip: Option<String>,
    },

    /// List all links
    Links,

    /// Apply database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = load_from_env()?;
    init_tracing(&config);
    config.print_summary();

    let json = cli.json;

    match cli.command {
        Commands::Migrate => migrate(&config).await,
        Commands::Create { url } => {
            let runtime = runtime::start(&config).await?;
            let result = create(&runtime, &url, json).await;
            runtime.shutdown().await?;
            result
        }
        Commands::Stats { code } => {
            let runtime = runtime::start(&config).await?;
            let result = stats(&runtime, &code, json).await;
            runtime.shutdown().await?;
            result
        }
        Commands::Click {
            code,
            user_agent,
            referer,
            ip,
        } => {
            let runtime = runtime::start(&config).await?;
            click(runtime, &code, user_agent, referer, ip, json).await
        }
        Commands::Links => {
            let runtime = runtime::start(&config).await?;
            let result = links(&runtime, json).await;
            runtime.shutdown().await?;
            result
        }
    }
}

/// Prints the error as JSON when requested and converts it for `main`.
fn report(err: AppError, json: bool) -> anyhow::Error {
    if json {
        println!("{}", err.to_json());
    }
    anyhow::Error::new(err)
}

async fn migrate(config: &Config) -> Result<()> {
    if config.is_memory_store() {
        println!("{}", "Nothing to migrate for the in-memory store".yellow());
        return Ok(());
    }

    let pool = runtime::connect_pool(config).await?;
    runtime::run_migrations(&pool).await?;

    println!("{}", "✅ Migrations applied".green().bold());
    Ok(())
}

async fn create(runtime: &Runtime, url: &str, json: bool) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("'{url}' is not an absolute URL"))?;

    let link = runtime
        .state
        .link_service
        .create_link(url)
        .await
        .map_err(|e| report(e, json))?;

    let short_url = link.short_url(&runtime.state.base_url);

    if json {
        println!(
            "{}",
            serde_json::json!({ "link": link, "short_url": short_url })
        );
        return Ok(());
    }

    println!("{}", "✅ Link created".green().bold());
    println!("  Code:      {}", link.short_code.bright_yellow().bold());
    println!("  Short URL: {}", short_url.cyan());
    println!("  Target:    {}", link.long_url.bright_black());

    Ok(())
}

async fn stats(runtime: &Runtime, code: &str, json: bool) -> Result<()> {
    let stats = runtime
        .state
        .link_service
        .get_link_stats(code)
        .await
        .map_err(|e| report(e, json))?;

    if json {
        println!("{}", serde_json::to_string(&stats)?);
        return Ok(());
    }

    println!("{}", "📊 Link statistics".bright_blue().bold());
    println!();
    println!("  Code:    {}", stats.link.short_code.cyan());
    println!("  Target:  {}", stats.link.long_url);
    println!(
        "  Created: {}",
        stats
            .link
            .created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!(
        "  Clicks:  {}",
        stats.total_clicks.to_string().bright_white().bold()
    );

    Ok(())
}

async fn click(
    runtime: Runtime,
    code: &str,
    user_agent: Option<String>,
    referer: Option<String>,
    ip: Option<String>,
    json: bool,
) -> Result<()> {
    let lookup = runtime.state.link_service.get_link_by_short_code(code).await;
    let link = match lookup {
        Ok(link) => link,
        Err(e) => {
            runtime.shutdown().await?;
            return Err(report(e, json));
        }
    };

    let event = ClickEvent::new(link.id, ip, user_agent.as_deref(), referer.as_deref());
    let queued = runtime.state.track_click(event);
    let click_service = runtime.state.click_service.clone();

    runtime.shutdown().await?;

    if !queued {
        anyhow::bail!("Click queue rejected the event");
    }

    let total = click_service
        .get_clicks_count_by_link_id(link.id)
        .await
        .map_err(|e| report(e, json))?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "link_id": link.id, "short_code": link.short_code, "total_clicks": total })
        );
        return Ok(());
    }

    println!("{}", "✅ Click recorded".green().bold());
    println!(
        "  {} now has {} clicks",
        link.short_code.cyan(),
        total.to_string().bright_white().bold()
    );

    Ok(())
}

async fn links(runtime: &Runtime, json: bool) -> Result<()> {
    let links = runtime
        .state
        .link_service
        .get_all_links()
        .await
        .map_err(|e| report(e, json))?;

    if json {
        println!("{}", serde_json::to_string(&links)?);
        return Ok(());
    }

    println!("{}", "📋 Links".bright_blue().bold());
    println!();

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<6} {:<10} {:<20} {}",
        "ID".bright_white().bold(),
        "Code".bright_white().bold(),
        "Created".bright_white().bold(),
        "Target".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<6} {:<10} {:<20} {}",
            link.id.to_string().bright_black(),
            link.short_code.cyan(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.long_url
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());

    Ok(())
}
