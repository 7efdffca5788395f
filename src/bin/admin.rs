//! CLI administration tool for linkpulse.
//!
//! Creates and lists short links, shows click statistics, and checks the
//! databases without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a short link (prompts for the URL when omitted)
//! cargo run --bin admin -- link create https://example.com
//!
//! # List the latest links
//! cargo run --bin admin -- link list --limit 20
//!
//! # Overall statistics, or one code
//! cargo run --bin admin -- stats
//! cargo run --bin admin -- stats ab12cd
//!
//! # Check database connections
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): Code store connection string
//! - `ANALYTICS_DATABASE_URL` (optional): Aggregation store, defaults to `DATABASE_URL`
//! - `PUBLIC_BASE_URL` (optional): Prefix for printed short URLs

use linkpulse::application::services::{AnalyticsService, LinkService};
use linkpulse::error::AppError;
use linkpulse::infrastructure::persistence::{PgAggregateRepository, PgLinkRepository};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing linkpulse.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage short links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show click statistics, overall or for one code
    Stats {
        /// Short code to inspect
        code: Option<String>,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Create a new short link
    Create {
        /// Target URL (prompted when omitted)
        url: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List the most recently created links
    List {
        #[arg(short, long, default_value_t = 20)]
        limit: i64,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connections
    Check,

    /// Show database info
    Info,
}

struct Databases {
    links: PgPool,
    analytics: PgPool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let analytics_url = std::env::var("ANALYTICS_DATABASE_URL")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| database_url.clone());

    let links = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;
    let analytics = if analytics_url == database_url {
        links.clone()
    } else {
        PgPool::connect(&analytics_url)
            .await
            .context("Failed to connect to analytics database")?
    };

    let dbs = Databases { links, analytics };

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &dbs).await?,
        Commands::Stats { code } => handle_stats(code, &dbs).await?,
        Commands::Db { action } => handle_db_action(action, &dbs).await?,
    }

    Ok(())
}

fn app_err(e: AppError) -> anyhow::Error {
    anyhow::anyhow!("{} ({})", e, e.to_error_info().details)
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, dbs: &Databases) -> Result<()> {
    let base_url =
        std::env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let repo = Arc::new(PgLinkRepository::new(Arc::new(dbs.links.clone())));
    let service = LinkService::new(repo, base_url);

    match action {
        LinkAction::Create { url, yes } => create_link(&service, url, yes).await,
        LinkAction::List { limit } => list_links(&service, limit).await,
    }
}

/// Creates a short link with interactive prompts.
async fn create_link(service: &LinkService, url: Option<String>, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔗 Create Short Link".bright_blue().bold());
    println!();

    let long_url = match url {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Target URL")
            .with_initial_text("https://")
            .interact_text()?,
    };

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Shorten {}?", long_url))
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let link = service.create_short_link(&long_url).await.map_err(app_err)?;

    println!();
    println!("{}", "✅ Link created".green().bold());
    println!("  Code:      {}", link.code.bright_yellow().bold());
    println!("  Short URL: {}", service.short_url(&link.code).cyan());
    println!("  Target:    {}", link.target_url);
    println!();

    Ok(())
}

/// Lists recent links.
///
/// # Output Format
///
/// ```text
/// 📋 Links
///
///   Code     Created              Target
///   ──────────────────────────────────────────────────────────
///   ab12cd   2025-06-01 10:30     https://example.com
/// ```
async fn list_links(service: &LinkService, limit: i64) -> Result<()> {
    println!("{}", "📋 Links".bright_blue().bold());
    println!();

    let links = service.list_recent(limit).await.map_err(app_err)?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        println!(
            "  Create one with: {} admin -- link create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<8} {:<20} {}",
        "Code".bright_white().bold(),
        "Created".bright_white().bold(),
        "Target".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<8} {:<20} {}",
            link.code.cyan(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.target_url
        );
    }

    let total = service.count_links().await.map_err(app_err)?;

    println!();
    println!(
        "  Showing {} of {}",
        links.len().to_string().bright_white().bold(),
        total.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Displays click statistics.
async fn handle_stats(code: Option<String>, dbs: &Databases) -> Result<()> {
    let repo = Arc::new(PgAggregateRepository::new(Arc::new(dbs.analytics.clone())));
    let service = AnalyticsService::new(repo);

    if let Some(code) = code {
        let record = service.get_record(&code).await.map_err(app_err)?;

        println!("{}", format!("📊 Statistics for {}", code).bright_blue().bold());
        println!();
        println!(
            "  Target:       {}",
            record.target_url.as_deref().unwrap_or("(unregistered)")
        );
        println!(
            "  Clicks:       {}",
            record.total_clicks.to_string().bright_green().bold()
        );
        println!("  First seen:   {}", record.first_seen.format("%Y-%m-%d %H:%M:%S"));
        println!(
            "  Last clicked: {}",
            record
                .last_clicked
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "never".to_string())
        );
        println!("  Metadata:     {}", record.status);
        println!();
        return Ok(());
    }

    let overview = service.overview(Utc::now()).await.map_err(app_err)?;

    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();
    println!(
        "  Tracked codes: {}",
        overview.total_urls.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:        {}",
        overview.total_clicks.to_string().bright_green().bold()
    );
    println!(
        "  Last 24h:      {}",
        overview
            .clicks_over_time
            .iter()
            .map(|b| b.count)
            .sum::<i64>()
            .to_string()
            .bright_green()
            .bold()
    );

    if !overview.top_urls.is_empty() {
        println!();
        println!("  {}", "Top codes".bright_white().bold());
        for record in &overview.top_urls {
            println!(
                "    {:<8} {:>8}  {}",
                record.code.cyan(),
                record.total_clicks,
                record.target_url.as_deref().unwrap_or("")
            );
        }
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, dbs: &Databases) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connections...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(&dbs.links).await?;
            println!("{}", "✅ Code store connection OK".green().bold());

            sqlx::query("SELECT 1").fetch_one(&dbs.analytics).await?;
            println!("{}", "✅ Analytics store connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(&dbs.links)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
