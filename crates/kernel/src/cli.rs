//! Command-line interface.
//!
//! `serve` starts the HTTP server; the other commands operate with a
//! minimal context (database pool only) and exit.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sqlx::PgPool;

use crate::config::Config;
use crate::content::Seed;
use crate::db;
use crate::models::{Author, ContentType, Item, Taxonomy, Term};

#[derive(Parser, Debug)]
#[command(name = "vitrine", version, about = "Portfolio query service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Start the HTTP server (default).
    Serve,
    /// Apply database migrations.
    Migrate,
    /// Load a YAML seed file into the database.
    Import {
        /// Path to the seed file.
        seed: PathBuf,
        /// Validate the seed without writing anything.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
}

/// Connect to the configured database.
async fn connect(config: &Config) -> Result<PgPool> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set for this command")?;
    db::create_pool(url, config.database_max_connections).await
}

/// Apply the embedded migrations.
pub async fn cmd_migrate(config: &Config) -> Result<()> {
    let pool = connect(config).await?;
    db::run_migrations(&pool).await?;
    println!("Migrations applied.");
    Ok(())
}

/// Import a seed file, inserting or updating every record it contains.
pub async fn cmd_import(config: &Config, path: &Path, dry_run: bool) -> Result<()> {
    let seed = Seed::load(path)?;
    let items = seed.stored_items()?;

    if dry_run {
        print_summary("Seed is valid", &seed);
        return Ok(());
    }

    let pool = connect(config).await?;
    db::run_migrations(&pool).await?;
    import_seed(&pool, &seed, &items).await?;

    print_summary("Imported", &seed);
    println!(
        "Running servers keep cached filter catalogs for up to {}s; \
         POST /api/portfolio/cache/invalidate to refresh them now.",
        config.catalog_cache_ttl_secs
    );
    Ok(())
}

/// Write a seed to the database in dependency order.
pub async fn import_seed(pool: &PgPool, seed: &Seed, items: &[Item]) -> Result<()> {
    for taxonomy in &seed.taxonomies {
        Taxonomy::upsert(pool, taxonomy).await?;
    }
    for content_type in &seed.content_types {
        ContentType::upsert(pool, content_type).await?;
    }
    for author in &seed.authors {
        Author::upsert(pool, author).await?;
    }
    for term in &seed.terms {
        Term::upsert(pool, term).await?;
    }
    for item in items {
        Item::upsert(pool, item)
            .await
            .with_context(|| format!("failed to import item {}", item.id))?;
    }
    Ok(())
}

fn print_summary(heading: &str, seed: &Seed) {
    println!("{heading}:");
    println!("  {:<15} {}", "content types", seed.content_types.len());
    println!("  {:<15} {}", "taxonomies", seed.taxonomies.len());
    println!("  {:<15} {}", "terms", seed.terms.len());
    println!("  {:<15} {}", "authors", seed.authors.len());
    println!("  {:<15} {}", "items", seed.items.len());
}
