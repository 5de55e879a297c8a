//! `histlink` command-line probe.
//!
//! # Responsibility
//! - Run single engine operations against registry snapshot files.
//! - Run a batch link and persist it to the configured link store.
//!
//! Output is pretty JSON on stdout. Usage errors exit with code 2 (clap),
//! runtime errors with code 1.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use histlink_core::db::{open_db, open_db_in_memory};
use histlink_core::{
    compute_backlinks, generate_aliases, init_logging, match_person, match_place, parse_date,
    BacklinkOptions, EngineConfig, EntityKind, LinkRepository, LinkingService, NicknameTable,
    RawRecord, Registry, SqliteLinkRepository,
};
use log::info;
use serde_json::json;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "histlink", version)]
#[command(about = "Entity resolution and backlink probe for history archive data")]
struct Cli {
    /// JSON engine config (logging, link store, nickname table)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a free-text historical date
    ParseDate { text: String },

    /// Print the alias set of a display name
    Aliases { name: String },

    /// Resolve a person fragment against a registry snapshot
    MatchPerson { registry: PathBuf, text: String },

    /// Resolve a location caption against a registry snapshot
    MatchPlace { registry: PathBuf, text: String },

    /// List entities that reference one entity
    Backlinks {
        registry: PathBuf,
        #[arg(value_parser = parse_kind)]
        kind: EntityKind,
        slug: String,
        /// Also include free-text mentions in either direction
        #[arg(long)]
        mentions: bool,
    },

    /// Batch link raw records and store the result
    Link { registry: PathBuf, records: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config `{}`", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.effective_log_level(), &log_dir.to_string_lossy())
            .map_err(|err| anyhow!("initializing logging: {err}"))?;
    }
    let nicknames = config.nickname_table().context("building nickname table")?;

    let output = match cli.command {
        Command::ParseDate { text } => serde_json::to_value(parse_date(&text))?,
        Command::Aliases { name } => serde_json::to_value(generate_aliases(&name, &nicknames))?,
        Command::MatchPerson { registry, text } => {
            let registry = load_registry(&registry)?;
            serde_json::to_value(match_person(&text, &registry, &nicknames))?
        }
        Command::MatchPlace { registry, text } => {
            let registry = load_registry(&registry)?;
            serde_json::to_value(match_place(&text, &registry))?
        }
        Command::Backlinks {
            registry,
            kind,
            slug,
            mentions,
        } => {
            let registry = load_registry(&registry)?;
            let options = BacklinkOptions {
                include_mentions: mentions,
            };
            let result = compute_backlinks(kind, &slug, &registry, &options, &nicknames);
            serde_json::to_value(result)?
        }
        Command::Link { registry, records } => {
            let registry = load_registry(&registry)?;
            let records = load_records(&records)?;
            run_link(&config, &registry, &records, nicknames)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_link(
    config: &EngineConfig,
    registry: &Registry,
    records: &[RawRecord],
    nicknames: NicknameTable,
) -> Result<serde_json::Value> {
    let conn = match &config.database_path {
        Some(path) => open_db(path)
            .with_context(|| format!("opening link store `{}`", path.display()))?,
        None => open_db_in_memory()?,
    };
    let service = LinkingService::with_nicknames(SqliteLinkRepository::new(&conn), nicknames);
    let report = service.run_batch(registry, records)?;
    info!(
        "event=cli_link module=cli status=ok persisted={}",
        config.database_path.is_some()
    );

    Ok(json!({
        "report": report,
        "links": service.repo().all_links()?,
        "unmatched": service.repo().unmatched_fragments()?,
    }))
}

fn load_registry(path: &Path) -> Result<Registry> {
    Registry::load(path).with_context(|| format!("loading registry `{}`", path.display()))
}

fn load_records(path: &Path) -> Result<Vec<RawRecord>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading records `{}`", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing records `{}`", path.display()))
}

fn parse_kind(value: &str) -> Result<EntityKind, String> {
    EntityKind::parse(value).ok_or_else(|| format!("expected person|place|topic, got `{value}`"))
}
