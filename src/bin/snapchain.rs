//! # snapchain CLI
//!
//! Command-line front end for inspecting backups on a remote and resolving
//! the chain a restore needs.
//!
//! ## Usage
//! ```bash
//! # List backups, one name per line
//! snapchain --remote /srv/backups list
//!
//! # Show kind and age as well
//! snapchain --remote /srv/backups list --detailed
//!
//! # Chain for the newest backup, in the order a restore applies it
//! snapchain --remote /srv/backups chain --restore-order
//!
//! # Chain for a named backup as JSON
//! snapchain --remote /srv/backups chain 20240103-0300 --json
//! ```
//!
//! Backup names and chains go to stdout. Logs and summaries go to stderr.

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use humantime::format_duration;
use snapchain::{
    Backup, BackupKind, CatalogOrder, ChainResolver, DirectoryRemote, ResolverBuilder, Selector,
    SnapchainConfig, SnapchainError,
};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// snapchain - resolve restore chains for incremental backups
#[derive(Parser)]
#[command(name = "snapchain")]
#[command(version)]
#[command(about = "Resolve full/incremental backup chains from a remote listing")]
#[command(long_about = None)]
struct Cli {
    /// Directory holding the backup index objects
    #[arg(short, long, global = true)]
    remote: Option<PathBuf>,

    /// Config file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// How backups are ordered in the catalog ("listing" or "modified")
    #[arg(long, global = true, value_parser = CatalogOrder::from_str)]
    order: Option<CatalogOrder>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List backups oldest first
    #[command(alias = "ls")]
    List {
        /// Show kind and age
        #[arg(short, long)]
        detailed: bool,
    },

    /// Show a single backup
    Find {
        /// Backup name
        name: String,
    },

    /// Show the backups needed to restore a target
    Chain {
        /// Backup name or "latest"
        #[arg(default_value = "latest")]
        target: String,

        /// Oldest first, the order a restore applies backups in
        #[arg(long)]
        restore_order: bool,

        /// Print JSON instead of names
        #[arg(long)]
        json: bool,
    },

    /// Write a config file from the current settings
    InitConfig {
        /// Where to write the config
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so listings stay pipeable
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli) {
        let message = match e.downcast_ref::<SnapchainError>() {
            Some(err) if err.is_not_found() || err.is_invalid_chain() || err.is_listing_failure() => {
                err.user_message()
            }
            _ => format!("{:#}", e),
        };
        eprintln!("{}: {}", "Error".red().bold(), message);
        std::process::exit(1);
    }
}

/// Main command runner
fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::List { detailed } => cmd_list(&config, detailed),
        Commands::Find { name } => cmd_find(&config, &name),
        Commands::Chain { target, restore_order, json } => {
            cmd_chain(&config, &target, restore_order, json)
        }
        Commands::InitConfig { path, force } => cmd_init_config(&config, path, force),
    }
}

/// Merge the config file with command-line overrides
///
/// Flags win over the file; without either the current directory is the
/// remote.
fn load_config(cli: &Cli) -> anyhow::Result<SnapchainConfig> {
    let mut config = match &cli.config {
        Some(path) => SnapchainConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SnapchainConfig::new("."),
    };

    if let Some(remote) = &cli.remote {
        config.remote_path = remote.clone();
    }
    if let Some(order) = cli.order {
        config.order = order;
    }

    Ok(config)
}

fn open_resolver(config: &SnapchainConfig) -> ChainResolver<DirectoryRemote> {
    ResolverBuilder::from_config(config).build(DirectoryRemote::new(&config.remote_path))
}

/// List backups
///
/// Plain output is one name per line in catalog order, which is what
/// scripts feeding `chain` expect.
fn cmd_list(config: &SnapchainConfig, detailed: bool) -> anyhow::Result<()> {
    let resolver = open_resolver(config);
    let catalog = resolver.catalog()?;

    if !detailed {
        for backup in &catalog {
            println!("{}", backup.name);
        }
        return Ok(());
    }

    if catalog.is_empty() {
        eprintln!("{}", "No backups found".yellow());
        return Ok(());
    }

    let width = catalog.iter().map(|b| b.name.len()).max().unwrap_or(0);
    for backup in &catalog {
        println!(
            "{:<width$}  {}  {}",
            backup.name,
            kind_label(backup.kind),
            format_age(backup),
            width = width
        );
    }
    eprintln!(
        "{} backups, {} full",
        catalog.len(),
        catalog.iter().filter(|b| b.is_full()).count()
    );

    Ok(())
}

/// Show a single backup
fn cmd_find(config: &SnapchainConfig, name: &str) -> anyhow::Result<()> {
    let resolver = open_resolver(config);
    let backup = resolver.find_backup(name)?;

    println!("{}", backup.name.bold());
    println!("  Kind: {}", kind_label(backup.kind));
    println!("  Object: {}", backup.object_name().cyan());
    if backup.modified.is_some() {
        println!("  Age: {}", format_age(&backup));
    }

    Ok(())
}

/// Show the restore chain for a target
fn cmd_chain(
    config: &SnapchainConfig,
    target: &str,
    restore_order: bool,
    json: bool,
) -> anyhow::Result<()> {
    let selector: Selector = target.parse()?;
    let resolver = open_resolver(config);
    let chain = resolver.find_chain(&selector)?;

    let backups: Vec<&Backup> = if restore_order {
        chain.restore_order().collect()
    } else {
        chain.iter().collect()
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&backups)?);
        return Ok(());
    }

    for backup in &backups {
        println!("{}", backup.name);
    }

    let summary = chain.summary();
    eprintln!(
        "{} {} from full backup {} with {} incremental(s)",
        "✓".green().bold(),
        summary.target.yellow(),
        summary.base.cyan(),
        summary.incrementals
    );

    Ok(())
}

/// Write a config file
fn cmd_init_config(config: &SnapchainConfig, path: PathBuf, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists. Use --force to overwrite.", path.display());
    }

    config
        .save(&path)
        .with_context(|| format!("writing config {}", path.display()))?;

    println!("{} Wrote {}", "✓".green().bold(), path.display().to_string().cyan());
    println!("  Remote: {}", config.remote_path.display());
    Ok(())
}

fn kind_label(kind: BackupKind) -> ColoredString {
    match kind {
        BackupKind::Full => kind.label().green(),
        BackupKind::Incremental => kind.label().yellow(),
    }
}

fn format_age(backup: &Backup) -> String {
    match backup.modified {
        Some(modified) => {
            let elapsed = (Utc::now() - modified).to_std().unwrap_or_default();
            format!("{} ago", format_duration(Duration::from_secs(elapsed.as_secs())))
        }
        None => "-".to_string(),
    }
}
