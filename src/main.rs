// src/main.rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use srpm_import::import::{self, ImportOptions, PackageReference};
use srpm_import::import::classify::is_archive_like;
use srpm_import::packages::rpm::RpmSourcePackage;
use srpm_import::{ImportConfig, SourcePackage};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "srpm-import")]
#[command(author, version, about = "Import RPM source packages into git working trees", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a source RPM into a git repository
    Import {
        /// Path to the source RPM
        package_path: PathBuf,
        /// Target distribution version (branch becomes <prefix><version>)
        #[arg(short = 'v', long = "dist-version")]
        dist_version: u32,
        /// Repository directory (created if missing)
        #[arg(short, long)]
        dest: PathBuf,
        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Converter program (default: rpm2cpio)
        #[arg(long)]
        converter: Option<String>,
        /// Branch name prefix (default: rocky)
        #[arg(long)]
        branch_prefix: Option<String>,
        /// Leave the result staged instead of committing
        #[arg(long)]
        no_commit: bool,
        /// Skip the lookaside metadata file
        #[arg(long)]
        no_lookaside: bool,
    },
    /// Show declared sources and patches and how they would be handled
    Inspect {
        /// Path to the source RPM
        package_path: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> Result<ImportConfig> {
    match path {
        Some(path) => ImportConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(ImportConfig::default()),
    }
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Import {
            package_path,
            dist_version,
            dest,
            config,
            converter,
            branch_prefix,
            no_commit,
            no_lookaside,
        }) => {
            let mut config = load_config(config.as_deref())?;
            if let Some(converter) = converter {
                config.converter = converter;
            }
            if let Some(prefix) = branch_prefix {
                config.branch_prefix = prefix;
            }

            let options = ImportOptions {
                lookaside: !no_lookaside,
                commit: !no_commit,
            };

            info!("Importing {} into {}", package_path.display(), dest.display());
            let reference = PackageReference::new(&package_path, dist_version);
            let outcome = import::run_import(reference, &dest, &config, options)
                .with_context(|| format!("Failed to import {}", package_path.display()))?;

            println!("Imported {}", package_path.display());
            println!("  Written: {}", outcome.tree.written.len());
            println!("  Staged: {}", outcome.tree.staged.len());
            println!("  Branch: {}", outcome.tree.branches.join(", "));
            for record in &outcome.lookaside {
                println!("  Lookaside: {} {}", record.path.display(), record.sha256.to_prefixed_string());
            }
            match outcome.commit {
                Some(oid) => println!("  Commit: {}", oid),
                None => println!("  Not committed (--no-commit)"),
            }
            Ok(())
        }
        Some(Commands::Inspect { package_path }) => {
            let package = RpmSourcePackage::parse(&package_path)
                .with_context(|| format!("Failed to read {}", package_path.display()))?;

            println!("Package: {} {}", package.name(), package.version());
            if let Some(release) = package.release() {
                println!("  Release: {}", release);
            }
            println!("  Sources:");
            for source in package.sources() {
                let handling = if is_archive_like(source) { "ignored" } else { "tracked" };
                println!("    {} ({})", source, handling);
            }
            println!("  Patches:");
            for patch in package.patches() {
                println!("    {}", patch);
            }
            println!("  Files:");
            for file in package.files() {
                println!("    {:04o} {} [{}]", file.mode, file.name, file.role);
            }
            Ok(())
        }
        None => {
            println!("srpm-import v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'srpm-import --help' for usage information");
            Ok(())
        }
    }
}
