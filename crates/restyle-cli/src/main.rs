mod cli;
mod files;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use rayon::prelude::*;
use restyle_core::{Migration, Migrator};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

enum Outcome {
    Migrated,
    Unchanged,
    Failed,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Migrate {
            paths,
            dry_run,
            options,
        } => options
            .resolve()
            .map_err(anyhow::Error::from)
            .and_then(|config| migrate(Migrator::new(config), &paths, dry_run)),
        Commands::Css { file, options } => options
            .resolve()
            .map_err(anyhow::Error::from)
            .and_then(|config| print_css(&Migrator::new(config), &file)),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn migrate(migrator: Migrator, paths: &[PathBuf], dry_run: bool) -> Result<ExitCode> {
    let files = files::collect_sources(paths)?;
    info!(files = files.len(), "migrating");

    let outcomes: Vec<Outcome> = files
        .par_iter()
        .map(|path| match migrate_file(&migrator, path, dry_run) {
            Ok(true) => Outcome::Migrated,
            Ok(false) => Outcome::Unchanged,
            Err(err) => {
                eprintln!("{}: {err:#}", path.display());
                Outcome::Failed
            }
        })
        .collect();

    let count = |wanted: fn(&Outcome) -> bool| outcomes.iter().filter(|o| wanted(o)).count();
    let migrated = count(|o| matches!(o, Outcome::Migrated));
    let unchanged = count(|o| matches!(o, Outcome::Unchanged));
    let failed = count(|o| matches!(o, Outcome::Failed));
    println!("{migrated} migrated, {unchanged} unchanged, {failed} failed");

    if failed > 0 {
        eprintln!("failures were recorded in {}", migrator.config().error_log_path.display());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Whether the file changed.
fn migrate_file(migrator: &Migrator, path: &Path, dry_run: bool) -> Result<bool> {
    let migration = run_migration(migrator, path)?;
    if !migration.changed {
        return Ok(false);
    }

    if dry_run {
        print_migration(path, &migration)?;
        return Ok(true);
    }

    if let Some(stylesheet) = &migration.stylesheet {
        fs::write(&stylesheet.path, &stylesheet.contents)
            .with_context(|| format!("Failed to write {}", stylesheet.path.display()))?;
        info!(path = %stylesheet.path.display(), "wrote stylesheet");
    }
    fs::write(path, &migration.source).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "migrated");
    Ok(true)
}

fn run_migration(migrator: &Migrator, path: &Path) -> Result<Migration> {
    let source = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    migrator.migrate(path, &source).map_err(|err| anyhow!(err.report()))
}

fn print_migration(path: &Path, migration: &Migration) -> Result<()> {
    let mut block = format!("==> {} <==\n{}", path.display(), migration.source);
    if let Some(stylesheet) = &migration.stylesheet {
        block.push_str(&format!("\n==> {} <==\n{}", stylesheet.path.display(), stylesheet.contents));
    }
    io::stdout().lock().write_all(block.as_bytes())?;
    Ok(())
}

fn print_css(migrator: &Migrator, file: &Path) -> Result<ExitCode> {
    let migration = run_migration(migrator, file)?;
    match migration.stylesheet {
        Some(stylesheet) => {
            print!("{}", stylesheet.contents);
            Ok(ExitCode::SUCCESS)
        }
        None => Err(anyhow!("no style table found in {}", file.display())),
    }
}
