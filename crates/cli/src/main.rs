mod args;
mod config;

use std::io::{self, IsTerminal, Write};

use anyhow::Context;
use clap::Parser;
use mediamap_core::{ItemError, ProviderKind};
use mediamap_metadata::{CachedProvider, CatalogProvider, TmdbClient, TvdbClient};
use mediamap_renamer::{Decision, NameResolver, Reconciler, diff, execute};
use mediamap_scanner::ChangeSet;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::args::Cli;
use crate::config::{AUTH_CONFIG_ENV, AuthConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with prompts
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(io::stderr)
        .init();

    let location = match cli.location.clone() {
        Some(location) => location,
        None => std::env::current_dir().context("failed to read current directory")?,
    };

    let encoded = std::env::var(AUTH_CONFIG_ENV).ok();
    let auth = AuthConfig::load(encoded.as_deref(), cli.auth.as_deref())
        .context("failed to load auth configuration")?;

    let kind = ProviderKind::from(cli.database);
    let provider = connect(kind, &auth).await?;
    info!(database = %kind, "catalog ready");

    let mut changes = mediamap_scanner::discover(&location)
        .with_context(|| format!("failed to discover media under {}", location.display()))?;

    let resolver = NameResolver::new(CachedProvider::new(provider));
    let errors = resolver.resolve_all(&mut changes).await;
    changes.retain_pending();

    let colour = !cli.no_colour && io::stdout().is_terminal();
    let mut stdout = io::stdout().lock();

    if changes.is_empty() {
        diff::write_warnings(&mut stdout, &errors, colour)?;
        writeln!(stdout, "Nothing to rename")?;
        return Ok(());
    }

    write_preview(&mut stdout, &cli, &changes, &errors, colour)?;
    if cli.dry_run {
        return Ok(());
    }

    if !cli.yes {
        let decision = Reconciler::new(&mut changes, io::stdin().lock(), &mut stdout)
            .with_colour(colour)
            .run()
            .context("failed to read operator input")?;
        if decision == Decision::Discard {
            return Ok(());
        }
    }

    let report = execute(&mut changes);
    writeln!(
        stdout,
        "Renamed {} file(s), {} failed",
        report.renamed.len(),
        report.failures.len()
    )?;
    for failure in &report.failures {
        writeln!(stdout, "! {failure}")?;
    }

    Ok(())
}

/// The batch diff, skipped by `--yes` unless it is a dry run, followed by
/// the match errors, which are always shown.
fn write_preview<W: Write>(
    out: &mut W,
    cli: &Cli,
    changes: &ChangeSet,
    errors: &[ItemError],
    colour: bool,
) -> io::Result<()> {
    if !cli.yes || cli.dry_run {
        diff::write_batch_diff(out, changes, colour)?;
    }
    diff::write_warnings(out, errors, colour)
}

async fn connect(kind: ProviderKind, auth: &AuthConfig) -> anyhow::Result<Box<dyn CatalogProvider>> {
    let provider: Box<dyn CatalogProvider> = match kind {
        ProviderKind::Tmdb => Box::new(TmdbClient::new(&auth.tmdb_key()?)),
        ProviderKind::Tvdb => {
            let credentials = auth.tvdb_credentials()?;
            Box::new(
                TvdbClient::login(&credentials)
                    .await
                    .context("failed to log in to TVDB")?,
            )
        }
    };
    Ok(provider)
}
