use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use mediamap_core::ProviderKind;

/// Rename movies and TV episodes to canonical names looked up in an
/// online catalog.
#[derive(Debug, Parser)]
#[command(name = "mediamap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan (defaults to the current directory)
    #[arg(short, long)]
    pub location: Option<PathBuf>,

    /// Catalog database used for lookups
    #[arg(short, long, value_enum, default_value_t = Database::Tmdb)]
    pub database: Database,

    /// JSON file holding database credentials
    #[arg(short, long, env = "MEDIAMAP_AUTH")]
    pub auth: Option<PathBuf>,

    /// Apply every change without showing the diff or prompting
    #[arg(short, long)]
    pub yes: bool,

    /// Show what would change, then exit
    #[arg(long)]
    pub dry_run: bool,

    /// Disable coloured diff output
    #[arg(long)]
    pub no_colour: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Database {
    Tmdb,
    Tvdb,
}

impl From<Database> for ProviderKind {
    fn from(db: Database) -> Self {
        match db {
            Database::Tmdb => ProviderKind::Tmdb,
            Database::Tvdb => ProviderKind::Tvdb,
        }
    }
}
