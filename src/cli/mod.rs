//! Command-line interface for libris.
//!
//! Without a command, opens the interactive menu. One-shot commands list
//! collections, list or search a collection, and show the configuration.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::codec::{self, DecodePolicy};
use crate::core::{CatalogStore, Session};
use crate::domain::{Collection, SearchQuery};

pub mod input;
pub mod menu;
pub mod render;

pub use menu::Menu;

/// libris - catalog manager for book collections
#[derive(Parser, Debug)]
#[command(name = "libris")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Catalog file to load (overrides configuration)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Catalog file to write on exit (defaults to the loaded file)
    #[arg(long, global = true)]
    pub save: Option<PathBuf>,

    /// How to treat unreadable labels in the catalog file
    #[arg(long, global = true, value_enum, env = "LIBRIS_DECODE_POLICY")]
    pub policy: Option<PolicyArg>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Open the interactive menu (default)
    Shell,

    /// List collections
    Collections,

    /// List the records of a collection
    List {
        /// Collection name
        collection: String,
    },

    /// Search a collection by exact title, author and/or year
    Search {
        /// Collection name
        collection: String,

        /// Exact title
        #[arg(short, long)]
        title: Option<String>,

        /// Exact author
        #[arg(short, long)]
        author: Option<String>,

        /// Exact year
        #[arg(short, long, allow_hyphen_values = true)]
        year: Option<i32>,
    },

    /// Show resolved configuration
    Config,
}

/// Decode policy for CLI (maps to DecodePolicy)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    /// Abort on the first unreadable label
    Strict,

    /// Skip unreadable labels and keep going
    Skip,
}

impl From<PolicyArg> for DecodePolicy {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::Strict => DecodePolicy::Strict,
            PolicyArg::Skip => DecodePolicy::Skip,
        }
    }
}

/// Store and policy after applying flags over configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub store: CatalogStore,
    pub policy: DecodePolicy,
}

impl Cli {
    /// Resolve where to load from and save to
    pub fn settings(&self) -> Result<Settings> {
        let cfg = crate::config::config()?;

        let data = self.data.clone().unwrap_or_else(|| cfg.data_file.clone());
        let save = match (&self.save, &self.data) {
            (Some(save), _) => save.clone(),
            // An explicit --data without --save writes back to the same file
            (None, Some(data)) => data.clone(),
            (None, None) => cfg.save_file.clone(),
        };

        Ok(Settings {
            store: CatalogStore::new(data).with_save_path(save),
            policy: self.policy.map(Into::into).unwrap_or(cfg.decode_policy),
        })
    }

    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let command = self.command.clone().unwrap_or(Commands::Shell);
        if let Commands::Config = command {
            return show_config();
        }

        let settings = self.settings()?;
        match command {
            Commands::Shell => run_shell(&settings).await,
            Commands::Collections => list_collections(&settings).await,
            Commands::List { collection } => list_records(&settings, &collection).await,
            Commands::Search {
                collection,
                title,
                author,
                year,
            } => {
                let query = SearchQuery { title, author, year };
                search_collection(&settings, &collection, &query).await
            }
            Commands::Config => show_config(),
        }
    }
}

/// Load the catalog into a session, reporting skipped labels
async fn open_session(settings: &Settings) -> Result<Session> {
    let Some(decoded) = settings.store.load(settings.policy).await? else {
        return Ok(Session::default());
    };

    for skipped in &decoded.skipped {
        eprintln!("[WARNING] Skipped {}", skipped.error);
    }

    Ok(Session::new(decoded.collections))
}

/// Interactive menu: load, run, save
async fn run_shell(settings: &Settings) -> Result<()> {
    println!("[INFO] Catalog manager started");
    let mut session = open_session(settings).await?;

    if !session.is_empty() {
        println!(
            "[INFO] Loaded data from '{}'",
            settings.store.load_path().display()
        );
        render::write_collections(&mut io::stdout(), session.collections())?;
    }

    {
        let stdin = io::stdin();
        let mut menu = Menu::new(stdin.lock(), io::stdout());
        menu.run(&mut session)?;
    }

    // Input can end without passing through the menu's exit check
    let save_path = settings.store.save_path();
    if let Err(e) = codec::encode(session.collections()) {
        eprintln!(
            "[ERROR] Cannot save: {}. '{}' was left unchanged",
            e,
            save_path.display()
        );
        return Err(anyhow::Error::new(e).context("Catalog not saved"));
    }

    settings.store.save(session.collections()).await?;
    println!("[INFO] Data saved to '{}'", save_path.display());
    println!("[INFO] Stopped");

    Ok(())
}

/// List collections with their record counts
async fn list_collections(settings: &Settings) -> Result<()> {
    let session = open_session(settings).await?;
    render::write_collections(&mut io::stdout(), session.collections())?;
    Ok(())
}

/// List the records of one collection
async fn list_records(settings: &Settings, name: &str) -> Result<()> {
    let session = open_session(settings).await?;
    let collection = find_collection(&session, name)?;
    render::write_records(&mut io::stdout(), collection)?;
    Ok(())
}

/// Run a stratified search on one collection
async fn search_collection(settings: &Settings, name: &str, query: &SearchQuery) -> Result<()> {
    if query.is_empty() {
        anyhow::bail!("Give at least one of --title, --author or --year");
    }

    let session = open_session(settings).await?;
    let collection = find_collection(&session, name)?;
    render::write_search(&mut io::stdout(), collection, query)?;
    Ok(())
}

fn find_collection<'a>(session: &'a Session, name: &str) -> Result<&'a Collection> {
    session
        .find(name)
        .with_context(|| format!("Collection not found: {}", name))
}

/// Show resolved configuration
fn show_config() -> Result<()> {
    let cfg = crate::config::config()?;

    println!("libris configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:       {}", cfg.home.display());
    println!("  Load from:  {}", cfg.data_file.display());
    println!("  Save to:    {}", cfg.save_file.display());
    println!(
        "  Log file:   {}",
        cfg.log_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!();
    println!("Decode policy: {}", cfg.decode_policy);

    Ok(())
}
