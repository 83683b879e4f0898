use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use omnitalk_infrastructure::{Settings, StoreSet};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "omnitalk")]
#[command(about = "OmniTalk CLI - inspect and edit persisted client state", long_about = None)]
struct Cli {
    /// Path to settings.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Session configuration (mode, user)
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Group store: known groups and the current selection
    Group {
        #[command(subcommand)]
        action: GroupAction,
    },
    /// Group catalog: create, rename and delete groups
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Per-group bot conversation context
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the stored configuration
    Show,
    /// Set the interaction mode
    SetMode {
        /// `parallel` or `serial`
        mode: String,
    },
}

#[derive(Subcommand)]
enum GroupAction {
    /// List groups known to the group store
    List,
    /// Print the currently selected group
    Current,
    /// Print the bots of the currently selected group
    Bots,
    /// Select a group by id
    Select { group_id: String },
    /// Replace the group store's list with the catalog's
    Sync,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List catalog groups
    List,
    /// Create a group
    Create {
        name: String,
        /// Comma-separated bot ids
        #[arg(long, value_delimiter = ',', required = true)]
        bots: Vec<String>,
    },
    /// Rename a group and replace its bots
    Update {
        group_id: String,
        name: String,
        /// Comma-separated bot ids
        #[arg(long, value_delimiter = ',', required = true)]
        bots: Vec<String>,
    },
    /// Delete a group
    Delete { group_id: String },
}

#[derive(Subcommand)]
enum ContextAction {
    /// Print a group's context
    Show { group_id: String },
    /// Append a message to a bot's history in a group
    Add {
        group_id: String,
        bot: String,
        /// Message role, e.g. `user` or `assistant`
        role: String,
        content: String,
    },
    /// Clear a group's context, or only one bot's history
    Clear {
        group_id: String,
        #[arg(long)]
        bot: Option<String>,
    },
    /// Print the histories of bots across all groups
    Collect {
        /// Comma-separated bot ids
        #[arg(long, value_delimiter = ',', required = true)]
        bots: Vec<String>,
    },
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.settings.as_deref()).context("Failed to load settings")?;
    init_logging(&settings.log_level);
    tracing::debug!(?settings, "Settings loaded");

    let stores = StoreSet::open_from_settings(&settings).context("Failed to open stores")?;

    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&stores)?,
            ConfigAction::SetMode { mode } => commands::config::set_mode(&stores, &mode)?,
        },
        Commands::Group { action } => match action {
            GroupAction::List => commands::group::list(&stores)?,
            GroupAction::Current => commands::group::current(&stores)?,
            GroupAction::Bots => commands::group::bots(&stores)?,
            GroupAction::Select { group_id } => commands::group::select(&stores, &group_id)?,
            GroupAction::Sync => commands::group::sync(&stores)?,
        },
        Commands::Catalog { action } => match action {
            CatalogAction::List => commands::catalog::list(&stores)?,
            CatalogAction::Create { name, bots } => {
                commands::catalog::create(&stores, &name, bots)?
            }
            CatalogAction::Update {
                group_id,
                name,
                bots,
            } => commands::catalog::update(&stores, &group_id, &name, bots)?,
            CatalogAction::Delete { group_id } => commands::catalog::delete(&stores, &group_id)?,
        },
        Commands::Context { action } => match action {
            ContextAction::Show { group_id } => commands::context::show(&stores, &group_id)?,
            ContextAction::Add {
                group_id,
                bot,
                role,
                content,
            } => commands::context::add(&stores, &group_id, &bot, &role, &content)?,
            ContextAction::Clear { group_id, bot } => {
                commands::context::clear(&stores, &group_id, bot.as_deref())?
            }
            ContextAction::Collect { bots } => commands::context::collect(&stores, &bots)?,
        },
    }

    Ok(())
}
