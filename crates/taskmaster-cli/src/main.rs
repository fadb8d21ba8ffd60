//! `taskmaster` — command-line task manager.
//!
//! Thin interactive surface over [`taskmaster_store::TaskStore`]. Which
//! backing store it talks to (local SQLite or the hosted API) comes from
//! settings; see `taskmaster-settings`.

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use taskmaster_core::TaskCategory;
use taskmaster_settings::{BackendKind, Settings, load_settings};
use taskmaster_store::auth::{self, AuthClient};
use taskmaster_store::{LocalStore, RemoteStore, TaskStore};

mod commands;

#[derive(Parser)]
#[command(name = "taskmaster", version, about = "Organize your daily tasks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in to the hosted backend and persist the session.
    Login {
        /// Account email.
        email: String,
        /// Password; prompted for when omitted.
        #[arg(long)]
        password: Option<String>,
        /// Create the account instead of signing in.
        #[arg(long)]
        signup: bool,
    },
    /// Revoke and forget the persisted session.
    Logout,
    /// Add a new task.
    Add {
        /// Task title (must be non-empty).
        title: String,
        /// Longer description.
        #[arg(long, short)]
        description: Option<String>,
        /// Category: personal, work, study, health or other.
        #[arg(long, short, default_value = "personal")]
        category: TaskCategory,
        /// Due date, YYYY-MM-DD (defaults to today).
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Due time, HH:MM (defaults to the current time).
        #[arg(long)]
        time: Option<String>,
    },
    /// List tasks, soonest due first.
    List {
        /// Include completed tasks.
        #[arg(long, short)]
        all: bool,
    },
    /// Show one task in full.
    Show {
        /// Task id.
        id: String,
    },
    /// Edit fields of an existing task.
    Edit {
        /// Task id.
        id: String,
        /// New description.
        #[arg(long, short)]
        description: Option<String>,
        /// New category.
        #[arg(long, short)]
        category: Option<TaskCategory>,
        /// New due date, YYYY-MM-DD.
        #[arg(long)]
        due: Option<NaiveDate>,
        /// New due time, HH:MM.
        #[arg(long)]
        time: Option<String>,
    },
    /// Mark a task completed.
    Done {
        /// Task id.
        id: String,
    },
    /// Delete a task.
    Rm {
        /// Task id.
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("TASKMASTER_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = load_settings().context("failed to load settings")?;

    match cli.command {
        Command::Login {
            email,
            password,
            signup,
        } => commands::login(&settings, &email, password, signup).await,
        Command::Logout => commands::logout(&settings).await,
        Command::Add {
            title,
            description,
            category,
            due,
            time,
        } => {
            let mut store = open_store(&settings).await?;
            commands::add(&mut store, title, description, category, due, parse_time(time)?).await
        }
        Command::List { all } => {
            let mut store = open_store(&settings).await?;
            commands::list(&mut store, all).await
        }
        Command::Show { id } => {
            let mut store = open_store(&settings).await?;
            commands::show(&mut store, &id).await
        }
        Command::Edit {
            id,
            description,
            category,
            due,
            time,
        } => {
            let mut store = open_store(&settings).await?;
            commands::edit(&mut store, &id, description, category, due, parse_time(time)?).await
        }
        Command::Done { id } => {
            let mut store = open_store(&settings).await?;
            commands::done(&mut store, &id).await
        }
        Command::Rm { id } => {
            let mut store = open_store(&settings).await?;
            commands::remove(&mut store, &id).await
        }
    }
}

fn parse_time(time: Option<String>) -> Result<Option<NaiveTime>> {
    time.map(|t| {
        NaiveTime::parse_from_str(&t, "%H:%M").with_context(|| format!("invalid time '{t}' (expected HH:MM)"))
    })
    .transpose()
}

/// Build the task store for the configured backend variant.
async fn open_store(settings: &Settings) -> Result<TaskStore> {
    let zone = taskmaster_core::schedule::parse_zone(&settings.timezone)?;

    match settings.backend {
        BackendKind::Local => {
            let path = resolve_db_path(&settings.local.db_path);
            let backend = LocalStore::open(&path)
                .with_context(|| format!("failed to open database at {}", path.display()))?;
            Ok(TaskStore::new(
                Box::new(backend),
                settings.local.user.clone(),
                zone,
            ))
        }
        BackendKind::Remote => {
            if settings.remote.url.is_empty() {
                bail!("remote backend selected but no URL configured");
            }
            let session_path = auth::session_path();
            let Some(session) = auth::load_session_from(&session_path)? else {
                bail!("not signed in — run `taskmaster login <email>` first");
            };

            let client = AuthClient::new(&settings.remote.url, &settings.remote.anon_key)?;
            let session = client
                .ensure_valid(session)
                .await
                .context("session refresh failed; sign in again")?;
            auth::save_session_to(&session_path, &session)?;

            let user_id = session.user_id.clone();
            let backend = RemoteStore::new(&settings.remote.url, &settings.remote.anon_key, session)?;
            Ok(TaskStore::new(Box::new(backend), user_id, zone))
        }
    }
}

/// Relative db paths live under `~/.taskmaster`.
fn resolve_db_path(configured: &str) -> std::path::PathBuf {
    let path = std::path::Path::new(configured);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    std::path::PathBuf::from(home).join(".taskmaster").join(path)
}
