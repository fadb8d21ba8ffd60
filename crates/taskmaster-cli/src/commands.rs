//! Subcommand implementations.
//!
//! Each command loads the store, performs one store operation, and prints a
//! plain-text result. Errors bubble up to `main` and exit non-zero.

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveTime, Utc};
use dialoguer::Password;
use taskmaster_core::{Task, TaskCategory, TaskChanges, TaskDraft, schedule};
use taskmaster_settings::Settings;
use taskmaster_store::TaskStore;
use taskmaster_store::auth::{self, AuthClient};
use tracing::warn;

pub async fn login(
    settings: &Settings,
    email: &str,
    password: Option<String>,
    signup: bool,
) -> Result<()> {
    if settings.remote.url.is_empty() {
        bail!("no remote URL configured — set remote.url in settings or TASKMASTER_URL");
    }
    let password = match password {
        Some(p) => p,
        None => Password::new().with_prompt("Password").interact()?,
    };

    let client = AuthClient::new(&settings.remote.url, &settings.remote.anon_key)?;
    let session = if signup {
        client.sign_up(email, &password).await?
    } else {
        client.sign_in(email, &password).await?
    };
    auth::save_session_to(&auth::session_path(), &session)?;

    println!("Signed in as {email}.");
    Ok(())
}

pub async fn logout(settings: &Settings) -> Result<()> {
    let path = auth::session_path();
    if let Some(session) = auth::load_session_from(&path)? {
        if !settings.remote.url.is_empty() {
            let client = AuthClient::new(&settings.remote.url, &settings.remote.anon_key)?;
            // Best-effort: the local session is forgotten either way.
            if let Err(e) = client.sign_out(&session).await {
                warn!(error = %e, "server-side sign-out failed");
            }
        }
    }
    auth::clear_session_at(&path)?;
    println!("Signed out.");
    Ok(())
}

pub async fn add(
    store: &mut TaskStore,
    title: String,
    description: Option<String>,
    category: TaskCategory,
    due: Option<NaiveDate>,
    time: Option<NaiveTime>,
) -> Result<()> {
    let now_local = Utc::now().with_timezone(&store.zone()).naive_local();
    let due_local = due
        .unwrap_or_else(|| now_local.date())
        .and_time(time.unwrap_or_else(|| now_local.time()));

    let task = store
        .add(TaskDraft {
            title,
            description,
            category,
            due_local,
        })
        .await?;

    println!(
        "Added {} — \"{}\" due {}",
        task.id,
        task.title,
        format_due(&task, store)
    );
    Ok(())
}

pub async fn list(store: &mut TaskStore, all: bool) -> Result<()> {
    store.load().await?;

    let tasks: Vec<&Task> = if all {
        store.tasks().iter().collect()
    } else {
        store.pending()
    };
    if tasks.is_empty() {
        println!("No tasks.");
        return Ok(());
    }

    let now = Utc::now();
    for task in tasks {
        let marker = if task.status.is_complete() {
            "✓"
        } else if task.is_overdue(now) {
            "!"
        } else {
            " "
        };
        println!(
            "{marker} {}  {}  [{}]  {}",
            task.id,
            format_due(task, store),
            task.category,
            task.title
        );
    }
    Ok(())
}

pub async fn show(store: &mut TaskStore, id: &str) -> Result<()> {
    store.load().await?;
    let task = store
        .get(id)
        .with_context(|| format!("task not found: {id}"))?;

    println!("id:          {}", task.id);
    println!("title:       {}", task.title);
    if let Some(ref description) = task.description {
        println!("description: {description}");
    }
    println!("category:    {}", task.category);
    println!("status:      {}", task.status);
    println!("due:         {}", format_due(task, store));
    if task.is_overdue(Utc::now()) {
        println!("overdue:     yes");
    }
    if let Some(ref completed_at) = task.completed_at {
        println!("completed:   {completed_at}");
    }
    Ok(())
}

pub async fn edit(
    store: &mut TaskStore,
    id: &str,
    description: Option<String>,
    category: Option<TaskCategory>,
    due: Option<NaiveDate>,
    time: Option<NaiveTime>,
) -> Result<()> {
    store.load().await?;
    let task = store
        .get(id)
        .cloned()
        .with_context(|| format!("task not found: {id}"))?;

    let mut changes = TaskChanges {
        description,
        category,
        ..Default::default()
    };

    if due.is_some() || time.is_some() {
        // Fill the half the user didn't give from the task's current
        // schedule, read back in their own timezone.
        let current = schedule::decode(&task.due_date, &task.due_time, store.zone())?;
        let due_local = due
            .unwrap_or_else(|| current.date())
            .and_time(time.unwrap_or_else(|| current.time()));
        let (due_date, due_time) = store.due_changes(due_local);
        changes.due_date = Some(due_date);
        changes.due_time = Some(due_time);
    }

    if changes.is_empty() {
        bail!("nothing to change — pass --description, --category, --due or --time");
    }

    let updated = store.update(id, changes).await?;
    println!("Updated {} — due {}", updated.id, format_due(&updated, store));
    Ok(())
}

pub async fn done(store: &mut TaskStore, id: &str) -> Result<()> {
    store.load().await?;
    let task = store.complete(id).await?;
    println!("Completed \"{}\".", task.title);
    Ok(())
}

pub async fn remove(store: &mut TaskStore, id: &str) -> Result<()> {
    store.load().await?;
    store.remove(id).await?;
    println!("Deleted {id}.");
    Ok(())
}

/// Render a task's due date/time as the user's wall-clock value.
fn format_due(task: &Task, store: &TaskStore) -> String {
    match schedule::decode(&task.due_date, &task.due_time, store.zone()) {
        Ok(local) => local.format("%Y-%m-%d %H:%M").to_string(),
        // Unparseable stored value: show it raw rather than fail the render.
        Err(_) => format!("{} {}", task.due_date, task.due_time),
    }
}
