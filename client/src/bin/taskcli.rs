//! Command-line front end for the task-management client core.
//!
//! Mostly a development and smoke-testing tool: every subcommand maps onto
//! one library operation against a live backend.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};

use client::auth::AuthFlow;
use client::dashboard;
use client::gateway::ApiGateway;
use client::profile::ProfileManager;
use client::session::SessionStore;
use client::tasks::{TaskManager, TaskScope};
use client::users::UserManager;
use client::view::{QueryState, SortField, StatusFilter};
use shared::types::{ImageUpload, RegistrationData, TaskDraft, TaskStatus};

#[derive(Parser)]
#[command(name = "taskcli")]
#[command(about = "Task-management client", version)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "client.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        username: String,
        email: String,
        password: String,
    },
    /// Sign in and persist the session
    Login { email: String, password: String },
    /// Drop the current session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List tasks with the usual table controls
    Tasks {
        #[arg(long, default_value = "")]
        search: String,
        /// Status filter (wire value, e.g. "pending"); omit for all
        #[arg(long)]
        status: Option<String>,
        #[arg(long, value_enum, default_value = "title")]
        sort: SortColumn,
        /// Sort descending
        #[arg(long)]
        desc: bool,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Admin: list every user's tasks
        #[arg(long)]
        all: bool,
    },
    /// Add a task
    Add {
        title: String,
        description: String,
        #[arg(long, default_value = "pending")]
        status: String,
        #[arg(long, default_value_t = 0)]
        progress: u8,
    },
    /// Delete a task by id
    Remove { id: String },
    /// Admin: list users
    Users {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Admin: user/task totals and recent activity
    Overview,
    /// Upload or clear the profile picture
    Avatar {
        /// Image file to upload
        #[arg(long, conflicts_with = "remove")]
        file: Option<PathBuf>,
        /// Clear the stored picture instead
        #[arg(long)]
        remove: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortColumn {
    Id,
    Title,
    Description,
    Status,
    Progress,
    Created,
}

impl From<SortColumn> for SortField {
    fn from(column: SortColumn) -> Self {
        match column {
            SortColumn::Id => Self::Id,
            SortColumn::Title => Self::Title,
            SortColumn::Description => Self::Description,
            SortColumn::Status => Self::Status,
            SortColumn::Progress => Self::Progress,
            SortColumn::Created => Self::CreatedAt,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = shared::config::load_config(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config))?;

    let session = match &config.session.persist_path {
        Some(path) => SessionStore::with_persistence(path),
        None => SessionStore::new(),
    };
    let gateway = Arc::new(ApiGateway::new(config.server.base_url.clone()));

    match cli.command {
        Commands::Register {
            username,
            email,
            password,
        } => {
            let auth = AuthFlow::new(gateway, session);
            let ack = auth
                .register(RegistrationData {
                    username: username.clone(),
                    email,
                    password,
                })
                .await?;
            println!(
                "Registered {}",
                ack.username.unwrap_or(username)
            );
        }

        Commands::Login { email, password } => {
            let auth = AuthFlow::new(gateway, session);
            let user = auth.login(&email, &password).await?;
            println!("Signed in as {} ({})", user.username, user.role);
        }

        Commands::Logout => {
            AuthFlow::new(gateway, session).logout();
            println!("Signed out");
        }

        Commands::Whoami => {
            let state = session.current();
            match state.user {
                Some(user) => println!("{} <{}> role={}", user.username, user.email, user.role),
                None => println!("Not signed in"),
            }
        }

        Commands::Tasks {
            search,
            status,
            sort,
            desc,
            page,
            all,
        } => {
            let scope = if all { TaskScope::All } else { TaskScope::Mine };
            let mut manager =
                TaskManager::new(gateway, session, config.uploads.clone(), scope);
            manager.load().await?;

            let mut state = QueryState::new(config.view.page_size);
            state.set_search(search);
            if let Some(value) = status {
                state.set_status(StatusFilter::Only(TaskStatus::from(value)));
            }
            state.sort_by(sort.into());
            if desc {
                // A second click on the same column flips to descending.
                state.sort_by(sort.into());
            }
            state.set_page(page);

            let view = manager.view(state.query());
            for task in &view.items {
                println!(
                    "{}  {:<30}  {:<12}  {:>3}%",
                    task.id,
                    task.title,
                    task.status.as_str(),
                    task.progress
                );
            }
            println!(
                "Page {}/{} ({} matching)",
                view.current_page, view.total_pages, view.total_matching
            );
        }

        Commands::Add {
            title,
            description,
            status,
            progress,
        } => {
            let mut manager = TaskManager::new(
                gateway,
                session,
                config.uploads.clone(),
                TaskScope::Mine,
            );
            let mut draft = TaskDraft::new(title, description);
            draft.status = TaskStatus::from(status);
            draft.progress = progress;
            let task = manager.add(draft).await?;
            println!("Created task {}", task.id);
        }

        Commands::Remove { id } => {
            let mut manager = TaskManager::new(
                gateway,
                session,
                config.uploads.clone(),
                TaskScope::Mine,
            );
            manager.remove(&id).await?;
            println!("Removed task {id}");
        }

        Commands::Users { search } => {
            let mut manager = UserManager::new(gateway, session);
            manager.load().await?;
            let matching = manager.apply_filter(&search);
            for user in &matching {
                println!(
                    "{}  {:<20}  {}",
                    user.id,
                    user.display_name(),
                    user.email
                );
            }
            println!("Showing {} of {} users", matching.len(), manager.users().len());
        }

        Commands::Overview => {
            let mut tasks = TaskManager::new(
                gateway.clone(),
                session.clone(),
                config.uploads.clone(),
                TaskScope::All,
            );
            let mut users = UserManager::new(gateway, session);
            tasks.load().await?;
            users.load().await?;

            let stats = dashboard::overview(users.users(), tasks.tasks());
            println!("Users: {}", stats.total_users);
            println!("Tasks: {}", stats.total_tasks);
            println!("Recent:");
            for task in &stats.recent_tasks {
                println!(
                    "  {}  {}  ({})",
                    task.id,
                    task.title,
                    task.created_at.as_deref().unwrap_or("no date")
                );
            }
        }

        Commands::Avatar { file, remove } => {
            let manager = ProfileManager::new(gateway, session, config.uploads.clone());
            if remove {
                manager.remove_picture().await?;
                println!("Profile picture removed");
            } else if let Some(path) = file {
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let file_name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("avatar")
                    .to_string();
                let content_type = content_type_for(&path)?;
                let reference = manager
                    .upload_picture(ImageUpload {
                        file_name,
                        content_type,
                        bytes: bytes.into(),
                    })
                    .await?;
                println!(
                    "Profile picture updated ({})",
                    reference.as_deref().unwrap_or("no reference returned")
                );
            } else {
                bail!("Pass --file <path> to upload or --remove to clear");
            }
        }
    }

    Ok(())
}

fn content_type_for(path: &std::path::Path) -> Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    let content_type = match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        other => bail!("Unsupported image extension: {other:?}"),
    };
    Ok(content_type.to_string())
}
