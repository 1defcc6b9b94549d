pub mod commands;
pub mod error;

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::DbConfig;
use crate::db::{Id, SqliteDatabase};
use commands::UserKey;
use commands::notification::InboxKind;
use error::{CliError, CliResult};

#[derive(Parser)]
#[command(name = "jobboard-db")]
#[command(author, version, about = "Job board database tool", long_about = None)]
pub struct Cli {
    /// Database file (default: JOBBOARD_DB_PATH env or the XDG data dir)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the bundled schema migrations
    Migrate,
    /// Applicant lookups
    Applicant {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Employer lookups
    Employer {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Notification inbox commands
    Notifications {
        #[command(subcommand)]
        command: NotificationCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Show one user as JSON
    #[command(group(ArgGroup::new("key").required(true).args(["id", "email"])))]
    Show {
        /// User ID
        #[arg(long)]
        id: Option<Id>,
        /// User email
        #[arg(long)]
        email: Option<String>,
    },
}

#[derive(Subcommand)]
enum NotificationCommands {
    /// List a user's inbox, newest first
    List {
        /// Receiving user ID
        #[arg(long)]
        user: Id,
        /// Inbox to list
        #[arg(long, value_enum)]
        kind: InboxKind,
    },
    /// Mark one notification as viewed
    Read {
        /// Notification ID
        #[arg(long)]
        id: Id,
    },
    /// Mark every notification in a role's inbox as viewed
    ReadAll {
        /// Receiving user ID
        #[arg(long)]
        user: Id,
        /// Inbox owner role (applicant or employer)
        #[arg(long)]
        role: String,
    },
    /// Delete every notification in a role's inbox
    Clear {
        /// Receiving user ID
        #[arg(long)]
        user: Id,
        /// Inbox owner role (applicant or employer)
        #[arg(long)]
        role: String,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobboard_store=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn user_key(id: Option<Id>, email: Option<String>) -> CliResult<UserKey> {
    UserKey::from_flags(id, email).ok_or_else(|| CliError::InvalidArgs {
        message: "exactly one of --id or --email is required".to_string(),
    })
}

async fn execute(cli: Cli) -> CliResult<String> {
    let config = DbConfig::from_env(cli.db)?;
    let db = SqliteDatabase::connect(&config).await?;
    let ctx = config.request_context();

    let output = match cli.command {
        Commands::Migrate => commands::migrate(&db).await,
        Commands::Applicant {
            command: UserCommands::Show { id, email },
        } => commands::user::show_applicant(&db, &ctx, &user_key(id, email)?).await,
        Commands::Employer {
            command: UserCommands::Show { id, email },
        } => commands::user::show_employer(&db, &ctx, &user_key(id, email)?).await,
        Commands::Notifications { command } => match command {
            NotificationCommands::List { user, kind } => {
                commands::notification::list(&db, &ctx, user, kind).await
            }
            NotificationCommands::Read { id } => {
                commands::notification::read(&db, &ctx, id).await
            }
            NotificationCommands::ReadAll { user, role } => {
                commands::notification::read_all(&db, &ctx, user, &role).await
            }
            NotificationCommands::Clear { user, role } => {
                commands::notification::clear(&db, &ctx, user, &role).await
            }
        },
    };

    db.close().await;
    output
}

pub async fn run() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let output = execute(cli).await?;
    println!("{}", output);
    Ok(())
}
