use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use roam::app::AppState;
use roam::logging::{self, LogConfig};
use roam::settings::{BackendKind, Settings};
use roam::stores::DomainStatus;

/// Roam - inspect and drive the travel-social app state from a terminal
#[derive(Parser)]
#[command(name = "roam")]
#[command(about = "Runs app-state operations against a backend and prints the result as JSON")]
#[command(version)]
struct Cli {
    /// Backend to talk to
    #[arg(long, short, value_enum)]
    backend: Option<BackendArg>,

    /// Server URL for the http backend
    #[arg(long, short, env = "ROAM_SERVER_URL")]
    server: Option<String>,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Fixture,
    Http,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Fixture => BackendKind::Fixture,
            BackendArg::Http => BackendKind::Http,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print the feed
    Feed,
    /// Print a user's profile
    Profile { id: String },
    /// Print notifications and the unread total
    Notifications,
    /// Print conversations and the unread total
    Messages,
    /// Like a post and print it
    Like { id: String },
    /// Publish a post as the demo user
    Post { text: String },
}

// Load environment variables from .env file so ROAM_* settings can live there
fn load_env() {
    let _ = dotenv::dotenv();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Print the domain error, if any, and report whether the operation succeeded
fn report(status: &DomainStatus, ok: bool) -> bool {
    if let Some(message) = status.error_message() {
        eprintln!("error: {}", message);
    }
    ok
}

#[derive(Serialize)]
struct UnreadListing<T> {
    unread_count: usize,
    items: Vec<T>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    load_env();

    let mut settings = Settings::new().context("Failed to load roam.toml settings")?;
    if let Some(backend) = cli.backend {
        settings.backend.kind = backend.into();
    }
    if let Some(server) = cli.server {
        settings.backend.server_url = server;
    }
    if cli.verbose {
        settings.logging.enabled = true;
        settings.logging.verbose = true;
    }

    logging::init_logging(&LogConfig::from_settings(&settings.logging))
        .context("Failed to initialize logging")?;
    log::info!("Using {:?} backend", settings.backend.kind);

    let mut app = AppState::from_settings(&settings);

    let ok = match cli.command {
        Command::Feed => {
            let ok = app.posts.fetch().await;
            print_json(&app.posts.posts().to_vec())?;
            report(app.posts.status(), ok)
        }
        Command::Profile { id } => {
            let ok = app.users.fetch_profile(&id).await;
            if let Some(profile) = app.users.get(&id) {
                print_json(profile.as_ref())?;
            }
            report(app.users.status(), ok)
        }
        Command::Notifications => {
            let ok = app.notifications.fetch().await;
            print_json(&UnreadListing {
                unread_count: app.notifications.unread_count(),
                items: app.notifications.notifications().to_vec(),
            })?;
            report(app.notifications.status(), ok)
        }
        Command::Messages => {
            let ok = app.messages.fetch().await;
            print_json(&UnreadListing {
                unread_count: app.messages.unread_count(),
                items: app.messages.conversations().to_vec(),
            })?;
            report(app.messages.status(), ok)
        }
        Command::Like { id } => {
            app.posts.fetch().await;
            let ok = app.posts.like(&id).await;
            if let Some(post) = app.posts.get(&id) {
                print_json(post.as_ref())?;
            }
            report(app.posts.status(), ok)
        }
        Command::Post { text } => {
            if settings.backend.kind == BackendKind::Fixture
                && !app.session.login("johndoe", "demo").await
            {
                report(app.session.status(), false);
                anyhow::bail!("Could not sign in to the fixture backend");
            }
            let ok = app.create_post(&text, Vec::new()).await;
            if ok {
                if let Some(post) = app.posts.posts().first() {
                    print_json(post.as_ref())?;
                }
            }
            report(app.posts.status(), ok)
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
