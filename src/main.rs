use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use shortlink::net::types::{HealthStatus, ShortenRequest, UserId, UserUpdate};
use shortlink::{ApiClient, AuthManager, ClientConfig, ClientError, SessionStore};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("not signed in; run `shortlink login` first")]
    NotSignedIn,
    #[error("nothing to update; pass --username, --email or --avatar")]
    EmptyUpdate,
    #[error("invalid JSON output: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "shortlink", about = "Shortlink API client with a persisted login session")]
struct Cli {
    /// API origin. Empty means same-origin, which only works behind a proxy.
    #[arg(long, env = "SHORTLINK_API_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, env = "SHORTLINK_SESSION_FILE", default_value = shortlink::config::DEFAULT_SESSION_FILE)]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check API health.
    Health,
    /// Shorten a URL.
    Shorten { url: String },
    /// Sign in and persist the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "SHORTLINK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and persist the session.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "SHORTLINK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out locally and on the server.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Exchange the stored refresh token for a new access token.
    Refresh,
    /// Update the signed-in user's profile.
    Profile(ProfileArgs),
    /// Change the signed-in user's password.
    Password {
        #[arg(long)]
        old: String,
        #[arg(long)]
        new: String,
    },
    /// Admin user management.
    Users(UsersCommand),
}

#[derive(Args, Debug)]
struct ProfileArgs {
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    avatar: Option<String>,
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    List,
    Delete { user_id: String },
}

struct CliContext {
    api: Arc<ApiClient>,
    session: SessionStore,
}

impl CliContext {
    fn new(cli: &Cli) -> Result<Self, CliError> {
        let config = ClientConfig::new(cli.base_url.clone(), cli.session_file.clone());
        let session = SessionStore::file(&config.session_file);
        let api = Arc::new(ApiClient::from_config(&config, session.clone())?);
        Ok(Self { api, session })
    }

    async fn manager(&self) -> Arc<AuthManager> {
        AuthManager::init(self.api.clone(), self.session.clone()).await
    }

    async fn signed_in(&self) -> Result<Arc<AuthManager>, CliError> {
        let manager = self.manager().await;
        if !manager.state().is_authenticated() {
            return Err(CliError::NotSignedIn);
        }
        Ok(manager)
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "no .env loaded");
    }

    let cli = Cli::parse();
    let ctx = CliContext::new(&cli)?;

    match cli.command {
        Command::Health => run_health(&ctx).await,
        Command::Shorten { url } => print_json(&ctx.api.shorten_url(&ShortenRequest::new(url)).await?),
        Command::Login { email, password } => {
            let user = ctx.manager().await.login(&email, &password).await?;
            print_json(&user)
        }
        Command::Register { username, email, password } => {
            let user = ctx.manager().await.register(&username, &email, &password).await?;
            print_json(&user)
        }
        Command::Logout => {
            ctx.manager().await.logout().await;
            eprintln!("signed out");
            Ok(())
        }
        Command::Whoami => {
            let manager = ctx.signed_in().await?;
            print_json(&manager.state().user)
        }
        Command::Refresh => {
            ctx.manager().await.refresh().await?;
            eprintln!("access token refreshed");
            Ok(())
        }
        Command::Profile(args) => run_profile(&ctx, args).await,
        Command::Password { old, new } => {
            ctx.signed_in().await?.change_password(&old, &new).await?;
            eprintln!("password changed");
            Ok(())
        }
        Command::Users(users) => run_users(&ctx, users).await,
    }
}

async fn run_health(ctx: &CliContext) -> Result<(), CliError> {
    match ctx.api.check_health().await? {
        HealthStatus::Json(value) => print_json(&value),
        HealthStatus::Text(text) => {
            println!("{text}");
            Ok(())
        }
    }
}

async fn run_profile(ctx: &CliContext, args: ProfileArgs) -> Result<(), CliError> {
    let update = UserUpdate { username: args.username, email: args.email, avatar: args.avatar };
    if update.is_empty() {
        return Err(CliError::EmptyUpdate);
    }
    let user = ctx.signed_in().await?.update_profile(update).await?;
    print_json(&user)
}

async fn run_users(ctx: &CliContext, users: UsersCommand) -> Result<(), CliError> {
    if !ctx.session.has_session() {
        return Err(CliError::NotSignedIn);
    }
    match users.command {
        UsersSubcommand::List => print_json(&ctx.api.list_users().await?),
        UsersSubcommand::Delete { user_id } => print_json(&ctx.api.delete_user(&UserId::new(user_id)).await?),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
