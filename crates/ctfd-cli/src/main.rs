//! ctfd - manage CTFd users, teams, challenges and flags by name.
//!
//! Settings come from the environment (or a `.env` file): `CTFD_ADMIN_TOKEN`,
//! `CTFD_HOST`, `CTFD_STORAGE`, `CTFD_TIMEOUT_SECS`. The global flags
//! override them.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ctfd_sdk_core::{ChallengeState, Config, CtfdApi, FlagOptions, NewChallenge, UserRole};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "ctfd", version, about = "Manage CTFd entities by name")]
struct Cli {
    /// CTFd base address, e.g. http://localhost:8000
    #[arg(long, global = true)]
    host: Option<String>,

    /// Admin API token
    #[arg(long, global = true)]
    token: Option<String>,

    /// Path of the name → id storage file
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register or delete users
    #[command(subcommand)]
    User(UserCommand),
    /// Register or delete teams
    #[command(subcommand)]
    Team(TeamCommand),
    /// Put a user into a team, leaving their current one
    Assign { user: String, team: String },
    /// Take a user out of their team
    Unassign { user: String },
    /// Create or delete challenges
    #[command(subcommand)]
    Challenge(ChallengeCommand),
    /// Create, update or delete flags
    #[command(subcommand)]
    Flag(FlagCommand),
    /// Delete every entity in the storage file from CTFd
    Clear,
    /// Print the storage file
    Show,
}

#[derive(Debug, Subcommand)]
enum UserCommand {
    Create {
        name: String,
        #[arg(long)]
        admin: bool,
    },
    Delete { name: String },
}

#[derive(Debug, Subcommand)]
enum TeamCommand {
    Create { name: String },
    Delete { name: String },
}

#[derive(Debug, Subcommand)]
enum ChallengeCommand {
    Create {
        name: String,
        value: i64,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Create the challenge hidden instead of visible
        #[arg(long)]
        hidden: bool,
        #[arg(long = "type", default_value = "standard")]
        challenge_type: String,
    },
    Delete { name: String },
}

#[derive(Debug, Args)]
struct FlagArgs {
    #[arg(long, default_value = "case_insensitive")]
    data: String,
    #[arg(long = "type", default_value = "static")]
    flag_type: String,
}

impl From<FlagArgs> for FlagOptions {
    fn from(args: FlagArgs) -> Self {
        FlagOptions {
            data: args.data,
            flag_type: args.flag_type,
        }
    }
}

#[derive(Debug, Subcommand)]
enum FlagCommand {
    Create {
        challenge: String,
        name: String,
        content: String,
        #[command(flatten)]
        options: FlagArgs,
    },
    Update {
        name: String,
        content: String,
        #[command(flatten)]
        options: FlagArgs,
    },
    Delete { name: String },
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::from_lookup(|key| match key {
        ctfd_sdk_core::config::ENV_ADMIN_TOKEN if cli.token.is_some() => cli.token.clone(),
        _ => std::env::var(key).ok(),
    })
    .context("Failed to resolve CTFd configuration")?;

    if let Some(ref host) = cli.host {
        config = config.with_host(host.clone());
    }
    if let Some(ref storage) = cli.storage {
        config = config.with_storage_path(storage.clone());
    }
    Ok(config)
}

async fn run(api: &CtfdApi, command: Command) -> Result<()> {
    match command {
        Command::User(UserCommand::Create { name, admin }) => {
            let id = api.create_user(&name, UserRole::from_admin_flag(admin)).await?;
            println!("user {} -> {}", name, id);
        }
        Command::User(UserCommand::Delete { name }) => api.delete_user(&name).await?,
        Command::Team(TeamCommand::Create { name }) => {
            let id = api.create_team(&name).await?;
            println!("team {} -> {}", name, id);
        }
        Command::Team(TeamCommand::Delete { name }) => api.delete_team(&name).await?,
        Command::Assign { user, team } => api.assign_user_to_team(&user, &team).await?,
        Command::Unassign { user } => api.remove_user_from_team(&user).await?,
        Command::Challenge(ChallengeCommand::Create {
            name,
            value,
            category,
            description,
            hidden,
            challenge_type,
        }) => {
            let state = if hidden {
                ChallengeState::Hidden
            } else {
                ChallengeState::Visible
            };
            let challenge = NewChallenge::new(name.clone(), value)
                .category(category)
                .description(description)
                .state(state)
                .challenge_type(challenge_type);
            let id = api.create_challenge(challenge).await?;
            println!("challenge {} -> {}", name, id);
        }
        Command::Challenge(ChallengeCommand::Delete { name }) => {
            api.delete_challenge(&name).await?
        }
        Command::Flag(FlagCommand::Create {
            challenge,
            name,
            content,
            options,
        }) => {
            let id = api
                .create_flag(&challenge, &name, &content, &options.into())
                .await?;
            println!("flag {} -> {}", name, id);
        }
        Command::Flag(FlagCommand::Update {
            name,
            content,
            options,
        }) => api.update_flag(&name, &content, &options.into()).await?,
        Command::Flag(FlagCommand::Delete { name }) => api.delete_flag(&name).await?,
        Command::Clear => api.clear().await?,
        Command::Show => {
            let document = api.storage().load()?;
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    info!(host = %config.host, storage = %config.storage_path.display(), "ctfd starting");

    let api = CtfdApi::new(&config).context("Failed to create CTFd client")?;
    run(&api, cli.command).await
}
