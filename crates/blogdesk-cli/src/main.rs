use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

mod commands;

const PASSWORD_ENV: &str = "BLOGDESK_PASSWORD";

#[derive(Parser)]
#[command(name = "blogdesk")]
#[command(about = "blogdesk - session and permission tooling for the blog admin API", long_about = None)]
struct Cli {
    /// Directory holding config.toml and the persisted session
    /// (defaults to the platform config directory)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and persist the session
    Login {
        #[arg(long)]
        email: String,
        /// Prefer BLOGDESK_PASSWORD; a flag value is visible in shell
        /// history and process listings
        #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
        password: String,
    },
    /// Create an account and log it in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Prefer BLOGDESK_PASSWORD; a flag value is visible in shell
        /// history and process listings
        #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
        password: String,
    },
    /// Forget the persisted session
    Logout,
    /// Show the current identity and permissions
    Whoami,
    /// Check whether the session holds any of the given permissions
    Can {
        #[arg(required = true)]
        permissions: Vec<String>,
    },
    /// Resolve a client route for the current session
    Open { path: String },
    /// Show the navigation links visible to the current session
    Menu,
    /// GET an API path with the session token and print the JSON body
    Get { path: String },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let ctx = commands::context::AppContext::load(cli.config_dir.as_deref()).await?;

    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&ctx, email, password).await?,
        Commands::Register {
            name,
            email,
            password,
        } => commands::auth::register(&ctx, name, email, password).await?,
        Commands::Logout => commands::auth::logout(&ctx).await,
        Commands::Whoami => commands::auth::whoami(&ctx),
        Commands::Can { permissions } => return Ok(commands::access::can(&ctx, &permissions)),
        Commands::Open { path } => return Ok(commands::access::open(&ctx, &path)),
        Commands::Menu => commands::access::menu(&ctx),
        Commands::Get { path } => commands::get::run(&ctx, &path).await?,
    }

    Ok(ExitCode::SUCCESS)
}
