//! Kirana store terminal client.

use std::{io, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use kirana::config::{self, Config};
use tracing_subscriber::EnvFilter;

use crate::cli::{
    context::Context, credit::CreditCommand, customers::CustomersCommand, output::Output,
    products::ProductsCommand, sales::SalesCommand,
};

mod cli;

#[derive(Debug, Parser)]
#[command(name = "kirana", about = "Terminal client for the kirana store backend", version)]
struct Cli {
    /// Base URL of the backend API.
    #[arg(
        long,
        env = "KIRANA_API_URL",
        default_value = config::DEFAULT_BASE_URL,
        global = true
    )]
    api_url: String,

    /// Path of the saved login session.
    #[arg(
        long,
        env = "KIRANA_SESSION_FILE",
        default_value = config::DEFAULT_SESSION_FILE,
        global = true
    )]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and save the session.
    Login,

    /// Create a staff account and sign in.
    Register,

    /// Discard the saved session.
    Logout,

    /// Show who is signed in.
    Whoami,

    /// Today's sales, credit, inventory and customer figures.
    Dashboard,

    /// Interactive point-of-sale till.
    Pos,

    Products(ProductsCommand),
    Customers(CustomersCommand),
    Sales(SalesCommand),
    Credit(CreditCommand),
}

#[tokio::main]
pub async fn main() -> ExitCode {
    let _env = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config {
        base_url: cli.api_url,
        session_file: cli.session_file,
    };

    let ctx = match Context::new(&config) {
        Ok(ctx) => ctx,
        Err(error) => {
            Output::new().error(&format!("{error:#}"));
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = run(cli.command, &ctx).await {
        ctx.output.error(&format!("{error:#}"));
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn run(command: Commands, ctx: &Context) -> anyhow::Result<()> {
    match command {
        Commands::Login => cli::auth::login(ctx).await,
        Commands::Register => cli::auth::register(ctx).await,
        Commands::Logout => cli::auth::logout(ctx).await,
        Commands::Whoami => cli::auth::whoami(ctx),
        Commands::Dashboard => cli::dashboard::run(ctx).await,
        Commands::Pos => cli::pos::run(ctx).await,
        Commands::Products(command) => cli::products::run(command, ctx).await,
        Commands::Customers(command) => cli::customers::run(command, ctx).await,
        Commands::Sales(command) => cli::sales::run(command, ctx).await,
        Commands::Credit(command) => cli::credit::run(command, ctx).await,
    }
}
