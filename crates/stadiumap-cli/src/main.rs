mod account;
mod context;
mod explore;
mod stadiums;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::context::AppContext;

#[derive(Debug, Parser)]
#[command(name = "stadiumap")]
#[command(about = "Browse football stadiums, discover new ones and track the ones you've visited")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List known stadiums as a map at the given zoom would show them
    List {
        /// Map zoom level; below 5 only the built-in stadiums are shown
        #[arg(long, default_value_t = 3)]
        zoom: u8,
        /// Filter by name, city or home team (overrides the zoom rule)
        #[arg(long)]
        search: Option<String>,
    },
    /// Ask the AI for stadiums inside a bounding box
    Scan {
        #[arg(long, allow_hyphen_values = true)]
        north: f64,
        #[arg(long, allow_hyphen_values = true)]
        south: f64,
        #[arg(long, allow_hyphen_values = true)]
        east: f64,
        #[arg(long, allow_hyphen_values = true)]
        west: f64,
        /// Zoom the box was viewed at; scans below the minimum scan zoom are refused
        #[arg(long, default_value_t = 8)]
        zoom: u8,
    },
    /// Find a stadium by name, asking the AI when it is not built in
    Find {
        /// Stadium name or part of it
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show an AI-written description and fun fact for a built-in stadium
    Insight {
        /// Stadium id (e.g. camp-nou)
        id: String,
    },
    /// Show or change the current identity's visited stadiums
    Visited {
        #[command(subcommand)]
        command: Option<VisitedCommands>,
    },
    /// Log in as a local user (nothing is verified)
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Return to guest mode
    Logout,
    /// Print the current identity
    Whoami,
    /// Interactive session: pan and zoom a virtual map and watch discovery run
    Explore,
}

#[derive(Debug, Subcommand)]
enum VisitedCommands {
    /// Mark a stadium visited, or unmark it if it already is
    Toggle {
        /// Stadium id (e.g. camp-nou)
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = stadiumap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("stadiumap: run with --help to see available commands");
        return Ok(());
    };

    let ctx = AppContext::new(config)?;
    tracing::debug!(env = %ctx.config.env, data_dir = %ctx.config.data_dir.display(), "starting");

    match command {
        Commands::List { zoom, search } => {
            stadiums::run_list(&ctx, zoom, search.as_deref().unwrap_or_default())?;
        }
        Commands::Scan {
            north,
            south,
            east,
            west,
            zoom,
        } => {
            let bounds = stadiumap_core::Bounds {
                north,
                south,
                east,
                west,
            };
            stadiums::run_scan(&ctx, bounds, zoom).await?;
        }
        Commands::Find { query } => stadiums::run_find(&ctx, &query.join(" ")).await?,
        Commands::Insight { id } => stadiums::run_insight(&ctx, &id).await?,
        Commands::Visited { command: None } => account::run_visited(&ctx)?,
        Commands::Visited {
            command: Some(VisitedCommands::Toggle { id }),
        } => account::run_visited_toggle(&ctx, &id)?,
        Commands::Login { username, password } => {
            account::run_login(&ctx, &username, &password)?;
        }
        Commands::Logout => account::run_logout(&ctx)?,
        Commands::Whoami => account::run_whoami(&ctx)?,
        Commands::Explore => explore::run_explore(&ctx).await?,
    }

    Ok(())
}
