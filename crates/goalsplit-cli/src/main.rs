mod config;
mod decompose_cmd;
mod goal_cmds;
mod serve_cmd;
#[cfg(test)]
mod test_util;

use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};

use goalsplit_core::decompose::{DecomposerSource, GoalDecomposer};
use goalsplit_db::config::DbConfig;
use goalsplit_db::pool;

use config::GoalsplitConfig;

#[derive(Parser)]
#[command(
    name = "goalsplit",
    version,
    about = "Break a goal into five concrete steps with a complexity score"
)]
struct Cli {
    /// Database URL (overrides GOALSPLIT_DATABASE_URL / DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a goalsplit config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = DbConfig::DEFAULT_URL)]
        db_url: String,
        /// Gemini API key to store in the config file
        #[arg(long)]
        api_key: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Initialize the goalsplit database (requires config file or env vars)
    DbInit,
    /// Run the HTTP API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
    /// Decompose a goal once and print the result (no database)
    Decompose {
        /// The goal to break down
        goal: String,
        /// Skip the remote model and use the built-in steps
        #[arg(long)]
        offline: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Stored goal management
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
}

#[derive(Subcommand)]
pub enum GoalCommands {
    /// List stored goals, newest first
    List {
        /// Number of goals to skip
        #[arg(long)]
        skip: Option<i64>,
        /// Maximum number of goals to show (1-200, default 50)
        #[arg(long)]
        limit: Option<i64>,
        /// Only show goals for this user ID
        #[arg(long)]
        user: Option<String>,
    },
    /// Show a stored goal with its steps
    Show {
        /// Goal ID
        id: i64,
    },
    /// Delete a stored goal
    Delete {
        /// Goal ID
        id: i64,
    },
}

/// Execute the `goalsplit init` command: write config file.
fn cmd_init(db_url: &str, api_key: Option<&str>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let api_key = api_key.map(str::trim).filter(|k| !k.is_empty());
    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
        generation: config::GenerationSection {
            api_key: api_key.map(str::to_string),
            ..Default::default()
        },
    };

    config::save_config_to(&path, &cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    match api_key {
        Some(key) => println!("  generation.api_key = {}", config::mask_secret(key)),
        None => println!(
            "  generation.api_key not set (set GOOGLE_API_KEY for model-generated steps)"
        ),
    }
    println!();
    println!("Next: run `goalsplit db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `goalsplit db-init` command: create database and run migrations.
async fn cmd_db_init(cli_db_url: Option<&str>) -> anyhow::Result<()> {
    let resolved = GoalsplitConfig::resolve(cli_db_url)?;

    println!("Initializing goalsplit database...");

    // 1. Create the database if it does not exist.
    pool::ensure_database_exists(&resolved.db_config).await?;

    // 2. Connect to the target database.
    let db_pool = pool::create_pool(&resolved.db_config).await?;

    // 3. Run migrations.
    pool::run_migrations(&db_pool).await?;

    // 4. Print success with table counts.
    let counts = pool::table_counts(&db_pool).await?;
    println!("Database ready. Tables:");
    for (table, count) in &counts {
        println!("  {table}: {count} rows");
    }

    db_pool.close().await;

    println!("goalsplit db-init complete.");
    Ok(())
}

/// Shared outbound HTTP client for the generation API.
fn http_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("goalsplit/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .context("failed to build HTTP client")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            db_url,
            api_key,
            force,
        } => {
            cmd_init(&db_url, api_key.as_deref(), force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::Serve { bind, port } => {
            let resolved = GoalsplitConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            pool::run_migrations(&db_pool).await?;

            let decomposers = DecomposerSource::configured(resolved.generation, http_client()?);
            tracing::info!(
                backend = decomposers.current().backend_name(),
                "goal decomposer ready"
            );

            let state = serve_cmd::AppState {
                pool: db_pool.clone(),
                decomposers,
            };
            let result = serve_cmd::run_serve(state, &bind, port).await;
            db_pool.close().await;
            result?;
        }
        Commands::Decompose {
            goal,
            offline,
            json,
        } => {
            let decomposer = if offline {
                GoalDecomposer::offline()
            } else {
                let resolved = GoalsplitConfig::resolve(cli.database_url.as_deref())?;
                GoalDecomposer::from_config(&resolved.generation.with_env(), http_client()?)
            };
            decompose_cmd::run_decompose(&decomposer, &goal, json).await?;
        }
        Commands::Goal { command } => {
            let resolved = GoalsplitConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = goal_cmds::run_goal_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
    }

    Ok(())
}
