//! CLI for running capacity and promotion evaluations against the
//! database.
//!
//! Usage:
//!   flock-evaluate group <GROUP_ID>
//!   flock-evaluate leader <LEADER_ID>
//!
//! Prints the structured outcome as JSON on stdout. Reads the database
//! location from DATABASE_URL.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use flock_groups::config::GroupsConfig;
use flock_groups::{db, evaluator, promotion};

/// Evaluate cell groups and leaders against the configured rules.
#[derive(Parser)]
#[command(name = "flock-evaluate")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a group against the capacity rules, splitting it if a rule
    /// mandates it.
    Group {
        /// Cell group identifier
        group_id: Uuid,
    },
    /// Evaluate a leader against the promotion rule.
    Leader {
        /// Leader (member) identifier
        leader_id: Uuid,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match GroupsConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "failed to load configuration");
            std::process::exit(1);
        }
    };

    let pool = match db::create_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "failed to connect to database");
            std::process::exit(1);
        }
    };

    if let Err(e) = db::run_migrations(&pool).await {
        tracing::error!(error = %e, "failed to run migrations");
        std::process::exit(1);
    }

    let json = match cli.command {
        Commands::Group { group_id } => {
            match evaluator::evaluate_group_for_split(&pool, group_id).await {
                Ok(outcome) => serde_json::to_string_pretty(&outcome),
                Err(e) => {
                    tracing::error!(error = %e, group_id = %group_id, "evaluation failed");
                    std::process::exit(1);
                }
            }
        }
        Commands::Leader { leader_id } => {
            match promotion::evaluate_leader_for_promotion(&pool, leader_id).await {
                Ok(outcome) => serde_json::to_string_pretty(&outcome),
                Err(e) => {
                    tracing::error!(error = %e, leader_id = %leader_id, "evaluation failed");
                    std::process::exit(1);
                }
            }
        }
    };

    match json {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize outcome");
            std::process::exit(1);
        }
    }
}
