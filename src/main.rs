//! Labnote - permission-scoped search server for a multi-tenant lab notebook

mod config;

use anyhow::{Context, Result};
use chrono::Duration;
use clap::{Parser, Subcommand};
use labnote_api::{ApiServer, ApiServerConfig};
use labnote_auth::{JwtClaims, JwtValidator, SESSION_AUDIENCE, SESSION_ISSUER};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

use crate::config::AppConfig;


/// Labnote - visibility-scoped search over projects and inventories
#[derive(Parser, Debug)]
#[command(name = "labnote")]
#[command(about = "Labnote - visibility-scoped search over projects and inventories")]
#[command(version = env!("GIT_TAG"))]
#[command(long_version = concat!(env!("GIT_TAG"), "\nCommit: ", env!("GIT_HASH"), "\nBuilt: ", env!("BUILD_TIME")))]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./labnote.yml when present)
    #[arg(short, long, global = true, env = "LABNOTE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    #[command(long_about = r#"
Run the search API. Pending migrations are applied on startup unless
--no-migrate is given.

EXAMPLES:
  labnote serve --database-url "sqlite://labnote.db?mode=rwc"
  labnote serve --bind 0.0.0.0:8080 --config /etc/labnote.yml

ENVIRONMENT VARIABLES:
  LABNOTE_CONFIG        Configuration file
  LABNOTE_DATABASE_URL  Database URL
  LABNOTE_BIND          Address to bind
  LABNOTE_JWT_SECRET    Secret used to verify session tokens
    "#)]
    Serve {
        /// Database URL
        #[arg(long, env = "LABNOTE_DATABASE_URL")]
        database_url: Option<String>,

        /// Address to bind the API server
        #[arg(long, env = "LABNOTE_BIND")]
        bind: Option<SocketAddr>,

        /// Secret used to verify session tokens
        #[arg(long, env = "LABNOTE_JWT_SECRET", hide_env_values = true)]
        jwt_secret: Option<String>,

        /// Do not apply pending migrations on startup
        #[arg(long)]
        no_migrate: bool,
    },

    /// Apply pending database migrations and exit
    Migrate {
        /// Database URL
        #[arg(long, env = "LABNOTE_DATABASE_URL")]
        database_url: Option<String>,
    },

    /// Issue a session token for a user (development and scripting)
    Token {
        /// User ID the token is issued for
        #[arg(long)]
        user_id: Uuid,

        /// Current team carried by the session
        #[arg(long)]
        team_id: Option<Uuid>,

        /// Validity in hours
        #[arg(long, default_value = "24")]
        hours: i64,

        /// Secret used to sign the token
        #[arg(long, env = "LABNOTE_JWT_SECRET", hide_env_values = true)]
        jwt_secret: Option<String>,
    },
}

/// Setup logging with the specified log level
fn setup_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };

    // RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}

async fn serve(mut config: AppConfig, no_migrate: bool) -> Result<()> {
    let jwt_secret = config.require_jwt_secret()?.to_string();

    info!("Labnote starting...");
    let db = labnote_db::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    if !no_migrate {
        labnote_db::migrate(&db)
            .await
            .context("Failed to run migrations")?;
    }

    info!(
        "Search limit: {}, no-limit sentinel: {}",
        config.search.search_limit, config.search.no_limit_sentinel
    );

    let api_config = ApiServerConfig {
        bind_addr: config.bind_addr,
        enable_cors: config.enable_cors,
        cors_origins: config.cors_origins.take(),
        jwt_secret,
    };

    ApiServer::new(api_config, db, config.search).start().await
}

fn token_validity(hours: i64) -> Result<Duration> {
    Duration::try_hours(hours)
        .with_context(|| format!("Token lifetime of {} hours is out of range", hours))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let mut config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve {
            database_url,
            bind,
            jwt_secret,
            no_migrate,
        } => {
            if let Some(url) = database_url {
                config.database_url = url;
            }
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(secret) = jwt_secret {
                config.jwt_secret = Some(secret);
            }

            serve(config, no_migrate).await
        }
        Commands::Migrate { database_url } => {
            let url = database_url.unwrap_or(config.database_url);
            let db = labnote_db::connect(&url)
                .await
                .context("Failed to connect to database")?;
            labnote_db::migrate(&db)
                .await
                .context("Failed to run migrations")?;
            info!("Database is up to date");
            Ok(())
        }
        Commands::Token {
            user_id,
            team_id,
            hours,
            jwt_secret,
        } => {
            if let Some(secret) = jwt_secret {
                config.jwt_secret = Some(secret);
            }
            let secret = config.require_jwt_secret()?;

            let validity = token_validity(hours)?;
            let mut claims = JwtClaims::new(
                user_id,
                SESSION_ISSUER.to_string(),
                SESSION_AUDIENCE.to_string(),
                validity,
            )
            .with_token_type("session");
            if let Some(team_id) = team_id {
                claims = claims.with_team_id(team_id);
            }

            let token = JwtValidator::encode(secret.as_bytes(), &claims)
                .context("Failed to sign token")?;
            println!("{}", token);
            Ok(())
        }
    }
}
