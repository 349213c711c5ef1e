use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use idv_agent::cache::token_cache::TokenCache;
use idv_agent::client::VerificationClient;
use idv_agent::config::loader::load_config;
use idv_agent::observability::metrics::get_metrics;
use idv_agent::provider::oauth2::OAuth2Provider;
use idv_agent::server::server;
use idv_agent::tasks::acquire::AcquireTask;
use idv_agent::utils::constants::{ACQUIRE_WAIT_SECONDS, OAUTH_TOKEN_KEY};
use idv_agent::utils::logging::{self, LogLevel};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "idv-agent.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the mock verification server.
    Serve,
    /// Acquire a token and place it in the cache.
    FetchToken,
    /// Acquire a token, then send a verification request for the given
    /// subject-register id.
    Send {
        #[arg(long, default_value = "ARS12345")]
        ars_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Read args, load YAML config, init logging
    // -------------------------------

    let args = Args::parse();
    let service_config = load_config(&args.config)?;
    logging::run(&service_config, args.log_level)?;

    match args.command {
        // -------------------------------
        // 2a. Mock verification server
        // -------------------------------
        Command::Serve => {
            server::start(&service_config.settings, &service_config.mock).await?;
        }

        // -------------------------------
        // 2b. Token acquisition only
        // -------------------------------
        Command::FetchToken => {
            let cache = TokenCache::new();
            fetch_token(&service_config, &cache).await?;
        }

        // -------------------------------
        // 2c. Acquire, read back from cache, send verification request
        // -------------------------------
        Command::Send { ars_id } => {
            let cache = TokenCache::new();
            fetch_token(&service_config, &cache).await?;

            let Some(token) = cache.get(OAUTH_TOKEN_KEY).await else {
                bail!("no token found in cache");
            };

            let client = VerificationClient::new(service_config.client.clone());
            let response = client.send(&token.value, &ars_id).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

/// Dispatch a bounded acquisition and record the outcome.
async fn fetch_token(
    service_config: &idv_agent::ServiceConfig,
    cache: &TokenCache,
) -> Result<()> {
    let metrics = get_metrics().await;
    metrics.token_fetch_requests.inc();

    let provider = OAuth2Provider::new(service_config.auth.clone());
    let task = AcquireTask::new(provider, cache.clone(), OAUTH_TOKEN_KEY);

    task.run_detached(Duration::from_secs(ACQUIRE_WAIT_SECONDS))
        .await
        .inspect_err(|_| metrics.token_fetch_failures.inc())?;

    info!("token stored in cache for 15 minutes");
    Ok(())
}
