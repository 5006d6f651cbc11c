//! Entry point for the Payroll Engine binary.
//!
//! Running this binary starts an HTTP server exposing the calculators.
//! Configuration comes from the environment (see
//! [`payroll_engine::config::Config`]); log verbosity from `RUST_LOG`.

use payroll_engine::api;
use payroll_engine::config::Config;
use tracing::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

#[tokio::main]
async fn main() {
    Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("payroll_engine=info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("invalid configuration: {err:#}");
            std::process::exit(1);
        }
    };
    if let Err(err) = api::serve(&config).await {
        error!("error running server: {err:#}");
        std::process::exit(1);
    }
}
