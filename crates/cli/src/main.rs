//! Firefly ledger CLI entry point.
//!
//! This binary is the composition root for the workspace and stands in for the
//! host tool. Responsibilities:
//!
//! 1. **Parse configuration**: load [`ledger::ProviderSettings`] from
//!    `firefly.toml` and `FIREFLY_*` variables (after reading `.env`) and
//!    validate it into an [`ledger::EndpointConfig`].
//! 2. **Wire observability**: configure `tracing-subscriber` with an
//!    `EnvFilter` (`RUST_LOG`, default `info`) and a JSON layer on stderr.
//! 3. **Construct infrastructure**: build the [`transport::LedgerClient`] and
//!    hand it to a [`system_info::SystemInfoFetcher`].
//! 4. **Read and print**: fetch once, cancelling on Ctrl-C, and print the flat
//!    record as `name = "value"` lines on stdout.

mod settings;

use anyhow::Context;
use system_info::SystemInfoFetcher;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use transport::LedgerClient;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .flatten_event(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = settings::load()
        .context("loading settings")?
        .into_endpoint_config()?;
    let fetcher = SystemInfoFetcher::new(LedgerClient::new(config)?);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, cancelling");
            on_interrupt.cancel();
        }
    });

    let info = fetcher
        .fetch(&cancel)
        .await
        .context("reading system information")?;
    tracing::info!(version = %info.version, "system information read");

    for (name, value) in info.attributes() {
        println!("{name} = {value:?}");
    }
    Ok(())
}
