// src/main.rs
use agent_state_client::client::{HttpStateClient, StateQuery};
use agent_state_client::config::Config;
use agent_state_client::domain::errors::{ClientError, ClientResult};

use tokio::signal::ctrl_c;
use tokio::time::{sleep, Duration};

#[tokio::main]
async fn main() -> ClientResult<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    config.init_logging()?;

    log::info!("Starting agent_state_client v{}", env!("CARGO_PKG_VERSION"));
    log::info!("State service endpoint: {}", config.service.base_url);

    let client = HttpStateClient::new(&config.service)?;
    let poll_interval = Duration::from_secs(config.monitor.poll_interval_secs);

    loop {
        let mut handle = client.query_state();

        tokio::select! {
            outcome = &mut handle => match outcome {
                Ok(state) => {
                    log::info!(
                        "Snapshot: healthy={:?} open_orders={} state={:?} period={:?}",
                        state.is_healthy,
                        state.open_order_count(),
                        state.current_state,
                        state.current_period,
                    );
                }
                Err(ClientError::Api { status, status_text, body }) => {
                    log::error!("State service responded {} {}: {}", status, status_text, body);
                }
                Err(e) => log::error!("State query failed: {}", e),
            },
            _ = ctrl_c() => {
                log::info!("Shutdown requested; canceling in-flight query");
                handle.cancel();
                if let Err(e) = (&mut handle).await {
                    log::debug!("In-flight query settled: {}", e);
                }
                break;
            }
        }

        tokio::select! {
            _ = sleep(poll_interval) => {}
            _ = ctrl_c() => break,
        }
    }

    log::info!("Monitor stopped");
    Ok(())
}
