use anyhow::Result;
use cez_hdo::coordinator::UpdateCoordinator;
use cez_hdo::schedule::ScheduleClient;
use cez_hdo::sensors::{ErrorSensor, TariffSensor};
use cez_hdo::{Config, logging};
use std::time::Duration;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
    logging::init_logging(&config.logging)?;
    let tz = config.tz()?;

    info!(
        "CEZ HDO {} starting for EAN {} signal {}",
        env!("APP_VERSION"),
        config.hdo.ean,
        config.hdo.signal
    );

    let client = ScheduleClient::new(&config.hdo, tz);
    let mut coordinator =
        UpdateCoordinator::new(client, Duration::from_secs(config.scan_interval_secs));
    let stop = coordinator.shutdown_handle();

    // Render both sensors whenever a new state is published
    let mut updates = coordinator.subscribe();
    let tariff = TariffSensor::new(&config.hdo.ean, config.hdo.signal);
    let problem = ErrorSensor::new(&config.hdo.ean, config.hdo.signal);
    let render_task = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let data = updates.borrow_and_update().clone();
            let now = chrono::Utc::now().with_timezone(&tz).naive_local();
            for reading in [
                tariff.render(data.as_ref(), now),
                problem.render(data.as_ref(), now),
            ] {
                match serde_json::to_string(&reading) {
                    Ok(line) => info!("{}", line),
                    Err(e) => error!("Failed to render sensor {}: {}", reading.unique_id, e),
                }
            }
        }
    });

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
        stop.send(()).ok();
    });

    coordinator.run().await;
    render_task.abort();
    info!("Shutdown complete");
    Ok(())
}
