//! Periodic refresh loop
//!
//! Calls the schedule client on a fixed interval and fans the resulting state
//! out to any number of observers through a watch channel. Calls never
//! overlap: the next tick is only awaited once the previous update finished.

use crate::logging::{StructuredLogger, get_logger};
use crate::schedule::{HttpScheduleSource, ScheduleClient, ScheduleSource, ScheduleState};
use tokio::sync::{mpsc, watch};
use tokio::time::{Duration, MissedTickBehavior, interval};

pub struct UpdateCoordinator<S: ScheduleSource = HttpScheduleSource> {
    client: ScheduleClient<S>,
    update_interval: Duration,
    state_tx: watch::Sender<Option<ScheduleState>>,
    shutdown_tx: mpsc::UnboundedSender<()>,
    shutdown_rx: mpsc::UnboundedReceiver<()>,
    logger: StructuredLogger,
}

impl<S: ScheduleSource> UpdateCoordinator<S> {
    pub fn new(client: ScheduleClient<S>, update_interval: Duration) -> Self {
        let (state_tx, _) = watch::channel(None);
        let (shutdown_tx, shutdown_rx) = mpsc::unbounded_channel();
        Self {
            client,
            update_interval,
            state_tx,
            shutdown_tx,
            shutdown_rx,
            logger: get_logger("coordinator"),
        }
    }

    /// Receive every published state; `None` until the first update
    pub fn subscribe(&self) -> watch::Receiver<Option<ScheduleState>> {
        self.state_tx.subscribe()
    }

    /// Sender that stops [`run`](Self::run) when signalled
    pub fn shutdown_handle(&self) -> mpsc::UnboundedSender<()> {
        self.shutdown_tx.clone()
    }

    /// Last published state
    pub fn data(&self) -> Option<ScheduleState> {
        self.state_tx.borrow().clone()
    }

    pub fn client(&self) -> &ScheduleClient<S> {
        &self.client
    }

    /// Run one update immediately and publish it
    pub async fn refresh_now(&mut self) -> ScheduleState {
        Self::refresh(&mut self.client, &self.state_tx, &self.logger).await
    }

    async fn refresh(
        client: &mut ScheduleClient<S>,
        state_tx: &watch::Sender<Option<ScheduleState>>,
        logger: &StructuredLogger,
    ) -> ScheduleState {
        let state = client.get_data().await;
        if state.is_error() {
            logger.warn(&format!(
                "Update produced error state: {}",
                state.error_message().unwrap_or("Unknown error")
            ));
        }
        state_tx.send_replace(Some(state.clone()));
        state
    }

    /// Refresh on every tick until shutdown is requested, then close the client
    pub async fn run(&mut self) {
        self.logger.info(&format!(
            "Starting updates every {}s",
            self.update_interval.as_secs()
        ));
        let mut ticker = interval(self.update_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = self.shutdown_rx.recv() => {
                    self.logger.info("Shutdown signal received");
                    break;
                }
            }

            // An in-flight fetch is dropped when shutdown arrives
            tokio::select! {
                _ = Self::refresh(&mut self.client, &self.state_tx, &self.logger) => {}
                _ = self.shutdown_rx.recv() => {
                    self.logger.info("Shutdown signal received, abandoning update");
                    break;
                }
            }
        }

        self.client.shutdown().await;
    }
}
