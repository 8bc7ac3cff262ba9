//! Background task that keeps the converter's rate table fresh

use super::rates::RateProvider;
use super::state::ConverterState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(600);

const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Runs a single fetch cycle against `state`.
///
/// The state lock is released while the request is in flight. Every attempt,
/// successful or not, bumps the `completed` counter.
pub async fn refresh_once(
    state: &Mutex<ConverterState>,
    provider: &dyn RateProvider,
    completed: &watch::Sender<u64>,
) {
    state.lock().await.begin_fetch();
    let result = provider.fetch_rates().await;
    let ok = result.is_ok();
    state.lock().await.finish_fetch(result);

    completed.send_modify(|n| *n += 1);
    debug!(ok, attempt = *completed.borrow(), "Rate refresh finished");
}

/// Owned handle to the periodic refresh. Fires immediately, then once per
/// period until cancelled.
pub struct RefreshTask {
    handle: JoinHandle<()>,
    period: Duration,
}

impl RefreshTask {
    pub fn spawn(
        state: Arc<Mutex<ConverterState>>,
        provider: Arc<dyn RateProvider>,
        period: Duration,
        completed: Arc<watch::Sender<u64>>,
    ) -> Self {
        let period = if period < MIN_REFRESH_INTERVAL {
            warn!(?period, "Refresh interval too short, using {MIN_REFRESH_INTERVAL:?}");
            MIN_REFRESH_INTERVAL
        } else {
            period
        };

        let handle = tokio::spawn(async move {
            info!(?period, "Starting rate refresh task");
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                refresh_once(&state, provider.as_ref(), &completed).await;
            }
        });

        Self { handle, period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn cancel(self) {
        self.handle.abort();
        info!("Stopped rate refresh task");
    }
}
