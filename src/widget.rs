//! The rate converter: shared state, the refresh task that feeds it, and the
//! actions a user can take on it.

use crate::core::refresh::{self, RefreshTask};
use crate::core::{ConverterState, Currency, RateProvider};
use anyhow::{Result, anyhow, bail};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tracing::debug;

pub struct RateConverterWidget {
    state: Arc<Mutex<ConverterState>>,
    provider: Arc<dyn RateProvider>,
    // Only the refresh task holds the sender, so receivers see the channel
    // close once the task is gone.
    completed_tx: Weak<watch::Sender<u64>>,
    completed_rx: watch::Receiver<u64>,
    refresh: Option<RefreshTask>,
}

impl RateConverterWidget {
    /// Starts the converter with the default USD -> PKR selection. Must be
    /// called from within a tokio runtime.
    pub fn mount<P>(provider: P, interval: Duration) -> Self
    where
        P: RateProvider + 'static,
    {
        Self::mount_with_selection(provider, interval, Currency::Usd, Currency::Pkr)
    }

    pub fn mount_with_selection<P>(
        provider: P,
        interval: Duration,
        source: Currency,
        target: Currency,
    ) -> Self
    where
        P: RateProvider + 'static,
    {
        let state = Arc::new(Mutex::new(ConverterState::new(source, target)));
        let provider: Arc<dyn RateProvider> = Arc::new(provider);
        let (tx, completed_rx) = watch::channel(0);
        let completed_tx = Arc::new(tx);

        let weak_tx = Arc::downgrade(&completed_tx);

        let refresh = RefreshTask::spawn(
            Arc::clone(&state),
            Arc::clone(&provider),
            interval,
            completed_tx,
        );

        Self {
            state,
            provider,
            completed_tx: weak_tx,
            completed_rx,
            refresh: Some(refresh),
        }
    }

    pub async fn snapshot(&self) -> ConverterState {
        self.state.lock().await.clone()
    }

    pub async fn set_amount_input(&self, input: &str) {
        self.state.lock().await.set_amount_input(input);
    }

    pub async fn set_amount(&self, amount: Option<f64>) {
        self.state.lock().await.set_amount(amount);
    }

    pub async fn set_source(&self, source: Currency) {
        self.state.lock().await.set_source(source);
    }

    pub async fn set_target(&self, target: Currency) {
        self.state.lock().await.set_target(target);
    }

    /// Converts and returns whatever is displayed afterwards.
    pub async fn convert(&self) -> String {
        let mut state = self.state.lock().await;
        state.convert();
        state.converted().to_string()
    }

    pub async fn swap(&self) -> String {
        let mut state = self.state.lock().await;
        state.swap();
        state.converted().to_string()
    }

    fn live_sender(&self) -> Option<Arc<watch::Sender<u64>>> {
        self.refresh.as_ref().and(self.completed_tx.upgrade())
    }

    /// Fetches right away, outside the timer schedule. Fails once the
    /// converter is torn down.
    pub async fn refresh_now(&self) -> Result<()> {
        let completed = self
            .live_sender()
            .ok_or_else(|| anyhow!("Converter is not mounted"))?;
        refresh::refresh_once(&self.state, self.provider.as_ref(), &completed).await;
        Ok(())
    }

    /// Waits for the next completed fetch attempt and returns the attempt count.
    ///
    /// Errors instead of waiting when the refresh task is no longer running.
    pub async fn refreshed(&mut self) -> Result<u64> {
        if self.refresh.is_none() {
            bail!("Converter is not mounted");
        }
        self.completed_rx
            .changed()
            .await
            .map_err(|_| anyhow!("Rate refresh task stopped"))?;
        Ok(*self.completed_rx.borrow_and_update())
    }

    /// Independent receiver for fetch completions, starting from now. The
    /// receiver reports a closed channel once the refresh task is gone.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        match self.live_sender() {
            Some(tx) => tx.subscribe(),
            None => watch::channel(0).1,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.refresh.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        self.refresh.as_ref().map(RefreshTask::period)
    }

    /// Stops the periodic refresh. Safe to call more than once.
    pub fn teardown(&mut self) {
        if let Some(task) = self.refresh.take() {
            task.cancel();
        } else {
            debug!("Converter already torn down");
        }
    }
}

impl Drop for RateConverterWidget {
    fn drop(&mut self) {
        if self.refresh.is_some() {
            self.teardown();
        }
    }
}
