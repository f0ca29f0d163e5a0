use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;
use tokio::time::{self, Instant};
use tracing::{debug, info};

use crate::backend::DashboardApi;
use crate::charts::ChartSink;
use crate::render::{Dashboard, Surface};

/// Drives the two polling cadences against one shared dashboard.
///
/// Both loops are non-cancellable background tasks bound to the process
/// lifetime: spawn `run_full_cycles` and `run_relay_cycles` once each via
/// `tokio::spawn` and never again. The loops share no lock beyond the
/// dashboard itself and may overlap in wall-clock time; that is safe because
/// every render is a full replacement of its region (see `render`).
pub struct RefreshService<A, C: ChartSink, S: Surface> {
    api: A,
    dashboard: Arc<Mutex<Dashboard<C, S>>>,
    full_interval: Duration,
    relay_interval: Duration,
}

impl<A: Clone, C: ChartSink, S: Surface> Clone for RefreshService<A, C, S> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            dashboard: Arc::clone(&self.dashboard),
            full_interval: self.full_interval,
            relay_interval: self.relay_interval,
        }
    }
}

impl<A: DashboardApi, C: ChartSink, S: Surface> RefreshService<A, C, S> {
    pub fn new(
        api: A,
        dashboard: Arc<Mutex<Dashboard<C, S>>>,
        full_interval: Duration,
        relay_interval: Duration,
    ) -> Self {
        Self {
            api,
            dashboard,
            full_interval,
            relay_interval,
        }
    }

    /// Full cycle: readings + alerts + relays, every `full_interval`, with an
    /// immediate run at startup.
    pub async fn run_full_cycles(self) {
        info!(
            period_secs = self.full_interval.as_secs(),
            "full refresh loop started"
        );
        let mut ticker = time::interval(self.full_interval);
        loop {
            ticker.tick().await;
            self.full_cycle().await;
        }
    }

    /// Relay-only cycle, every `relay_interval`. No immediate run; startup
    /// coverage comes from the full cycle's first pass.
    pub async fn run_relay_cycles(self) {
        info!(
            period_secs = self.relay_interval.as_secs(),
            "relay refresh loop started"
        );
        let start = Instant::now() + self.relay_interval;
        let mut ticker = time::interval_at(start, self.relay_interval);
        loop {
            ticker.tick().await;
            self.relay_cycle().await;
        }
    }

    /// One full refresh: the three GETs run concurrently and rendering only
    /// starts once all of them have resolved. Each render path is guarded on
    /// its own fetch result, so one failed endpoint never blocks the others.
    async fn full_cycle(&self) {
        let (readings, alerts, relays) = tokio::join!(
            self.api.latest_readings(),
            self.api.alerts(),
            self.api.relay_state(),
        );
        debug!(
            readings_ok = readings.is_some(),
            alerts_ok = alerts.is_some(),
            relays_ok = relays.is_some(),
            "full cycle resolved"
        );

        let mut dash = self.dashboard.lock().await;
        dash.render_relays(relays.as_ref());
        // A failed readings fetch renders as the empty snapshot; both charts
        // always come from the same snapshot.
        let readings = readings.unwrap_or_default();
        dash.update_charts(&readings);
        dash.render_alerts(alerts.as_deref());
    }

    async fn relay_cycle(&self) {
        let relays = self.api.relay_state().await;
        self.dashboard.lock().await.render_relays(relays.as_ref());
    }
}
