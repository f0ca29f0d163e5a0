use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::backend::models::{DhtOverride, KnobCommand, LightOverride};
use crate::backend::BackendClient;
use crate::charts::ChartSink;
use crate::render::{Dashboard, Region, Surface};

/// Raw values of the five manual-control input fields. Parsing happens at
/// submit time; an unparseable field is sent as null, it never blocks the
/// submission.
#[derive(Debug, Clone, Default)]
pub struct ManualForm {
    pub temp: Option<String>,
    pub hum: Option<String>,
    pub lux: Option<String>,
    pub target: Option<String>,
    pub tval: Option<String>,
}

fn parse_f64(field: &Option<String>) -> Option<f64> {
    field.as_deref()?.trim().parse().ok()
}

fn parse_i64(field: &Option<String>) -> Option<i64> {
    field.as_deref()?.trim().parse().ok()
}

/// Submits manual-override commands and writes the outcome into the matching
/// status region. One attempt per invocation, no retries; a rejection's body
/// text reaches the operator verbatim.
pub struct CommandSubmitter<C: ChartSink, S: Surface> {
    backend: BackendClient,
    dashboard: Arc<Mutex<Dashboard<C, S>>>,
}

impl<C: ChartSink, S: Surface> CommandSubmitter<C, S> {
    pub fn new(backend: BackendClient, dashboard: Arc<Mutex<Dashboard<C, S>>>) -> Self {
        Self { backend, dashboard }
    }

    pub async fn send_dht(&self, form: &ManualForm) {
        let cmd = DhtOverride {
            temperature: parse_f64(&form.temp),
            humidity: parse_f64(&form.hum),
        };
        info!(?cmd, "submitting DHT override");
        let text = match self.backend.send_dht(&cmd).await {
            Ok(_) => "Sent ✓".to_owned(),
            Err(e) => format!("Error: {e}"),
        };
        self.set_status(Region::DhtStatus, text).await;
    }

    pub async fn send_light(&self, form: &ManualForm) {
        let cmd = LightOverride {
            lux: parse_i64(&form.lux),
        };
        info!(?cmd, "submitting light override");
        let text = match self.backend.send_light(&cmd).await {
            Ok(_) => "Sent ✓".to_owned(),
            Err(e) => format!("Error: {e}"),
        };
        self.set_status(Region::LightStatus, text).await;
    }

    pub async fn send_emergency(&self) {
        info!("submitting emergency trigger");
        let text = match self.backend.send_emergency().await {
            Ok(_) => "Emergency sent!".to_owned(),
            Err(e) => format!("Error: {e}"),
        };
        self.set_status(Region::BtnStatus, text).await;
    }

    pub async fn send_knob(&self, form: &ManualForm) {
        let cmd = KnobCommand {
            target: form.target.clone(),
            value: parse_f64(&form.tval),
        };
        info!(?cmd, "submitting threshold knob");
        let text = match self.backend.send_knob(&cmd).await {
            Ok(_) => "Threshold updated ✓".to_owned(),
            Err(e) => format!("Error: {e}"),
        };
        self.set_status(Region::KnobStatus, text).await;
    }

    async fn set_status(&self, region: Region, text: String) {
        self.dashboard.lock().await.set_status(region, text);
    }
}
