pub mod term;

use crate::backend::models::{Alert, Reading, RelayState, Timestamp};
use crate::charts::{dht_datasets, light_datasets, ChartSink};

/// The labelled regions of the page surface, one per element the original
/// markup exposes: the relay chip row, the alert list, and the four
/// manual-command status labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Relays,
    AlertsList,
    DhtStatus,
    LightStatus,
    BtnStatus,
    KnobStatus,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relays => "relays",
            Self::AlertsList => "alerts",
            Self::DhtStatus => "dht status",
            Self::LightStatus => "light status",
            Self::BtnStatus => "emergency status",
            Self::KnobStatus => "knob status",
        }
    }
}

/// Output surface the dashboard renders into. Each write replaces the whole
/// region, never patches it, so renders from overlapping cycles stay
/// self-consistent.
pub trait Surface {
    fn set_block(&mut self, region: Region, text: String);
}

/// Local time for display, or the raw wire value when it does not parse.
/// A bad timestamp must never blank a field or abort a render.
fn format_ts(ts: &Timestamp) -> String {
    ts.to_local().unwrap_or_else(|| ts.to_string())
}

/// Owns the two chart sinks and the text surface for the page's lifetime.
///
/// Both refresh cycles and the command submitter render through this struct;
/// every method is a complete replacement of its target region, so it is safe
/// for a fast relay-only render to be overwritten by a slightly older
/// full-cycle render that was in flight concurrently.
pub struct Dashboard<C: ChartSink, S: Surface> {
    pub(crate) dht_chart: C,
    pub(crate) light_chart: C,
    pub(crate) surface: S,
}

impl<C: ChartSink, S: Surface> Dashboard<C, S> {
    pub fn new(dht_chart: C, light_chart: C, surface: S) -> Self {
        Self {
            dht_chart,
            light_chart,
            surface,
        }
    }

    /// Render the relay chips. `None` means the fetch failed this cycle; the
    /// previous chips stay on screen untouched.
    pub fn render_relays(&mut self, relays: Option<&RelayState>) {
        let Some(relays) = relays else { return };

        let updated = match &relays.ts {
            Some(ts) => format_ts(ts),
            None => "-".to_owned(),
        };
        let text = format!(
            "Fan: {} | Pump: {} | Updated: {}",
            if relays.fan { "ON" } else { "OFF" },
            if relays.pump { "ON" } else { "OFF" },
            updated,
        );
        self.surface.set_block(Region::Relays, text);
    }

    /// Render the alert list in server order. `None` means the fetch failed
    /// this cycle; the previous list stays untouched.
    pub fn render_alerts(&mut self, alerts: Option<&[Alert]>) {
        let Some(alerts) = alerts else { return };

        let text = alerts
            .iter()
            .map(|a| {
                format!(
                    "{} - {} ({})",
                    a.level.as_str().to_uppercase(),
                    a.message,
                    format_ts(&a.ts),
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        self.surface.set_block(Region::AlertsList, text);
    }

    /// Replace both charts' datasets from one readings snapshot.
    pub fn update_charts(&mut self, readings: &[Reading]) {
        self.dht_chart.update(dht_datasets(readings));
        self.light_chart.update(light_datasets(readings));
    }

    pub fn set_status(&mut self, region: Region, text: String) {
        self.surface.set_block(region, text);
    }
}
