use crate::backend::models::{Reading, Timestamp};

/// One plottable point. `x` stays in whatever form the backend sent it;
/// readings arrive in chronological order and are plotted as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: Timestamp,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: &'static str,
    pub data: Vec<Point>,
}

/// One chart's dataset replacement + redraw.
///
/// `update` replaces the whole dataset array from the latest snapshot; there
/// is no diffing, so repeated calls with the same snapshot are idempotent and
/// overlapping refresh cycles cannot produce mixed data.
pub trait ChartSink {
    fn update(&mut self, datasets: Vec<Dataset>);
}

/// Project the DHT readings into (temperature, humidity) series, preserving
/// input order. Non-DHT and unknown tags are excluded.
pub fn map_dht(readings: &[Reading]) -> (Vec<Point>, Vec<Point>) {
    let mut temp = Vec::new();
    let mut hum = Vec::new();
    for r in readings {
        if let Reading::Dht {
            temperature,
            humidity,
            ts,
        } = r
        {
            temp.push(Point {
                x: ts.clone(),
                y: *temperature,
            });
            hum.push(Point {
                x: ts.clone(),
                y: *humidity,
            });
        }
    }
    (temp, hum)
}

/// Project the light readings into a lux series, preserving input order.
pub fn map_light(readings: &[Reading]) -> Vec<Point> {
    readings
        .iter()
        .filter_map(|r| match r {
            Reading::Light { lux, ts } => Some(Point {
                x: ts.clone(),
                y: *lux,
            }),
            _ => None,
        })
        .collect()
}

pub fn dht_datasets(readings: &[Reading]) -> Vec<Dataset> {
    let (temp, hum) = map_dht(readings);
    vec![
        Dataset {
            label: "Temperature (°C)",
            data: temp,
        },
        Dataset {
            label: "Humidity (%)",
            data: hum,
        },
    ]
}

pub fn light_datasets(readings: &[Reading]) -> Vec<Dataset> {
    vec![Dataset {
        label: "Lux",
        data: map_light(readings),
    }]
}
