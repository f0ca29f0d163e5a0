use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// Instant as delivered by the backend: either epoch milliseconds or an
/// ISO-8601 string. Kept as-received so an unparsable value can still be
/// displayed raw instead of being dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    Iso(String),
}

impl Timestamp {
    /// Local wall-clock time (`HH:MM:SS`), or `None` when the value does not
    /// parse. Callers fall back to the raw `Display` form on `None`.
    pub fn to_local(&self) -> Option<String> {
        let utc: DateTime<Utc> = match self {
            Self::Millis(ms) => Utc.timestamp_millis_opt(*ms).single()?,
            Self::Iso(s) => DateTime::parse_from_rfc3339(s).ok()?.with_timezone(&Utc),
        };
        Some(utc.with_timezone(&Local).format("%H:%M:%S").to_string())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Millis(ms) => write!(f, "{ms}"),
            Self::Iso(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Inbound payloads
// ---------------------------------------------------------------------------

/// One sensor reading from `/api/latest`, tagged by the `sensor` field.
///
/// Tags this client does not know decode to `Unknown` and are skipped by the
/// chart mappers, so a backend that grows new sensor kinds never breaks the
/// dashboard.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "sensor", rename_all = "snake_case")]
pub enum Reading {
    Dht {
        /// Degrees Celsius
        temperature: f64,
        /// Relative humidity percentage
        humidity: f64,
        ts: Timestamp,
    },
    Light {
        lux: f64,
        ts: Timestamp,
    },
    #[serde(other)]
    Unknown,
}

/// Latest actuator snapshot from `/api/relays`. Replaced wholesale on every
/// refresh; `ts` is null until the first relay change is recorded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RelayState {
    #[serde(default)]
    pub fan: bool,
    #[serde(default)]
    pub pump: bool,
    #[serde(default)]
    pub ts: Option<Timestamp>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Alarm,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Alarm => "alarm",
        }
    }
}

/// One entry from `/api/alerts`. The backend sends newest-first; this client
/// trusts that order and never re-sorts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub ts: Timestamp,
}

// ---------------------------------------------------------------------------
// Outbound manual commands
// ---------------------------------------------------------------------------
//
// Fields that failed numeric parsing are submitted as explicit nulls rather
// than omitted; the backend decides how to reject them.

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DhtOverride {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightOverride {
    pub lux: Option<i64>,
}

/// Serializes to `{}`; the emergency endpoint takes no parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmergencyTrigger {}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnobCommand {
    pub target: Option<String>,
    pub value: Option<f64>,
}

/// Success body of every `/api/manual/*` endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CommandAck {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_decodes_dht_tag() {
        let r: Reading = serde_json::from_str(
            r#"{"sensor":"dht","temperature":24.5,"humidity":61.0,"ts":"2026-08-25T10:00:00+00:00"}"#,
        )
        .unwrap();
        assert_eq!(
            r,
            Reading::Dht {
                temperature: 24.5,
                humidity: 61.0,
                ts: Timestamp::Iso("2026-08-25T10:00:00+00:00".into()),
            }
        );
    }

    #[test]
    fn reading_decodes_light_tag() {
        let r: Reading =
            serde_json::from_str(r#"{"sensor":"light","lux":512,"ts":1756116000000}"#).unwrap();
        assert_eq!(
            r,
            Reading::Light {
                lux: 512.0,
                ts: Timestamp::Millis(1756116000000),
            }
        );
    }

    #[test]
    fn unknown_sensor_tag_decodes_to_unknown() {
        let r: Reading =
            serde_json::from_str(r#"{"sensor":"soil_ph","ph":6.8,"ts":1756116000000}"#).unwrap();
        assert_eq!(r, Reading::Unknown);
    }

    #[test]
    fn relay_state_tolerates_null_ts() {
        let s: RelayState =
            serde_json::from_str(r#"{"fan":false,"pump":false,"ts":null}"#).unwrap();
        assert!(!s.fan);
        assert!(!s.pump);
        assert!(s.ts.is_none());
    }

    #[test]
    fn alert_level_is_a_closed_lowercase_set() {
        let a: Alert = serde_json::from_str(
            r#"{"level":"alarm","message":"Emergency button pressed","ts":"2026-08-25T10:00:00+00:00"}"#,
        )
        .unwrap();
        assert_eq!(a.level, AlertLevel::Alarm);
        assert!(serde_json::from_str::<Alert>(
            r#"{"level":"fatal","message":"x","ts":"2026-08-25T10:00:00+00:00"}"#
        )
        .is_err());
    }

    #[test]
    fn timestamp_formats_both_wire_shapes() {
        assert!(Timestamp::Millis(1756116000000).to_local().is_some());
        assert!(Timestamp::Iso("2026-08-25T10:00:00.123456+00:00".into())
            .to_local()
            .is_some());
    }

    #[test]
    fn unparsable_timestamp_falls_back_to_raw_display() {
        let ts = Timestamp::Iso("not-a-date".into());
        assert!(ts.to_local().is_none());
        assert_eq!(ts.to_string(), "not-a-date");
    }

    #[test]
    fn absent_fields_serialize_as_null() {
        let body = serde_json::to_value(DhtOverride {
            temperature: Some(24.5),
            humidity: None,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"temperature": 24.5, "humidity": null})
        );
    }

    #[test]
    fn emergency_trigger_is_an_empty_object() {
        assert_eq!(
            serde_json::to_value(EmergencyTrigger {}).unwrap(),
            serde_json::json!({})
        );
    }
}
