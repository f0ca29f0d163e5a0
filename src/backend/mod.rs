pub mod models;

use std::sync::Arc;

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

use self::models::{
    Alert, CommandAck, DhtOverride, EmergencyTrigger, KnobCommand, LightOverride, Reading,
    RelayState,
};

/// Failure of a manual-control POST. Unlike GET polling, these are surfaced
/// to the operator, so the backend's rejection text is carried verbatim.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Non-2xx response; `Display` is the raw response body.
    #[error("{0}")]
    Rejected(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// The three polling endpoints, as a trait so the refresh service can be
/// driven by a fake backend in tests.
#[allow(async_fn_in_trait)]
pub trait DashboardApi {
    async fn latest_readings(&self) -> Option<Vec<Reading>>;
    async fn alerts(&self) -> Option<Vec<Alert>>;
    async fn relay_state(&self) -> Option<RelayState>;
}

/// HTTP client for the greenhouse backend.
///
/// Wrapped in `Arc` so it can be cheaply cloned into the refresh tasks and
/// the command submitter, all sharing one connection pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(&config.backend_base_url)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            inner: Arc::new(Inner {
                http: Client::new(),
                base_url: base_url.trim_end_matches('/').to_owned(),
            }),
        }
    }

    /// GET `path` and decode the body as `T`.
    ///
    /// Soft-failure path: any transport or decode problem collapses to `None`
    /// so one bad cycle never tears down the dashboard or clears prior state.
    /// Callers must treat `None` as "no update this cycle".
    pub async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        let url = format!("{}{}", self.inner.base_url, path);
        let res = match self.inner.http.get(&url).send().await {
            Ok(res) => res,
            Err(e) => {
                warn!(url = %url, error = %e, "GET failed, skipping this cycle");
                return None;
            }
        };
        match res.json::<T>().await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(url = %url, error = %e, "GET body did not decode, skipping this cycle");
                None
            }
        }
    }

    /// POST `body` to `path` and decode the response as `R`.
    ///
    /// Hard-failure path: a non-2xx status fails with the response body text
    /// so the operator sees exactly what the backend rejected.
    pub async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, CommandError> {
        let url = format!("{}{}", self.inner.base_url, path);
        let res = self.inner.http.post(&url).json(body).send().await?;
        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            debug!(url = %url, status = %status, "manual command rejected");
            return Err(CommandError::Rejected(text));
        }
        Ok(res.json::<R>().await?)
    }

    pub async fn send_dht(&self, cmd: &DhtOverride) -> Result<CommandAck, CommandError> {
        self.post_json("/api/manual/dht", cmd).await
    }

    pub async fn send_light(&self, cmd: &LightOverride) -> Result<CommandAck, CommandError> {
        self.post_json("/api/manual/light", cmd).await
    }

    pub async fn send_emergency(&self) -> Result<CommandAck, CommandError> {
        self.post_json("/api/manual/emergency", &EmergencyTrigger {}).await
    }

    pub async fn send_knob(&self, cmd: &KnobCommand) -> Result<CommandAck, CommandError> {
        self.post_json("/api/manual/knob", cmd).await
    }
}

impl DashboardApi for BackendClient {
    async fn latest_readings(&self) -> Option<Vec<Reading>> {
        self.fetch_json("/api/latest").await
    }

    async fn alerts(&self) -> Option<Vec<Alert>> {
        self.fetch_json("/api/alerts").await
    }

    async fn relay_state(&self) -> Option<RelayState> {
        self.fetch_json("/api/relays").await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use axum::{
        extract::State,
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    use super::*;

    /// Serve `router` on an ephemeral local port, returning the base URL.
    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn fetch_json_decodes_readings() {
        let router = Router::new().route(
            "/api/latest",
            get(|| async {
                Json(json!([
                    {"sensor":"dht","temperature":22.0,"humidity":55.0,"ts":1756116000000i64},
                    {"sensor":"light","lux":300,"ts":1756116000000i64},
                ]))
            }),
        );
        let client = BackendClient::with_base_url(&spawn_backend(router).await);

        let readings = client.latest_readings().await.unwrap();
        assert_eq!(readings.len(), 2);
    }

    #[tokio::test]
    async fn fetch_json_collapses_non_json_body_to_none() {
        let router = Router::new().route("/api/relays", get(|| async { "<html>oops</html>" }));
        let client = BackendClient::with_base_url(&spawn_backend(router).await);

        assert!(client.relay_state().await.is_none());
    }

    #[tokio::test]
    async fn fetch_json_collapses_connection_failure_to_none() {
        // Bind then drop a listener so the port is known-dead.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = BackendClient::with_base_url(&format!("http://{addr}"));
        assert!(client.latest_readings().await.is_none());
    }

    #[tokio::test]
    async fn post_json_carries_rejection_body_verbatim() {
        let router = Router::new().route(
            "/api/manual/knob",
            post(|| async { (StatusCode::BAD_REQUEST, "bad target") }),
        );
        let client = BackendClient::with_base_url(&spawn_backend(router).await);

        let err = client
            .send_knob(&KnobCommand {
                target: Some("fan_temp".into()),
                value: Some(5.0),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "bad target");
    }

    #[tokio::test]
    async fn send_knob_posts_expected_body() {
        type Seen = Arc<Mutex<Option<Value>>>;
        let seen: Seen = Arc::new(Mutex::new(None));

        let router = Router::new()
            .route(
                "/api/manual/knob",
                post(|State(seen): State<Seen>, Json(body): Json<Value>| async move {
                    *seen.lock().unwrap() = Some(body);
                    Json(json!({"ok": true}))
                }),
            )
            .with_state(seen.clone());
        let client = BackendClient::with_base_url(&spawn_backend(router).await);

        let ack = client
            .send_knob(&KnobCommand {
                target: Some("fan_temp".into()),
                value: Some(5.0),
            })
            .await
            .unwrap();
        assert!(ack.ok);
        assert_eq!(
            seen.lock().unwrap().take().unwrap(),
            json!({"target": "fan_temp", "value": 5.0})
        );
    }

    #[tokio::test]
    async fn send_emergency_posts_empty_object() {
        type Seen = Arc<Mutex<Option<Value>>>;
        let seen: Seen = Arc::new(Mutex::new(None));

        let router = Router::new()
            .route(
                "/api/manual/emergency",
                post(|State(seen): State<Seen>, Json(body): Json<Value>| async move {
                    *seen.lock().unwrap() = Some(body);
                    Json(json!({"ok": true}))
                }),
            )
            .with_state(seen.clone());
        let client = BackendClient::with_base_url(&spawn_backend(router).await);

        client.send_emergency().await.unwrap();
        assert_eq!(seen.lock().unwrap().take().unwrap(), json!({}));
    }
}
