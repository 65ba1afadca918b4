//! lobby integration test harness.
//!
//! Every test serves the real API router on an ephemeral loopback port and
//! talks to it over HTTP. Time is driven by a ManualClock shared with the
//! registry, so expiry is tested without sleeping.
//!
//!   cargo test --test integration

mod expiry;
mod servers;

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use lobby_api::ApiState;
use lobby_registry::{new_registry, ManualClock, SharedRegistry};

// ── Harness ───────────────────────────────────────────────────────────────────

pub const TTL_SECS: u64 = 300;
pub const START: i64 = 1_000;

/// A running API server. Shuts down when dropped.
pub struct TestServer {
    pub base: String,
    pub clock: Arc<ManualClock>,
    pub registry: SharedRegistry,
    pub client: reqwest::Client,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(false).await
}

pub async fn spawn_server_with(trust_forwarded_for: bool) -> Result<TestServer> {
    let clock = Arc::new(ManualClock::new(START));
    let registry = new_registry(TTL_SECS, clock.clone());
    let state = ApiState::new(registry.clone(), trust_forwarded_for);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;

    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let shutdown = async move {
            rx.await.ok();
        };
        if let Err(e) = lobby_api::serve_on(listener, state, shutdown).await {
            eprintln!("test server failed: {e}");
        }
    });

    Ok(TestServer {
        base: format!("http://{addr}/api"),
        clock,
        registry,
        client: reqwest::Client::new(),
        shutdown: Some(tx),
    })
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn get(&self, path: &str) -> Result<(u16, Value)> {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("GET {path} failed"))?;
        let status = resp.status().as_u16();
        let body = resp.json::<Value>().await.context("body was not JSON")?;
        Ok((status, body))
    }

    pub async fn register(&self, body: &Value) -> Result<(u16, Value)> {
        let resp = self
            .client
            .post(self.url("/servers"))
            .json(body)
            .send()
            .await
            .context("POST /servers failed")?;
        let status = resp.status().as_u16();
        let body = resp.json::<Value>().await.context("body was not JSON")?;
        Ok((status, body))
    }
}

/// A valid registration body.
pub fn announcement(port: u16, players: &[&str]) -> Value {
    json!({
        "port": port,
        "name": format!("server-{port}"),
        "map": "dm_arena",
        "max_players": 16,
        "players": players,
    })
}

/// Listed entries as (port, updated_at) pairs.
pub fn listed(body: &Value) -> Vec<(u64, i64)> {
    body.as_array()
        .map(|servers| {
            servers
                .iter()
                .map(|s| {
                    (
                        s["port"].as_u64().unwrap_or_default(),
                        s["updated_at"].as_i64().unwrap_or_default(),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}
