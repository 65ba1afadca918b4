//! /servers handlers — registration and discovery.

use std::net::{IpAddr, SocketAddr};

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use lobby_core::{RegistryError, ServerEntry};

use super::{api_error, parse_port, ApiError, ApiState};

pub const MAX_NAME_LEN: usize = 64;
pub const MAX_MAP_LEN: usize = 64;
pub const MAX_PLAYER_NAME_LEN: usize = 32;
pub const MAX_PLAYERS: usize = 64;

// ── /servers (POST) ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterServerRequest {
    pub port: u16,
    pub name: String,
    #[serde(default)]
    pub map: String,
    pub max_players: u16,
    #[serde(default)]
    pub players: Vec<String>,
}

impl RegisterServerRequest {
    /// Reject announcements no game client could make sense of.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.port == 0 {
            return Err("port must be non-zero");
        }
        if self.name.trim().is_empty() || self.name.chars().count() > MAX_NAME_LEN {
            return Err("name must be 1-64 characters");
        }
        if self.map.chars().count() > MAX_MAP_LEN {
            return Err("map must be at most 64 characters");
        }
        if self.players.len() > MAX_PLAYERS || self.players.len() > self.max_players as usize {
            return Err("too many players");
        }
        if self
            .players
            .iter()
            .any(|p| p.is_empty() || p.chars().count() > MAX_PLAYER_NAME_LEN)
        {
            return Err("player names must be 1-32 characters");
        }
        Ok(())
    }

    fn into_entry(self, ip: String, updated_at: i64) -> ServerEntry {
        ServerEntry {
            ip,
            port: self.port,
            name: self.name,
            map: self.map,
            max_players: self.max_players,
            players: self.players,
            updated_at,
        }
    }
}

/// The registering server's address: the TCP peer, or the first
/// X-Forwarded-For hop when the deployment says to trust it.
pub fn client_ip(peer: SocketAddr, headers: &HeaderMap, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|hop| hop.trim().parse::<IpAddr>().ok());
        if let Some(ip) = forwarded {
            return ip.to_canonical().to_string();
        }
    }
    peer.ip().to_canonical().to_string()
}

pub async fn handle_register_server(
    State(state): State<ApiState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<RegisterServerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let Json(request) = payload.map_err(|e| {
        tracing::debug!(error = %e, peer = %peer, "malformed registration");
        api_error(StatusCode::BAD_REQUEST, "Invalid input")
    })?;

    if let Err(reason) = request.validate() {
        tracing::debug!(reason, peer = %peer, "rejected registration");
        return Err(api_error(StatusCode::BAD_REQUEST, "Invalid input"));
    }

    let ip = client_ip(peer, &headers, state.trust_forwarded_for);
    let entry = request.into_entry(ip, state.registry.now());

    state.registry.upsert(entry);

    Ok((StatusCode::CREATED, Json(serde_json::json!({}))))
}

// ── /servers (GET) ────────────────────────────────────────────────────────────

pub async fn handle_list_servers(State(state): State<ApiState>) -> Json<Vec<ServerEntry>> {
    Json(state.registry.list_live())
}

// ── /servers/{ip}/{port} ──────────────────────────────────────────────────────

fn not_found(err: RegistryError) -> ApiError {
    tracing::debug!(error = %err, "lookup missed");
    api_error(StatusCode::NOT_FOUND, "server not found")
}

pub async fn handle_get_server(
    State(state): State<ApiState>,
    Path((ip, port)): Path<(String, String)>,
) -> Result<Json<ServerEntry>, ApiError> {
    let port = parse_port(&port)?;
    state
        .registry
        .get_live(&ip, port)
        .map(Json)
        .map_err(not_found)
}

// ── /servers/{ip}/{port}/players ──────────────────────────────────────────────

pub async fn handle_get_players(
    State(state): State<ApiState>,
    Path((ip, port)): Path<(String, String)>,
) -> Result<Json<Vec<String>>, ApiError> {
    let port = parse_port(&port)?;
    state
        .registry
        .players_of(&ip, port)
        .map(Json)
        .map_err(not_found)
}
