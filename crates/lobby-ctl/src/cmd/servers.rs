//! Server listing, lookup and registration commands.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::http::{get_json, post_json_body, Target};

#[derive(Deserialize)]
struct ServerInfo {
    ip: String,
    port: u16,
    name: String,
    map: String,
    max_players: u16,
    players: Vec<String>,
    updated_at: i64,
}

/// Body for `POST /servers`.
#[derive(Debug, Serialize)]
pub struct Registration {
    pub port: u16,
    pub name: String,
    pub map: String,
    pub max_players: u16,
    pub players: Vec<String>,
}

pub async fn cmd_list(target: &Target) -> Result<()> {
    let servers: Vec<ServerInfo> = get_json(&format!("{}/servers", target.base_url())).await?;

    if servers.is_empty() {
        println!("No live servers.");
        return Ok(());
    }

    println!("═══════════════════════════════════════");
    println!("  Live Servers ({})", servers.len());
    println!("═══════════════════════════════════════");

    for s in &servers {
        println!("  ┌─ {}:{}", s.ip, s.port);
        println!("  │  name     : {}", s.name);
        println!("  │  map      : {}", s.map);
        println!("  │  players  : {}/{}", s.players.len(), s.max_players);
        println!("  └─ updated  : {}", s.updated_at);
    }

    Ok(())
}

pub async fn cmd_get(target: &Target, ip: &str, port: u16) -> Result<()> {
    let s: ServerInfo =
        get_json(&format!("{}/servers/{}/{}", target.base_url(), ip, port)).await?;

    println!("═══════════════════════════════════════");
    println!("  Server Details");
    println!("═══════════════════════════════════════");
    println!("  Endpoint : {}:{}", s.ip, s.port);
    println!("  Name     : {}", s.name);
    println!("  Map      : {}", s.map);
    println!("  Players  : {}/{}", s.players.len(), s.max_players);
    println!("  Updated  : {}", s.updated_at);

    Ok(())
}

pub async fn cmd_players(target: &Target, ip: &str, port: u16) -> Result<()> {
    let players: Vec<String> =
        get_json(&format!("{}/servers/{}/{}/players", target.base_url(), ip, port)).await?;

    if players.is_empty() {
        println!("No players on {}:{}.", ip, port);
    } else {
        for p in &players {
            println!("{}", p);
        }
    }

    Ok(())
}

pub async fn cmd_register(target: &Target, registration: &Registration) -> Result<()> {
    post_json_body(&format!("{}/servers", target.base_url()), registration).await?;
    println!(
        "✓ Registered {} on port {} ({} players)",
        registration.name,
        registration.port,
        registration.players.len()
    );
    Ok(())
}
