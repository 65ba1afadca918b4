//! Daemon status command.

use anyhow::Result;
use serde::Deserialize;

use super::http::{get_json, Target};

pub async fn cmd_status(target: &Target) -> Result<()> {
    #[derive(Deserialize)]
    struct StatusResponse {
        servers: usize,
        ttl_secs: i64,
        uptime_secs: u64,
    }

    let resp: StatusResponse = get_json(&format!("{}/status", target.base_url())).await?;

    println!("═══════════════════════════════════════");
    println!("  Lobby Status");
    println!("═══════════════════════════════════════");
    println!("  Live servers : {}", resp.servers);
    println!("  Expiry       : {}s", resp.ttl_secs);
    println!("  Uptime       : {}s", resp.uptime_secs);

    Ok(())
}
