use serde_json::json;

use crate::*;

#[tokio::test]
async fn test_entry_expires_after_ttl() {
    let server = spawn_server().await.unwrap();
    server.register(&announcement(7777, &[])).await.unwrap();

    server.clock.advance(10);
    server.register(&announcement(7777, &["alice"])).await.unwrap();

    let (status, body) = server.get("/servers/127.0.0.1/7777").await.unwrap();
    assert_eq!(status, 200);
    assert_eq!(body["updated_at"], START + 10);

    // 310s after the heartbeat: past the TTL.
    server.clock.set(START + 320);
    let (_, body) = server.get("/servers").await.unwrap();
    assert_eq!(body, json!([]));

    let (status, _) = server.get("/servers/127.0.0.1/7777").await.unwrap();
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_entry_alive_at_exact_ttl() {
    let server = spawn_server().await.unwrap();
    server.register(&announcement(7777, &[])).await.unwrap();

    server.clock.advance(TTL_SECS as i64);
    let (status, _) = server.get("/servers/127.0.0.1/7777").await.unwrap();
    assert_eq!(status, 200);

    server.clock.advance(1);
    let (status, _) = server.get("/servers/127.0.0.1/7777/players").await.unwrap();
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_any_read_sweeps() {
    let server = spawn_server().await.unwrap();
    server.register(&announcement(1, &[])).await.unwrap();
    server.register(&announcement(2, &[])).await.unwrap();
    assert_eq!(server.registry.len(), 2);

    server.clock.advance(1_000);
    // Writes don't sweep.
    server.register(&announcement(3, &[])).await.unwrap();
    assert_eq!(server.registry.len(), 3);

    // A miss on an unrelated endpoint still evicts.
    let (status, _) = server.get("/servers/127.0.0.1/9").await.unwrap();
    assert_eq!(status, 404);
    assert_eq!(server.registry.len(), 1);
}

#[tokio::test]
async fn test_expired_endpoint_reregisters() {
    let server = spawn_server().await.unwrap();
    server.register(&announcement(7777, &["old"])).await.unwrap();

    server.clock.advance(600);
    let (_, body) = server.get("/servers").await.unwrap();
    assert_eq!(body, json!([]));

    server.register(&announcement(7777, &["new"])).await.unwrap();
    let (_, body) = server.get("/servers").await.unwrap();
    assert_eq!(listed(&body), vec![(7777, START + 600)]);
    assert_eq!(body[0]["players"], json!(["new"]));
}
