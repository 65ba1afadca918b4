use lobby_core::ServerEntry;
use serde_json::json;

use crate::*;

#[tokio::test]
async fn test_register_then_get() {
    let server = spawn_server().await.unwrap();

    let (status, body) = server.register(&announcement(7777, &["alice"])).await.unwrap();
    assert_eq!(status, 201);
    assert_eq!(body, json!({}));

    let (status, body) = server.get("/servers/127.0.0.1/7777").await.unwrap();
    assert_eq!(status, 200, "get-one should succeed: {body}");

    let entry: ServerEntry = serde_json::from_value(body).unwrap();
    assert_eq!(
        entry,
        ServerEntry {
            ip: "127.0.0.1".into(),
            port: 7777,
            name: "server-7777".into(),
            map: "dm_arena".into(),
            max_players: 16,
            players: vec!["alice".into()],
            updated_at: START,
        }
    );
    assert_eq!(server.registry.find_by_endpoint("127.0.0.1", 7777), Ok(entry));
}

#[tokio::test]
async fn test_get_players() {
    let server = spawn_server().await.unwrap();
    server
        .register(&announcement(7777, &["alice", "bob"]))
        .await
        .unwrap();

    let (status, body) = server.get("/servers/127.0.0.1/7777/players").await.unwrap();
    assert_eq!(status, 200);
    assert_eq!(body, json!(["alice", "bob"]));
}

#[tokio::test]
async fn test_unknown_server_is_404() {
    let server = spawn_server().await.unwrap();

    let (status, body) = server.get("/servers/10.9.9.9/1234").await.unwrap();
    assert_eq!(status, 404);
    assert_eq!(body["message"], "server not found");

    let (status, _) = server.get("/servers/10.9.9.9/1234/players").await.unwrap();
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_bad_port_is_400() {
    let server = spawn_server().await.unwrap();

    for path in ["/servers/127.0.0.1/notaport", "/servers/127.0.0.1/70000/players"] {
        let (status, body) = server.get(path).await.unwrap();
        assert_eq!(status, 400, "{path}");
        assert_eq!(body["message"], "Invalid port");
    }
}

#[tokio::test]
async fn test_invalid_registration_is_400() {
    let server = spawn_server().await.unwrap();

    let bodies = [
        json!({ "name": "no port", "max_players": 4 }),
        json!({ "port": 0, "name": "zero", "max_players": 4 }),
        json!({ "port": 7777, "name": "", "max_players": 4 }),
        json!({ "port": 7777, "name": "full", "max_players": 1, "players": ["a", "b"] }),
        json!({ "port": 70000, "name": "big", "max_players": 4 }),
    ];
    for body in &bodies {
        let (status, resp) = server.register(body).await.unwrap();
        assert_eq!(status, 400, "{body}");
        assert_eq!(resp["message"], "Invalid input");
    }

    let resp = server
        .client
        .post(server.url("/servers"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    assert!(server.registry.is_empty());
}

#[tokio::test]
async fn test_heartbeat_replaces_entry() {
    let server = spawn_server().await.unwrap();
    server.register(&announcement(7777, &[])).await.unwrap();

    server.clock.advance(10);
    server.register(&announcement(7777, &["alice"])).await.unwrap();

    let (_, body) = server.get("/servers").await.unwrap();
    assert_eq!(listed(&body), vec![(7777, START + 10)]);
    assert_eq!(body[0]["players"], json!(["alice"]));
}

#[tokio::test]
async fn test_list_is_oldest_first() {
    let server = spawn_server().await.unwrap();

    server.register(&announcement(1, &[])).await.unwrap();
    server.clock.advance(20);
    server.register(&announcement(2, &[])).await.unwrap();
    server.clock.advance(20);
    server.register(&announcement(3, &[])).await.unwrap();

    // Port 1 heartbeats last, so it moves to the back.
    server.clock.advance(20);
    server.register(&announcement(1, &[])).await.unwrap();

    let (status, body) = server.get("/servers").await.unwrap();
    assert_eq!(status, 200);
    assert_eq!(
        listed(&body),
        vec![(2, START + 20), (3, START + 40), (1, START + 60)]
    );
}

#[tokio::test]
async fn test_forwarded_for_is_ignored_by_default() {
    let server = spawn_server().await.unwrap();

    server
        .client
        .post(server.url("/servers"))
        .header("x-forwarded-for", "203.0.113.9")
        .json(&announcement(7777, &[]))
        .send()
        .await
        .unwrap();

    let (status, _) = server.get("/servers/127.0.0.1/7777").await.unwrap();
    assert_eq!(status, 200);
    let (status, _) = server.get("/servers/203.0.113.9/7777").await.unwrap();
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_forwarded_for_when_trusted() {
    let server = spawn_server_with(true).await.unwrap();

    let resp = server
        .client
        .post(server.url("/servers"))
        .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
        .json(&announcement(7777, &[]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let (status, body) = server.get("/servers/203.0.113.9/7777").await.unwrap();
    assert_eq!(status, 200);
    assert_eq!(body["ip"], "203.0.113.9");
}
