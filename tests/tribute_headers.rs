//! End-to-end tests of the tribute headers over real HTTP.

use std::net::SocketAddr;
use std::time::Duration;

use serde_json::json;

mod common;

use common::{client, header_values, start_server, test_config, ADMIN_KEY};

const DEFAULT_TRIBUTE: &str = "Ozzy \"The Prince of Darkness\" Osbourne";

#[tokio::test]
async fn test_default_tribute_on_every_surface() {
    let addr: SocketAddr = "127.0.0.1:28381".parse().unwrap();
    let shutdown = start_server(test_config(addr, None)).await;
    let client = client();

    for path in ["/", "/login", "/api/v1/status", "/api/v1/unknown", "/nowhere"] {
        let res = client.get(format!("http://{}{}", addr, path)).send().await.unwrap();
        assert_eq!(
            header_values(&res, "x-clacks-overhead"),
            [DEFAULT_TRIBUTE],
            "path {path}"
        );
        assert!(header_values(&res, "x-clacks-overhead-encoded").is_empty());
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_terry_pratchett_scenario() {
    let addr: SocketAddr = "127.0.0.1:28382".parse().unwrap();
    let shutdown = start_server(test_config(addr, None)).await;
    let client = client();

    let res = client
        .put(format!("http://{}/admin/settings", addr))
        .bearer_auth(ADMIN_KEY)
        .json(&json!({ "enabled": 1, "message": "Terry Pratchett", "send_hex": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let saved: serde_json::Value = res.json().await.unwrap();
    assert_eq!(saved, json!({ "enabled": true, "message": "Terry Pratchett", "send_hex": true }));

    let res = client.get(format!("http://{}/", addr)).send().await.unwrap();
    assert_eq!(header_values(&res, "x-clacks-overhead"), ["Terry Pratchett"]);
    assert_eq!(
        header_values(&res, "x-clacks-overhead-encoded"),
        ["54 65 72 72 79 20 50 72 61 74 63 68 65 74 74"]
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_empty_save_disables_tribute() {
    let addr: SocketAddr = "127.0.0.1:28383".parse().unwrap();
    let shutdown = start_server(test_config(addr, None)).await;
    let client = client();

    let res = client
        .put(format!("http://{}/admin/settings", addr))
        .bearer_auth(ADMIN_KEY)
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    let saved: serde_json::Value = res.json().await.unwrap();
    assert_eq!(saved, json!({ "enabled": false, "message": DEFAULT_TRIBUTE, "send_hex": false }));

    for path in ["/", "/login", "/api/v1/status"] {
        let res = client.get(format!("http://{}{}", addr, path)).send().await.unwrap();
        assert!(header_values(&res, "x-clacks-overhead").is_empty(), "path {path}");
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_header_injection_is_neutralized() {
    let addr: SocketAddr = "127.0.0.1:28384".parse().unwrap();
    let shutdown = start_server(test_config(addr, None)).await;
    let client = client();

    let res = client
        .post(format!("http://{}/admin/settings/page", addr))
        .bearer_auth(ADMIN_KEY)
        .form(&[("enabled", "1"), ("message", "GNU Terry Pratchett\r\nSet-Cookie: pwned=1")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 303);

    let res = client.get(format!("http://{}/", addr)).send().await.unwrap();
    assert_eq!(
        header_values(&res, "x-clacks-overhead"),
        ["GNU Terry Pratchett Set-Cookie: pwned=1"]
    );
    assert!(res.headers().get("set-cookie").is_none());

    shutdown.trigger();
}

#[tokio::test]
async fn test_admin_form_page() {
    let addr: SocketAddr = "127.0.0.1:28385".parse().unwrap();
    let shutdown = start_server(test_config(addr, None)).await;
    let client = client();

    let res = client
        .get(format!("http://{}/admin/settings/page", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);

    let res = client
        .get(format!("http://{}/admin/settings/page?updated=true", addr))
        .bearer_auth(ADMIN_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let html = res.text().await.unwrap();
    assert!(html.contains("Settings saved."));
    assert!(html.contains(r#"name="enabled" value="1" checked>"#));

    shutdown.trigger();
}

#[tokio::test]
async fn test_settings_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let options = dir.path().join("options.json");
    let client = client();

    let addr: SocketAddr = "127.0.0.1:28386".parse().unwrap();
    let shutdown = start_server(test_config(addr, Some(&options))).await;
    client
        .put(format!("http://{}/admin/settings", addr))
        .bearer_auth(ADMIN_KEY)
        .json(&json!({ "enabled": "on", "message": "Ada Lovelace" }))
        .send()
        .await
        .unwrap();
    shutdown.trigger();

    let addr: SocketAddr = "127.0.0.1:28387".parse().unwrap();
    let shutdown = start_server(test_config(addr, Some(&options))).await;
    let res = client.get(format!("http://{}/", addr)).send().await.unwrap();
    assert_eq!(header_values(&res, "x-clacks-overhead"), ["Ada Lovelace"]);

    shutdown.trigger();
}

#[tokio::test]
async fn test_option_file_edit_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    let options = dir.path().join("options.json");

    let addr: SocketAddr = "127.0.0.1:28388".parse().unwrap();
    let shutdown = start_server(test_config(addr, Some(&options))).await;
    let client = client();

    std::fs::write(
        &options,
        r#"{"xclacks_overhead_options": {"enabled": 1, "message": "Grace Hopper", "send_hex": 0}}"#,
    )
    .unwrap();

    let mut seen = Vec::new();
    for _ in 0..20 {
        tokio::time::sleep(Duration::from_millis(250)).await;
        let res = client.get(format!("http://{}/", addr)).send().await.unwrap();
        seen = header_values(&res, "x-clacks-overhead");
        if seen == ["Grace Hopper"] {
            break;
        }
    }
    assert_eq!(seen, ["Grace Hopper"]);

    shutdown.trigger();
}
