#![allow(clippy::unwrap_used)]
// Integration tests for `LegacyClient`, `SessionManager` and `WebhookClient`
// using wiremock.

use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use notifly_api::{
    ControllerPlatform, Credentials, Error, LegacyClient, Pagination, SessionManager,
    SessionToken, SlackMessage, WebhookClient,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, LegacyClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = LegacyClient::with_client(
        reqwest::Client::new(),
        base_url,
        ControllerPlatform::ClassicController,
    );
    (server, client)
}

fn site_path(suffix: &str) -> String {
    format!("/api/s/default/{suffix}")
}

fn credentials() -> Credentials {
    Credentials {
        username: "admin".into(),
        password: SecretString::from("test-password".to_string()),
    }
}

fn login_ok(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("set-cookie", format!("unifises={token}; Path=/; HttpOnly").as_str())
        .set_body_json(json!({ "meta": { "rc": "ok" }, "data": [] }))
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_returns_session_cookie() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({ "username": "admin", "password": "test-password" })))
        .respond_with(login_ok("abc123"))
        .expect(1)
        .mount(&server)
        .await;

    let token = client.login(&credentials()).await.unwrap();
    assert_eq!(token.expose(), "abc123");
}

#[tokio::test]
async fn test_login_failure_carries_status_and_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(400).set_body_string("api.err.Invalid"))
        .mount(&server)
        .await;

    match client.login(&credentials()).await {
        Err(Error::Authentication { status, message }) => {
            assert_eq!(status, 400);
            assert!(message.contains("api.err.Invalid"), "got: {message}");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_login_without_cookie_is_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "meta": { "rc": "ok" } })))
        .mount(&server)
        .await;

    let result = client.login(&credentials()).await;
    assert!(
        matches!(result, Err(Error::Authentication { status: 200, .. })),
        "expected Authentication error, got: {result:?}"
    );
}

// ── Paged reads ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_alarms_sends_cookie_and_cursor() {
    let (server, client) = setup().await;

    let envelope = json!({
        "meta": { "rc": "ok", "count": 1 },
        "data": [{
            "_id": "alarm001",
            "key": "EVT_IPS_IpsAlert",
            "msg": "IPS Alert 1: ET SCAN Potential SSH Scan",
            "datetime": "2024-06-15T10:30:00Z",
            "src_ip": "203.0.113.9",
            "inner_alert_severity": 2
        }]
    });

    Mock::given(method("POST"))
        .and(path(site_path("stat/alarm")))
        .and(header("cookie", "unifises=tok"))
        .and(body_json(json!({ "_start": 20, "_limit": 40 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let alarms = client
        .list_alarms("default", &SessionToken::new("tok"), Pagination::new(20, 40))
        .await
        .unwrap();

    assert_eq!(alarms.len(), 1);
    assert_eq!(alarms[0].id, "alarm001");
    assert_eq!(alarms[0].src_ip.as_deref(), Some("203.0.113.9"));
    assert_eq!(alarms[0].inner_alert_severity, Some(2));
}

#[tokio::test]
async fn test_directories_are_fetched_unpaged() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(site_path("stat/device-basic")))
        .and(body_json(json!({ "_start": 0, "_limit": 0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "ok" },
            "data": [{ "mac": "aa:bb:cc:00:00:01", "name": "Office AP", "type": "uap" }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(site_path("list/user")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "ok" },
            "data": [{ "_id": "u1", "mac": "aa:bb:cc:00:00:02", "hostname": "laptop" }]
        })))
        .mount(&server)
        .await;

    let token = SessionToken::new("tok");
    let devices = client.list_devices_basic("default", &token).await.unwrap();
    let users = client.list_users("default", &token).await.unwrap();

    assert_eq!(devices[0].name.as_deref(), Some("Office AP"));
    assert_eq!(users[0].hostname.as_deref(), Some("laptop"));
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_maps_to_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client
        .list_events("default", &SessionToken::new("stale"), Pagination::new(0, 20))
        .await;

    assert!(matches!(result, Err(Error::SessionExpired)), "got: {result:?}");
}

#[tokio::test]
async fn test_legacy_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(site_path("stat/event")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "error", "msg": "api.err.NoSiteContext" },
            "data": []
        })))
        .mount(&server)
        .await;

    let result = client
        .list_events("default", &SessionToken::new("tok"), Pagination::new(0, 20))
        .await;

    match result {
        Err(Error::LegacyApi { ref message }) => {
            assert!(message.contains("NoSiteContext"), "got: {message}");
        }
        other => panic!("expected LegacyApi error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_and_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(site_path("stat/alarm")))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(site_path("stat/event")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let token = SessionToken::new("tok");
    let alarms = client
        .list_alarms("default", &token, Pagination::new(0, 20))
        .await;
    assert!(
        matches!(alarms, Err(Error::Http { status: 500, .. })),
        "got: {alarms:?}"
    );

    let events = client
        .list_events("default", &token, Pagination::new(0, 20))
        .await;
    assert!(
        matches!(events, Err(Error::Deserialization { .. })),
        "got: {events:?}"
    );
}

#[tokio::test]
async fn test_refused_connection_is_unreachable() {
    // Bind then drop a listener so the port is known to be closed.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let client = LegacyClient::with_client(
        reqwest::Client::new(),
        Url::parse(&format!("http://127.0.0.1:{port}")).unwrap(),
        ControllerPlatform::ClassicController,
    );

    let err = client
        .list_alarms("default", &SessionToken::new("tok"), Pagination::new(0, 20))
        .await
        .unwrap_err();
    assert!(err.is_unreachable(), "got: {err:?}");
    assert!(err.is_transient());
    assert!(!Error::LegacyApi { message: "rc=error".into() }.is_unreachable());
}

// ── Session manager ─────────────────────────────────────────────────

#[tokio::test]
async fn test_session_is_reused_until_expiry() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(login_ok("cached"))
        .expect(1)
        .mount(&server)
        .await;

    let sessions = SessionManager::new(client, credentials());
    let first = sessions.ensure_session().await.unwrap();
    let second = sessions.ensure_session().await.unwrap();

    assert_eq!(first.expose(), "cached");
    assert_eq!(second.expose(), "cached");
}

#[tokio::test]
async fn test_expired_session_triggers_new_login() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(login_ok("short-lived"))
        .expect(2)
        .mount(&server)
        .await;

    let sessions = SessionManager::new(client, credentials()).with_ttl(Duration::ZERO);
    sessions.ensure_session().await.unwrap();
    sessions.ensure_session().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_callers_share_one_login() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(login_ok("shared").set_delay(Duration::from_millis(50)))
        .expect(1)
        .mount(&server)
        .await;

    let sessions = SessionManager::new(client, credentials());
    let (a, b) = tokio::join!(sessions.ensure_session(), sessions.ensure_session());

    assert_eq!(a.unwrap().expose(), "shared");
    assert_eq!(b.unwrap().expose(), "shared");
}

#[tokio::test]
async fn test_invalidate_forces_relogin() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(login_ok("again"))
        .expect(2)
        .mount(&server)
        .await;

    let sessions = SessionManager::new(client, credentials());
    let token = sessions.ensure_session().await.unwrap();

    // A token the manager never issued leaves the cache alone.
    sessions.invalidate(&SessionToken::new("someone-else")).await;
    sessions.ensure_session().await.unwrap();

    sessions.invalidate(&token).await;
    sessions.ensure_session().await.unwrap();
}

// ── UniFi OS ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_unifi_os_requests_carry_rotating_csrf_token() {
    let server = MockServer::start().await;
    let client = LegacyClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        ControllerPlatform::UnifiOs,
    );
    let alarms_path = "/proxy/network/api/s/default/stat/alarm";
    let empty = json!({ "meta": { "rc": "ok" }, "data": [] });

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "TOKEN=os-cookie; Path=/; HttpOnly")
                .insert_header("x-csrf-token", "csrf-1")
                .set_body_json(json!({ "username": "admin" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(alarms_path))
        .and(header("cookie", "TOKEN=os-cookie"))
        .and(header("x-csrf-token", "csrf-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-updated-csrf-token", "csrf-2")
                .set_body_json(&empty),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(alarms_path))
        .and(header("x-csrf-token", "csrf-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&empty))
        .expect(1)
        .mount(&server)
        .await;

    // Anything without the current token is turned away, as UniFi OS does.
    Mock::given(method("POST"))
        .and(path(alarms_path))
        .respond_with(ResponseTemplate::new(401))
        .with_priority(10)
        .mount(&server)
        .await;

    let sessions = SessionManager::new(client, credentials());

    let token = sessions.ensure_session().await.unwrap();
    assert_eq!(token.expose(), "os-cookie");
    assert_eq!(token.csrf().as_deref(), Some("csrf-1"));
    sessions
        .client()
        .list_alarms("default", &token, Pagination::new(0, 20))
        .await
        .unwrap();

    let cached = sessions.ensure_session().await.unwrap();
    assert_eq!(cached.csrf().as_deref(), Some("csrf-2"));
    sessions
        .client()
        .list_alarms("default", &cached, Pagination::new(0, 20))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_classic_controller_never_sends_csrf() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(site_path("stat/alarm")))
        .and(header("x-csrf-token", "leaked"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(site_path("stat/alarm")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "meta": { "rc": "ok" }, "data": [] })),
        )
        .with_priority(10)
        .mount(&server)
        .await;

    let token = SessionToken::new("tok").with_csrf("leaked");
    let alarms = client
        .list_alarms("default", &token, Pagination::new(0, 20))
        .await
        .unwrap();
    assert!(alarms.is_empty());
}

// ── Webhooks ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_webhook_post_and_rejection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/hooks/ok"))
        .and(body_json(json!({ "attachments": [] })))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/hooks/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no_service"))
        .mount(&server)
        .await;

    let webhooks = WebhookClient::with_client(reqwest::Client::new());
    let ok = SecretString::from(format!("{}/hooks/ok", server.uri()));
    let gone = SecretString::from(format!("{}/hooks/gone", server.uri()));

    webhooks.post_json(&ok, &SlackMessage::default()).await.unwrap();

    match webhooks.post_json(&gone, &SlackMessage::default()).await {
        Err(Error::Webhook { status, body }) => {
            assert_eq!(status, 404);
            assert_eq!(body, "no_service");
        }
        other => panic!("expected Webhook error, got: {other:?}"),
    }
}
