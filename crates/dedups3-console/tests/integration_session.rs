//! Login, logout, session checks and the 401 redirect

mod common;

use dedups3_console::session::hash_password;
use dedups3_console::{GuardDecision, Params};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_logout(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_unauthorized_logs_out_and_redirects_once() {
    let server = MockServer::start().await;
    mount_logout(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/bucket/list"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "session expired"})))
        .mount(&server)
        .await;

    let h = common::harness(&server, "/buckets");
    let envelope = h.client.buckets().list(None).await;

    assert!(!envelope.success);
    assert_eq!(envelope.message, "session expired");
    assert_eq!(h.history.navigations(), vec!["/login".to_string()]);

    let logouts = common::requests_to(&server, "/api/logout").await;
    assert_eq!(logouts.len(), 1);
    assert_eq!(logouts[0].body, b"{}".to_vec());
}

#[tokio::test]
async fn test_unauthorized_on_login_page_passes_through() {
    let server = MockServer::start().await;
    mount_logout(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "wrong password"})))
        .mount(&server)
        .await;

    let h = common::harness(&server, "/login");
    let envelope = h
        .client
        .session()
        .login("admin", &SecretString::from("nope".to_string()))
        .await;

    assert!(!envelope.success);
    assert_eq!(envelope.message, "wrong password");
    assert!(h.history.navigations().is_empty());
    assert!(common::requests_to(&server, "/api/logout").await.is_empty());
}

#[tokio::test]
async fn test_concurrent_unauthorized_navigate_once() {
    let server = MockServer::start().await;
    mount_logout(&server).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let h = common::harness(&server, "/objects");
    let buckets = h.client.buckets();
    let objects = h.client.objects();
    let stats = h.client.stats();
    let params = Params::new().set("bucket", "photos");
    let (a, b, c) = futures::join!(
        buckets.list(None),
        objects.list(&params),
        stats.get()
    );

    assert!(!a.success && !b.success && !c.success);
    assert_eq!(h.history.navigations(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn test_forbidden_does_not_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user/list"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"msg": "forbidden"})))
        .mount(&server)
        .await;

    let h = common::harness(&server, "/users");
    let envelope = h.client.users().list(None).await;

    assert_eq!(envelope.message, "forbidden");
    assert!(h.history.navigations().is_empty());
}

#[tokio::test]
async fn test_failed_logout_still_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let h = common::harness(&server, "/dashboard");
    let envelope = h.client.stats().get().await;

    assert_eq!(envelope.message, "Error fetching stats");
    assert_eq!(h.history.navigations(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn test_login_sends_user_and_digest_as_given() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({
            "username": " admin",
            "password": hash_password("admin123", " admin"),
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "msg": "login success",
            "data": {"username": "admin"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = common::harness(&server, "/login");
    let envelope = h
        .client
        .session()
        .login(" admin", &SecretString::from("admin123".to_string()))
        .await;

    assert!(envelope.success);
    assert_eq!(envelope.message, "login success");
    server.verify().await;
}

#[tokio::test]
async fn test_login_nonzero_code_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 1})))
        .mount(&server)
        .await;

    let h = common::harness(&server, "/login");
    let envelope = h
        .client
        .session()
        .login("admin", &SecretString::from("x".to_string()))
        .await;

    assert!(!envelope.success);
    assert_eq!(envelope.message, "Login failed");
}

#[tokio::test]
async fn test_logout_redirects_even_when_server_is_down() {
    let history = std::sync::Arc::new(dedups3_console::MemoryHistory::new("/buckets"));
    let client = dedups3_console::Client::builder()
        .origin("http://127.0.0.1:1")
        .history(history.clone())
        .build()
        .unwrap();

    client.session().logout().await;

    assert_eq!(history.navigations(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn test_auth_status_and_guard() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0})))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/status"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let h = common::harness(&server, "/dashboard");
    let session = h.client.session();
    let guard = session.guard();

    assert!(session.auth_status().await);
    assert_eq!(guard.resolve("/buckets?page=2").await, GuardDecision::Proceed);
    assert!(!session.auth_status().await);
    assert_eq!(guard.resolve("/buckets").await, GuardDecision::Redirect("/login".into()));

    // the login page never needs a check
    let checks = common::requests_to(&server, "/api/auth/status").await.len();
    assert_eq!(guard.resolve("/login?next=/buckets").await, GuardDecision::Proceed);
    assert_eq!(common::requests_to(&server, "/api/auth/status").await.len(), checks);

    // a failed check never redirects by itself
    assert!(h.history.navigations().is_empty());
}
