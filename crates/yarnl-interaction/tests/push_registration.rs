use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use yarnl_core::ServerConfig;
use yarnl_core::config::Timeouts;
use yarnl_core::cookie::CookieJar;
use yarnl_core::preferences::PreferenceStore;
use yarnl_infrastructure::{FilePreferenceStore, PersistentCookieJar};
use yarnl_interaction::{PushRegistrar, RegistrationOutcome};

struct TestContext {
    _dir: TempDir,
    mock_server: MockServer,
    jar: Arc<PersistentCookieJar>,
    prefs: Arc<FilePreferenceStore>,
    registrar: PushRegistrar,
}

impl TestContext {
    async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mock_server = MockServer::start().await;
        let jar = Arc::new(PersistentCookieJar::open(dir.path().join("cookies.toml")).unwrap());
        let prefs = Arc::new(FilePreferenceStore::open(dir.path().join("preferences.toml")));
        let registrar =
            PushRegistrar::new(jar.clone(), prefs.clone(), Timeouts::new(5, 5), "android").unwrap();
        Self {
            _dir: dir,
            mock_server,
            jar,
            prefs,
            registrar,
        }
    }

    async fn configure_server(&self) {
        let server = ServerConfig::parse(&self.mock_server.uri()).unwrap();
        self.prefs.save_server_url(&server).await.unwrap();
    }

    fn log_in(&self) {
        self.jar.set_cookie(&self.mock_server.uri(), "session_id=abc");
    }

    async fn mock_register(&self, token: &str, status: u16) {
        Mock::given(method("POST"))
            .and(path("/api/fcm/register"))
            .and(header("cookie", "session_id=abc"))
            .and(body_json(json!({"token": token, "platform": "android"})))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }
}

#[tokio::test]
async fn token_is_persisted_even_without_server() {
    let ctx = TestContext::new().await;

    assert_eq!(
        ctx.registrar.on_token_issued("tok-1").await,
        RegistrationOutcome::NoServer
    );
    assert_eq!(ctx.prefs.get_push_token().await.as_deref(), Some("tok-1"));
    assert!(!ctx.prefs.get_push_registered().await);
}

#[tokio::test]
async fn no_cookie_means_no_request() {
    let ctx = TestContext::new().await;
    ctx.configure_server().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.mock_server)
        .await;

    assert_eq!(
        ctx.registrar.on_token_issued("tok-1").await,
        RegistrationOutcome::NoSession
    );
}

#[tokio::test]
async fn successful_registration_sets_flag() {
    let ctx = TestContext::new().await;
    ctx.configure_server().await;
    ctx.log_in();
    ctx.mock_register("tok-1", 201).await;

    assert!(ctx.registrar.on_token_issued("tok-1").await.is_registered());
    assert!(ctx.prefs.get_push_registered().await);
}

#[tokio::test]
async fn rejected_registration_leaves_flag_false() {
    let ctx = TestContext::new().await;
    ctx.configure_server().await;
    ctx.log_in();
    ctx.mock_register("tok-1", 401).await;

    assert_eq!(
        ctx.registrar.on_token_issued("tok-1").await,
        RegistrationOutcome::Rejected { status: 401 }
    );
    assert!(!ctx.prefs.get_push_registered().await);
}

#[tokio::test]
async fn new_token_resets_registered_flag() {
    let ctx = TestContext::new().await;
    ctx.configure_server().await;
    ctx.log_in();
    ctx.mock_register("tok-1", 200).await;
    ctx.mock_register("tok-2", 500).await;

    assert!(ctx.registrar.on_token_issued("tok-1").await.is_registered());
    assert!(ctx.prefs.get_push_registered().await);

    assert_eq!(
        ctx.registrar.on_token_issued("tok-2").await,
        RegistrationOutcome::Rejected { status: 500 }
    );
    assert!(!ctx.prefs.get_push_registered().await);
    assert_eq!(ctx.prefs.get_push_token().await.as_deref(), Some("tok-2"));
}

#[tokio::test]
async fn slow_success_for_replaced_token_does_not_set_flag() {
    let ctx = Arc::new(TestContext::new().await);
    ctx.configure_server().await;
    ctx.log_in();
    Mock::given(method("POST"))
        .and(path("/api/fcm/register"))
        .and(body_json(json!({"token": "old", "platform": "android"})))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&ctx.mock_server)
        .await;
    ctx.mock_register("new", 500).await;

    let first = {
        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move { ctx.registrar.on_token_issued("old").await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    let second = ctx.registrar.on_token_issued("new").await;
    let first = first.await.unwrap();

    assert_eq!(second, RegistrationOutcome::Rejected { status: 500 });
    assert_eq!(first, RegistrationOutcome::Superseded);
    assert_eq!(ctx.prefs.get_push_token().await.as_deref(), Some("new"));
    assert!(!ctx.prefs.get_push_registered().await);
}

#[tokio::test]
async fn refresh_uses_stored_token() {
    let ctx = TestContext::new().await;
    assert!(ctx.registrar.refresh().await.is_none());

    ctx.configure_server().await;
    ctx.log_in();
    ctx.mock_register("tok-9", 200).await;
    ctx.prefs.save_push_token("tok-9").await.unwrap();

    assert_eq!(
        ctx.registrar.refresh().await,
        Some(RegistrationOutcome::Registered)
    );
}
