use std::time::Duration;

use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};
use yarnl_core::config::Timeouts;
use yarnl_core::server::INVALID_URL_MESSAGE;
use yarnl_interaction::{ConnectionProber, ProbeOutcome};

async fn server_answering(status: u16) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&mock_server)
        .await;
    mock_server
}

fn prober() -> ConnectionProber {
    ConnectionProber::new(Timeouts::new(2, 2)).unwrap()
}

#[tokio::test]
async fn success_statuses() {
    for status in [200, 204, 304] {
        let mock_server = server_answering(status).await;
        assert_eq!(
            prober().probe(&format!("{}/", mock_server.uri())).await,
            ProbeOutcome::Success,
            "status {}",
            status
        );
    }
}

#[tokio::test]
async fn error_status_is_reported() {
    let mock_server = server_answering(503).await;
    assert_eq!(
        prober().probe(&mock_server.uri()).await,
        ProbeOutcome::Error("Server returned HTTP 503".to_string())
    );
}

#[tokio::test]
async fn refused_connection() {
    assert_eq!(
        prober().probe("http://127.0.0.1:1").await,
        ProbeOutcome::Error("Could not connect to server".to_string())
    );
}

#[tokio::test]
async fn slow_server_times_out() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(4)))
        .mount(&mock_server)
        .await;

    let prober = ConnectionProber::new(Timeouts::new(1, 1)).unwrap();
    assert_eq!(
        prober.probe(&mock_server.uri()).await,
        ProbeOutcome::Error("Connection timed out".to_string())
    );
}

#[tokio::test]
async fn invalid_input_is_not_probed() {
    assert_eq!(
        prober().probe("ftp://x").await,
        ProbeOutcome::Error(INVALID_URL_MESSAGE.to_string())
    );
}
