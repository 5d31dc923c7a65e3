//! Client behavior tests against a mocked remote job API.

mod submit;

use crate::client::VideoDlClient;
use crate::config::Config;
use crate::types::JobId;
use std::time::Duration;
use wiremock::MockServer;

/// Short poll interval so lifecycle tests finish quickly
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Build a test config pointed at a mock server.
///
/// Notifications are kept alive for a minute so assertions never race the
/// auto-dismiss timer.
pub(crate) fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.remote.base_url = server.uri();
    config.polling.interval = POLL_INTERVAL;
    config.notifications.dismiss_after = Duration::from_secs(60);
    config
}

pub(crate) fn test_client(server: &MockServer) -> VideoDlClient {
    VideoDlClient::new(test_config(server)).unwrap()
}

/// Poll a synchronous condition until it holds or the deadline passes
pub(crate) async fn wait_until(deadline: Duration, condition: impl Fn() -> bool) -> bool {
    let start = tokio::time::Instant::now();
    while start.elapsed() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

/// Wait until the poller for a job has exited its loop and left the registry
pub(crate) async fn wait_for_poller_exit(client: &VideoDlClient, id: &JobId) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while tokio::time::Instant::now() < deadline {
        if !client.is_polling(id).await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

/// Count the requests the mock server has seen for an exact path
pub(crate) async fn requests_to(server: &MockServer, path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == path)
        .count()
}
