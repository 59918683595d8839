//! Common test utilities for integration tests.

use std::time::Duration;
use telegram_client::TelegramClient;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-token";

/// Start a mock Bot API server.
pub async fn mock_telegram_server() -> MockServer {
    MockServer::start().await
}

/// Create a Telegram client configured for a mock server.
pub fn test_telegram_client(mock_server: &MockServer) -> TelegramClient {
    TelegramClient::new(mock_server.uri(), TEST_TOKEN, Duration::from_secs(1)).unwrap()
}

/// Expect exactly `times` sendMessage calls with this chat and text.
pub async fn expect_text(mock_server: &MockServer, chat_id: i64, text: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendMessage", TEST_TOKEN)))
        .and(body_json(serde_json::json!({"chat_id": chat_id, "text": text})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "result": {"message_id": 1}
        })))
        .expect(times)
        .mount(mock_server)
        .await;
}
