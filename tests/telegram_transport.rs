//! Bot API client tests against a mock HTTP server.

use ipgate::bot::{TelegramClient, TelegramError};
use ipgate::config::TelegramConfig;

mod common;

use common::{start_mock_http, RecordedRequest};

fn config(base_url: &str) -> TelegramConfig {
    TelegramConfig {
        token: "123:secret".to_string(),
        api_base_url: base_url.to_string(),
        poll_timeout_secs: 1,
        ..TelegramConfig::default()
    }
}

#[tokio::test]
async fn test_get_updates_and_send_message() {
    let (base, log) = start_mock_http(|req: RecordedRequest| async move {
        match req.path.as_str() {
            "/bot123:secret/getUpdates" => (
                200,
                r#"{"ok":true,"result":[
                    {"update_id":7,"message":{"message_id":1,"chat":{"id":42,"type":"private"},"text":"10.0.0.1"}},
                    {"update_id":8,"message":{"message_id":2,"chat":{"id":42,"type":"private"}}},
                    {"update_id":9,"edited_message":{"message_id":1,"chat":{"id":42}}}
                ]}"#
                .to_string(),
            ),
            "/bot123:secret/sendMessage" => (
                200,
                r#"{"ok":true,"result":{"message_id":3,"chat":{"id":42}}}"#.to_string(),
            ),
            _ => (404, r#"{"ok":false,"description":"Not Found"}"#.to_string()),
        }
    })
    .await;

    let client = TelegramClient::new(&config(&base)).unwrap();

    let updates = client.get_updates(5, 1).await.unwrap();
    assert_eq!(updates.len(), 3);
    assert_eq!(updates[0].update_id, 7);
    let first = updates[0].message.as_ref().unwrap();
    assert_eq!(first.chat.id, 42);
    assert_eq!(first.text.as_deref(), Some("10.0.0.1"));
    assert!(updates[1].message.as_ref().unwrap().text.is_none());
    assert!(updates[2].message.is_none());

    client.send_message(42, "IP 10.0.0.1 already present").await.unwrap();

    let requests = log.lock().unwrap().clone();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[0].json(),
        serde_json::json!({"offset": 5, "timeout": 1, "allowed_updates": ["message"]})
    );
    assert_eq!(
        requests[1].json(),
        serde_json::json!({"chat_id": 42, "text": "IP 10.0.0.1 already present"})
    );
}

#[tokio::test]
async fn test_api_error_description_surfaces() {
    let (base, _log) = start_mock_http(|_req: RecordedRequest| async {
        (
            401,
            r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#.to_string(),
        )
    })
    .await;

    let client = TelegramClient::new(&config(&base)).unwrap();
    let err = client.get_updates(0, 1).await.unwrap_err();
    assert!(matches!(err, TelegramError::Api(ref m) if m == "Unauthorized"));
}

#[tokio::test]
async fn test_non_json_error_keeps_status() {
    let (base, _log) = start_mock_http(|_req: RecordedRequest| async {
        (500, "upstream broke".to_string())
    })
    .await;

    let client = TelegramClient::new(&config(&base)).unwrap();
    let err = client.send_message(1, "hi").await.unwrap_err();
    assert!(matches!(err, TelegramError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_transport_error_hides_token() {
    // Nothing listens on port 9 locally.
    let client = TelegramClient::new(&config("http://127.0.0.1:9")).unwrap();
    let err = client.get_updates(0, 1).await.unwrap_err();
    assert!(matches!(err, TelegramError::Transport(_)));
    assert!(!err.to_string().contains("secret"));
}
