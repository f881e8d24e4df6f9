//! Command dispatcher tests

#[path = "harness.rs"]
mod harness;

use std::sync::Arc;

use cibot::commands::{Command, Dispatcher, HELP_TEXT};
use cibot::errors::BridgeError;
use cibot::models::{BuildStatus, BuildTriggerResult};
use teloxide::types::Update;

use harness::{text_update, FakeBuildServer, FakeStatus, RecordingChat, BOT_USERNAME};

fn setup(build_server: FakeBuildServer) -> (Arc<FakeBuildServer>, Arc<RecordingChat>, Dispatcher) {
    let build_server = Arc::new(build_server);
    let chat = Arc::new(RecordingChat::default());
    let dispatcher = Dispatcher::new(build_server.clone(), chat.clone(), BOT_USERNAME);
    (build_server, chat, dispatcher)
}

fn update(text: &str) -> Update {
    serde_json::from_value(text_update(1, 99, text)).unwrap()
}

#[tokio::test]
async fn test_help_lists_commands() {
    let (_, _, dispatcher) = setup(FakeBuildServer::accepting());

    let reply = dispatcher.execute(Command::Start).await;
    assert_eq!(reply, HELP_TEXT);
    assert!(reply.contains("/build"));
    assert!(reply.contains("/status"));
}

#[tokio::test]
async fn test_build_success() {
    let (build_server, _, dispatcher) = setup(FakeBuildServer::accepting());

    let reply = dispatcher.build().await;
    assert!(reply.contains("triggered"));
    assert!(!reply.contains("201"));
    assert!(reply.contains("/status"));
    assert_eq!(build_server.trigger_count(), 1);
}

#[tokio::test]
async fn test_build_rejected() {
    let (_, _, dispatcher) = setup(FakeBuildServer::with_trigger(
        BuildTriggerResult::from_response(500, "Internal Error".to_string()),
    ));

    let reply = dispatcher.build().await;
    assert!(reply.contains("500"));
    assert!(reply.contains("Internal Error"));
    assert!(!reply.contains("triggered!"));
}

#[tokio::test]
async fn test_build_network_error() {
    let (_, _, dispatcher) = setup(FakeBuildServer::with_trigger(
        BuildTriggerResult::network_error("connection refused"),
    ));

    assert_eq!(dispatcher.build().await, "Error: connection refused");
}

#[tokio::test]
async fn test_status_reply() {
    let (_, _, dispatcher) = setup(FakeBuildServer::with_status(FakeStatus::Ok(BuildStatus {
        number: Some(42),
        result: Some("SUCCESS".to_string()),
        timestamp: Some(1690000000000),
    })));

    let reply = dispatcher.status().await;
    assert_eq!(reply.lines().count(), 3);
    assert_eq!(reply.matches("42").count(), 1);
    assert_eq!(reply.matches("SUCCESS").count(), 1);
    assert_eq!(reply.matches("1690000000000").count(), 1);
}

#[tokio::test]
async fn test_status_reply_unknown_fields() {
    let (_, _, dispatcher) =
        setup(FakeBuildServer::with_status(FakeStatus::Ok(BuildStatus::default())));

    let reply = dispatcher.status().await;
    assert_eq!(reply.lines().count(), 3);
    assert_eq!(reply.matches("unknown").count(), 3);
}

#[tokio::test]
async fn test_status_reply_errors() {
    let (_, _, dispatcher) = setup(FakeBuildServer::with_status(FakeStatus::Http(
        403,
        "Forbidden".to_string(),
    )));
    let reply = dispatcher.status().await;
    assert!(reply.starts_with("Failed to fetch build status"));
    assert!(reply.contains("403"));
    assert!(reply.contains("Forbidden"));

    let (_, _, dispatcher) = setup(FakeBuildServer::with_status(FakeStatus::Malformed));
    let reply = dispatcher.status().await;
    assert!(reply.starts_with("Failed to fetch build status"));
    assert!(reply.contains("invalid JSON"));
}

#[tokio::test]
async fn test_process_update_replies_to_chat() {
    let (build_server, chat, dispatcher) = setup(FakeBuildServer::accepting());

    let command = dispatcher.process_update(&update("/build@JenkinsBot")).await.unwrap();
    assert_eq!(command, Some(Command::Build));
    assert_eq!(build_server.trigger_count(), 1);

    let sent = chat.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, 99);
    assert!(sent[0].1.contains("triggered"));
}

#[tokio::test]
async fn test_process_update_ignores_unknown_commands() {
    let (build_server, chat, dispatcher) = setup(FakeBuildServer::accepting());

    for text in ["/deploy", "hello there", ""] {
        let command = dispatcher.process_update(&update(text)).await.unwrap();
        assert_eq!(command, None);
    }
    assert!(chat.sent().is_empty());
    assert_eq!(build_server.trigger_count(), 0);
}

#[tokio::test]
async fn test_process_update_without_message() {
    let (_, chat, dispatcher) = setup(FakeBuildServer::accepting());

    let update: Update = serde_json::from_str(
        r#"{"update_id":5,"callback_query":{"id":"1","from":{"id":7,"is_bot":false,"first_name":"Ada"},"chat_instance":"c1","data":"x"}}"#,
    )
    .unwrap();
    assert_eq!(dispatcher.process_update(&update).await.unwrap(), None);
    assert!(chat.sent().is_empty());
}

#[tokio::test]
async fn test_process_update_edited_message() {
    let (_, chat, dispatcher) = setup(FakeBuildServer::accepting());

    let update: Update = serde_json::from_str(
        r#"{"update_id":6,"edited_message":{"message_id":3,"date":1690000000,"edit_date":1690000100,"chat":{"id":-7,"type":"group","title":"CI"},"text":"/start"}}"#,
    )
    .unwrap();
    assert_eq!(dispatcher.process_update(&update).await.unwrap(), Some(Command::Start));
    assert_eq!(chat.sent(), vec![(-7, HELP_TEXT.to_string())]);
}

#[tokio::test]
async fn test_process_update_send_failure() {
    let build_server = Arc::new(FakeBuildServer::accepting());
    let chat = Arc::new(RecordingChat::failing());
    let dispatcher = Dispatcher::new(build_server.clone(), chat, BOT_USERNAME);

    let result = dispatcher.process_update(&update("/build")).await;
    assert!(matches!(result, Err(BridgeError::TelegramError(_))));
    assert_eq!(build_server.trigger_count(), 1);
}
