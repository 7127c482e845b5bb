use std::sync::Arc;
use std::time::Duration;

use parla::models::{Role, SessionConfig};
use parla::services::conversation::Conversation;
use parla::services::llm::{ChatModel, LlmError, LlmSettings, OpenAiChatModel};
use parla::services::tutor::{ContextWindow, Reply, Tutor, APOLOGY_PREFIX};
use serde_json::Value;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer) -> LlmSettings {
    LlmSettings {
        base_url: format!("{}/v1", server.uri()),
        model: "gpt-4o-mini".into(),
        api_key: None,
        timeout: Duration::from_secs(5),
    }
}

fn french_beginner() -> Conversation {
    Conversation::new(SessionConfig::new("French", "English", Some("Beginner")).unwrap())
}

async fn request_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|req| serde_json::from_slice(&req.body).unwrap())
        .collect()
}

#[tokio::test]
async fn conversation_resends_history_to_openai_compatible_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"choices":[{"message":{"role":"assistant","content":"Bonjour ! Un café ?"}}]}"#,
            "application/json",
        ))
        .expect(2)
        .mount(&server)
        .await;

    let model = OpenAiChatModel::new(&settings(&server), "sk-test").unwrap();
    let tutor = Tutor::new(Arc::new(model), ContextWindow::Unbounded);
    let mut conv = french_beginner();

    let first = tutor.respond(&mut conv, "Bonjour").await;
    let second = tutor.respond(&mut conv, "Oui, merci").await;

    assert_eq!(
        first,
        Reply::Replied {
            reply: "Bonjour ! Un café ?".into()
        }
    );
    assert!(second.is_replied());
    assert_eq!(conv.transcript().len(), 4);
    assert_eq!(conv.transcript()[3].role, Role::Assistant);

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[1]["model"], "gpt-4o-mini");

    let messages = bodies[1]["messages"].as_array().unwrap();
    let roles: Vec<&str> = messages
        .iter()
        .map(|m| m["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
    assert!(messages[0]["content"]
        .as_str()
        .unwrap()
        .contains("helping someone learn French"));
    assert_eq!(messages[3]["content"], "Oui, merci");
}

#[tokio::test]
async fn server_error_becomes_apology_without_touching_transcript() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let model = OpenAiChatModel::new(&settings(&server), "sk-wrong").unwrap();
    let tutor = Tutor::new(Arc::new(model), ContextWindow::Unbounded);
    let mut conv = french_beginner();

    let reply = tutor.respond(&mut conv, "Bonjour").await;

    assert!(!reply.is_replied());
    assert!(reply.text().starts_with(APOLOGY_PREFIX));
    assert!(reply.text().contains("status=401"));
    assert!(reply.text().contains("invalid api key"));
    assert!(conv.transcript().is_empty());
}

#[tokio::test]
async fn malformed_completion_is_reported_as_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"choices":[]}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let model = OpenAiChatModel::new(&settings(&server), "k").unwrap();
    let err = model
        .complete(&[parla::models::Message::user("hi")])
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::MissingContent));
}
