//! BDD step definitions for the end-to-end relay feature

use axum::body::Body;
use axum::http::Request;
use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use tower::ServiceExt;

use alarm_relay::config::{AuthorizationConfig, TelegramConfig};
use alarm_relay::{Config, RelayBuilder};

use crate::world::{RelayWorld, SHARED_SECRET};

pub fn test_config() -> Config {
    Config {
        telegram: TelegramConfig {
            bot_token: "123:bot-token".to_string(),
            ..TelegramConfig::default()
        },
        authorization: AuthorizationConfig {
            base_url: "http://auth.test".to_string(),
            port: "8080".to_string(),
            domain: "api/validate".to_string(),
            shared_secret: SHARED_SECRET.to_string(),
            auth_code: "auth-code".to_string(),
            auth_token: "auth-token".to_string(),
            ..AuthorizationConfig::default()
        },
        ..Config::default()
    }
}

#[given(expr = "Telegram delivery to chat {string} fails")]
async fn delivery_fails(world: &mut RelayWorld, chat_id: String) {
    world.http.failing_chats.write().await.insert(chat_id);
}

#[when("this alarm is posted:")]
async fn post_alarm(world: &mut RelayWorld, step: &Step) {
    let body = step.docstring.clone().unwrap_or_default();

    let relay = RelayBuilder::new(test_config())
        .with_http_client(world.http.clone())
        .build()
        .expect("relay should build");

    let response = relay
        .router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/send_alarm")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    world.response_status = Some(response.status().as_u16());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    world.response_body = Some(serde_json::from_slice(&bytes).expect("response is not JSON"));
}

#[then(expr = "the response status is {int}")]
fn response_status(world: &mut RelayWorld, status: u16) {
    assert_eq!(world.response_status, Some(status));
}

#[then(expr = "the response {word} is {string}")]
fn response_field(world: &mut RelayWorld, field: String, expected: String) {
    let body = world.response_body.as_ref().expect("no response body");
    assert_eq!(body[&field], expected.as_str(), "body was {body}");
}

#[then(expr = "{int} Telegram message(s) is/are sent")]
async fn messages_sent(world: &mut RelayWorld, count: usize) {
    assert_eq!(world.http.telegram_messages().await.len(), count);
}

#[then("no authorization request is made")]
async fn no_authorization(world: &mut RelayWorld) {
    assert!(world.http.authorization_requests().await.is_empty());
}

#[then(expr = "Telegram messages went to chats {string}")]
async fn message_order(world: &mut RelayWorld, chats: String) {
    let expected: Vec<&str> = chats.split(',').map(str::trim).collect();
    let sent = world.http.telegram_messages().await;
    let actual: Vec<String> = sent
        .iter()
        .filter_map(|r| {
            r.params
                .iter()
                .find(|(k, _)| k == "chat_id")
                .map(|(_, v)| v.clone())
        })
        .collect();
    assert_eq!(actual, expected);
}

#[then(expr = "every Telegram message uses parse mode {string}")]
async fn parse_mode(world: &mut RelayWorld, mode: String) {
    for request in world.http.telegram_messages().await {
        assert!(request.url.ends_with("/bot123:bot-token/sendMessage"));
        assert!(request
            .params
            .contains(&("parse_mode".to_string(), mode.clone())));
    }
}

#[then(expr = "the Telegram message to chat {string} contains {string}")]
async fn message_contains(world: &mut RelayWorld, chat_id: String, fragment: String) {
    let sent = world.http.telegram_messages().await;
    let text = sent
        .iter()
        .find(|r| r.params.contains(&("chat_id".to_string(), chat_id.clone())))
        .and_then(|r| r.params.iter().find(|(k, _)| k == "text"))
        .map(|(_, v)| v.clone())
        .expect("no message for chat");
    assert!(text.contains(&fragment), "{text}");
}
