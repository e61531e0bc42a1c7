// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests of the agent against a mock backend.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zaman_agent::messages;
use zaman_agent::{AuthMode, ChatState, Credentials, TurnOutcome, ZamanAgent};
use zaman_client::{ApiClient, ReqwestTransport, RetryPolicy, ZamanApi};
use zaman_core::{AudioClip, AudioFormat, Role, SessionStore, TokioDelay, UserId};
use zaman_storage::{FileSessionStore, InMemorySessionStore};
use zaman_test_utils::{ScriptedReply, ScriptedTransport};

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        attempt_timeout: Duration::from_millis(500),
        cold_start_delay: Duration::from_millis(30),
        backoff_base: Duration::from_millis(20),
    }
}

fn http_api(server: &MockServer) -> ZamanApi {
    let transport = ReqwestTransport::new(&server.uri()).unwrap();
    ZamanApi::new(ApiClient::with_parts(
        Arc::new(transport),
        Arc::new(TokioDelay),
        fast_policy(),
    ))
}

fn scripted_api(transport: Arc<ScriptedTransport>) -> ZamanApi {
    ZamanApi::new(ApiClient::with_parts(
        transport,
        Arc::new(TokioDelay),
        RetryPolicy::default(),
    ))
}

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"username": "alice", "password": "pass1"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"user_id": 42, "token": "user_42"})),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn login_persists_session_for_next_start() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileSessionStore::new(dir.path().join("session_token")));

    let mut agent = ZamanAgent::new(http_api(&server), store.clone(), 1);
    let session = agent
        .sign_in(AuthMode::Login, &Credentials::login("alice", secret("pass1")))
        .await
        .unwrap();
    assert_eq!(session.user_id(), &UserId::Numeric(42));

    // A new process restores the user from the stored token alone.
    let mut restarted = ZamanAgent::new(http_api(&server), store, 1);
    let restored = restarted.start().await.unwrap().cloned();
    assert_eq!(restored.unwrap().user_id(), &UserId::Numeric(42));
    assert_eq!(restarted.chat().effective_user_id(), &UserId::Numeric(42));
}

#[tokio::test]
async fn chat_reply_replaces_placeholder() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "messages": [
                {"role": "assistant", "content": messages::GREETING},
                {"role": "user", "content": "hi"}
            ],
            "user_id": 42
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "hello"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut agent = ZamanAgent::new(http_api(&server), Arc::new(InMemorySessionStore::new()), 1);
    agent
        .sign_in(AuthMode::Login, &Credentials::login("alice", secret("pass1")))
        .await
        .unwrap();

    let outcome = agent.send_text("  hi  ").await;

    assert_eq!(outcome, TurnOutcome::Replied("hello".into()));
    let conversation = agent.chat().conversation();
    assert!(!conversation.has_pending());
    assert_eq!(conversation.messages().len(), 3);
    let last = conversation.last().unwrap();
    assert_eq!((last.role, last.text.as_str()), (Role::Assistant, "hello"));
    assert!(agent.chat().banner().is_none());
    assert_eq!(agent.chat().state(), ChatState::Idle);
}

#[tokio::test(start_paused = true)]
async fn chat_timeouts_yield_one_apology_and_banner() {
    let transport = Arc::new(ScriptedTransport::repeating(ScriptedReply::Hang, 3));
    let mut agent = ZamanAgent::new(
        scripted_api(transport.clone()),
        Arc::new(InMemorySessionStore::new()),
        1,
    );

    let outcome = agent.send_text("hi").await;

    assert_eq!(outcome, TurnOutcome::Failed("Request timeout".into()));
    assert_eq!(transport.call_count(), 3);
    let conversation = agent.chat().conversation();
    let apologies = conversation
        .messages()
        .iter()
        .filter(|m| m.text == messages::APOLOGY)
        .count();
    assert_eq!(apologies, 1);
    assert!(!conversation.has_pending());
    let banner = agent.chat().banner().unwrap();
    assert!(banner.starts_with(messages::CHAT_ERROR_PREFIX));
    assert!(banner.contains("timeout"), "got: {banner}");
}

#[tokio::test]
async fn short_register_password_makes_no_request() {
    let transport = Arc::new(ScriptedTransport::new(vec![]));
    let store = Arc::new(InMemorySessionStore::new());
    let mut agent = ZamanAgent::new(scripted_api(transport.clone()), store.clone(), 1);

    let result = agent
        .sign_in(
            AuthMode::Register,
            &Credentials::register("bob", secret("ab"), secret("ab")),
        )
        .await;

    assert!(result.is_err());
    assert_eq!(transport.call_count(), 0);
    assert_eq!(agent.auth().error(), Some(messages::PASSWORD_TOO_SHORT));
    assert!(store.raw_token().await.is_none());
}

#[tokio::test]
async fn failed_login_keeps_backend_message_inline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Неверный логин или пароль"})),
        )
        .mount(&server)
        .await;

    let mut agent = ZamanAgent::new(http_api(&server), Arc::new(InMemorySessionStore::new()), 1);
    let result = agent
        .sign_in(AuthMode::Login, &Credentials::login("alice", secret("wrong1")))
        .await;

    assert!(result.is_err());
    assert_eq!(agent.auth().error(), Some("Неверный логин или пароль"));
    assert!(agent.session().is_none());
}

#[tokio::test]
async fn anonymous_chat_uses_fallback_user_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "messages": [
                {"role": "assistant", "content": messages::GREETING},
                {"role": "user", "content": "салам"}
            ],
            "user_id": 7
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Салам!"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut agent = ZamanAgent::new(http_api(&server), Arc::new(InMemorySessionStore::new()), 7);
    let outcome = agent.send_text("салам").await;

    assert_eq!(outcome, TurnOutcome::Replied("Салам!".into()));
}

#[tokio::test]
async fn blank_input_is_ignored() {
    let transport = Arc::new(ScriptedTransport::new(vec![]));
    let mut agent = ZamanAgent::new(
        scripted_api(transport.clone()),
        Arc::new(InMemorySessionStore::new()),
        1,
    );

    assert_eq!(agent.send_text("   \n").await, TurnOutcome::Ignored);
    assert_eq!(transport.call_count(), 0);
    assert_eq!(agent.chat().conversation().messages().len(), 1);
}

#[tokio::test]
async fn new_send_clears_previous_banner() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(3)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "ok"})))
        .mount(&server)
        .await;

    let mut agent = ZamanAgent::new(http_api(&server), Arc::new(InMemorySessionStore::new()), 1);

    let first = agent.send_text("first").await;
    assert_eq!(first, TurnOutcome::Failed("HTTP 500".into()));
    assert_eq!(
        agent.chat().banner(),
        Some(format!("{}HTTP 500", messages::CHAT_ERROR_PREFIX).as_str())
    );

    let second = agent.send_text("second").await;
    assert_eq!(second, TurnOutcome::Replied("ok".into()));
    assert!(agent.chat().banner().is_none());
}

#[tokio::test]
async fn voice_message_appends_transcription_then_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transcribe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transcribed": "Хочу копить на квартиру",
            "response": "Составлю план на 5 лет."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut agent = ZamanAgent::new(http_api(&server), Arc::new(InMemorySessionStore::new()), 1);
    let clip = AudioClip {
        data: vec![1, 2, 3, 4],
        format: AudioFormat::WebmOpus,
    };

    let outcome = agent.send_audio(clip).await;

    assert_eq!(outcome, TurnOutcome::Replied("Составлю план на 5 лет.".into()));
    let texts: Vec<_> = agent
        .chat()
        .conversation()
        .messages()
        .iter()
        .map(|m| (m.role, m.text.as_str()))
        .collect();
    assert_eq!(
        texts,
        vec![
            (Role::Assistant, messages::GREETING),
            (Role::User, "Хочу копить на квартиру"),
            (Role::Assistant, "Составлю план на 5 лет."),
        ]
    );
}

#[tokio::test]
async fn failed_voice_message_uses_voice_banner() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transcribe"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "Whisper недоступен"})),
        )
        .mount(&server)
        .await;

    let mut agent = ZamanAgent::new(http_api(&server), Arc::new(InMemorySessionStore::new()), 1);
    let outcome = agent
        .send_audio(AudioClip {
            data: vec![0; 16],
            format: AudioFormat::Mp4,
        })
        .await;

    assert_eq!(outcome, TurnOutcome::Failed("Whisper недоступен".into()));
    assert_eq!(
        agent.chat().banner(),
        Some(format!("{}Whisper недоступен", messages::VOICE_ERROR_PREFIX).as_str())
    );
    assert_eq!(
        agent.chat().conversation().last().map(|m| m.text.as_str()),
        Some(messages::APOLOGY)
    );
}

#[tokio::test]
async fn sign_in_survives_profile_failure_with_banner() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(query_param("user_id", "42"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let mut agent = ZamanAgent::new(http_api(&server), Arc::new(InMemorySessionStore::new()), 1);
    assert!(agent.refresh_profile().await.is_none(), "no profile without a session");

    let session = agent
        .sign_in(AuthMode::Login, &Credentials::login("alice", secret("pass1")))
        .await
        .unwrap();

    assert_eq!(session.user_id(), &UserId::Numeric(42));
    assert!(agent.profile().is_none());
    assert_eq!(agent.chat().banner(), Some(messages::PROFILE_UNAVAILABLE));
}

#[tokio::test]
async fn unavailable_profile_keeps_its_cause() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut agent = ZamanAgent::new(
        http_api(&server),
        Arc::new(InMemorySessionStore::with_token("user_42")),
        1,
    );
    agent.restore().await.unwrap();
    let err = agent.refresh_profile().await.unwrap().unwrap_err();

    assert_eq!(err.to_string(), messages::PROFILE_UNAVAILABLE);
    assert_eq!(err.source.status(), Some(503));
}

#[tokio::test]
async fn start_loads_profile_for_restored_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(query_param("user_id", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"username": "alice"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(InMemorySessionStore::with_token("user_42"));
    let mut agent = ZamanAgent::new(http_api(&server), store, 1);
    agent.start().await.unwrap();

    let profile = agent.profile().unwrap();
    assert_eq!(profile.display_name(), Some("alice"));
    assert!(agent.chat().banner().is_none());
}

#[tokio::test]
async fn start_sets_banner_when_restored_profile_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(query_param("user_id", "42"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let store = Arc::new(InMemorySessionStore::with_token("user_42"));
    let mut agent = ZamanAgent::new(http_api(&server), store, 1);
    let restored = agent.start().await.unwrap().cloned();

    assert_eq!(restored.unwrap().user_id(), &UserId::Numeric(42));
    assert!(agent.profile().is_none());
    assert_eq!(agent.chat().banner(), Some(messages::PROFILE_UNAVAILABLE));
}

#[tokio::test]
async fn restore_does_not_touch_the_network() {
    let transport = Arc::new(ScriptedTransport::new(vec![]));
    let store = Arc::new(InMemorySessionStore::with_token("user_42"));
    let mut agent = ZamanAgent::new(scripted_api(transport.clone()), store, 1);

    agent.restore().await.unwrap();

    assert_eq!(agent.user_id(), Some(&UserId::Numeric(42)));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn start_without_session_skips_profile() {
    let transport = Arc::new(ScriptedTransport::new(vec![]));
    let mut agent = ZamanAgent::new(
        scripted_api(transport.clone()),
        Arc::new(InMemorySessionStore::new()),
        1,
    );

    assert!(agent.start().await.unwrap().is_none());
    assert_eq!(transport.call_count(), 0);
    assert!(agent.chat().banner().is_none());
}

#[tokio::test]
async fn logout_clears_store_and_conversation() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let store = Arc::new(InMemorySessionStore::new());
    let mut agent = ZamanAgent::new(http_api(&server), store.clone(), 1);
    agent
        .sign_in(AuthMode::Login, &Credentials::login("alice", secret("pass1")))
        .await
        .unwrap();

    agent.logout().await.unwrap();
    agent.logout().await.unwrap();

    assert!(agent.session().is_none());
    assert!(agent.profile().is_none());
    assert!(store.load().await.unwrap().is_none());
    assert_eq!(agent.chat().effective_user_id(), &UserId::Numeric(1));
    assert_eq!(agent.chat().conversation().messages().len(), 1);
}
