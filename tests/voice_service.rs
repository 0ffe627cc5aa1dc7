// Contract tests for the voice-generation HTTP client against a mock
// service: wire format, exactly-once delivery, and uniform failure handling.

use anyhow::Result;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use persona_cli::persona::Persona;
use persona_cli::session::ChatSession;
use persona_cli::voice::VoiceClient;

const FAKE_AUDIO: &[u8] = b"RIFF\x00\x00\x00\x00WAVEfmt ";

#[tokio::test]
async fn submission_posts_exact_body_exactly_once() -> Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate-voice"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"text": "hello", "persona": "nikhil"})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/wav")
                .set_body_bytes(FAKE_AUDIO),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = VoiceClient::new(&mock_server.uri());
    let audio = client.generate("hello", "nikhil").await?;
    assert_eq!(&audio[..], FAKE_AUDIO);

    Ok(())
}

#[tokio::test]
async fn non_success_status_is_a_single_uniform_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate-voice"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = VoiceClient::new(&mock_server.uri());
    let result = client.generate("hello", "nikhil").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn unreachable_service_is_also_a_failure() {
    // Port 1 is unassigned; the connection is refused immediately.
    let client = VoiceClient::new("http://127.0.0.1:1");
    let result = client.generate("hello", "nikhil").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn successful_exchange_drives_the_session_through_one_cycle() -> Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate-voice"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/wav")
                .set_body_bytes(FAKE_AUDIO),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = VoiceClient::new(&mock_server.uri());
    let mut session = ChatSession::new(Persona::all()[0]);

    let request = session.submit("tell me about markets").expect("request");
    assert!(session.is_pending());
    // Another submission during the in-flight window is dropped.
    assert!(session.submit("second thought").is_none());

    let audio = client.generate(&request.text, request.persona_id).await?;
    let assistant_id = session.complete(audio).expect("assistant message");

    assert_eq!(session.transcript().len(), 2);
    assert!(!session.is_pending());
    assert!(session.message(&assistant_id).unwrap().has_audio());

    Ok(())
}

#[tokio::test]
async fn failed_exchange_leaves_the_user_message_in_place() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate-voice"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let client = VoiceClient::new(&mock_server.uri());
    let mut session = ChatSession::new(Persona::all()[1]);

    let request = session.submit("hello").expect("request");
    let result = client.generate(&request.text, request.persona_id).await;
    assert!(result.is_err());
    session.fail();

    assert_eq!(session.transcript().len(), 1);
    assert!(session.transcript()[0].is_user);
    assert!(!session.is_pending());
}
