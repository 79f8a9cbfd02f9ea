use std::net::SocketAddr;
use std::sync::Arc;

use kokoro_openai::api::routes::{create_router, AppState};
use kokoro_openai::demo::{Demo, ExpectedFailure, BASIC_OUTPUT, FAST_OUTPUT};
use kokoro_openai::smoke::{Probe, SmokeTester, OUTPUT_FILE};
use kokoro_openai::tts::TtsService;
use kokoro_openai::{ClientConfig, ClientError, ErrorCategory, ResponseFormat, SpeechClient, SpeechRequest};

async fn spawn_server(api_key: Option<&str>) -> SocketAddr {
    let state = AppState::new(TtsService::default(), api_key.map(str::to_string));
    let app = create_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// A server that answers every speech request with a tiny 200, empty input included.
async fn spawn_permissive_server() -> SocketAddr {
    use axum::{http::header, routing::post, Router};

    let app = Router::new().route(
        "/v1/audio/speech",
        post(|| async { ([(header::CONTENT_TYPE, "audio/wav")], b"RIFF".to_vec()) }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// An address nothing is listening on.
async fn dead_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

fn client_for(addr: SocketAddr, api_key: &str) -> SpeechClient {
    SpeechClient::new(ClientConfig::new(format!("http://{}/v1", addr)).with_api_key(api_key)).unwrap()
}

#[tokio::test]
async fn client_synthesizes_wav() {
    let addr = spawn_server(None).await;
    let client = client_for(addr, "not-needed");

    let request = SpeechRequest::new(
        "kokoro",
        "af_heart",
        "This is a test of the OpenAI-compatible API endpoint.",
    )
    .with_format(ResponseFormat::Wav)
    .with_speed(1.0)
    .with_language("a");

    let audio = client.create_speech(&request).await.unwrap();
    assert!(audio.content_type.as_deref().unwrap().contains("audio/wav"));
    assert!(!audio.is_empty());
    assert!(audio.bytes.starts_with(b"RIFF"));
}

#[tokio::test]
async fn faster_speech_is_shorter_but_still_succeeds() {
    let addr = spawn_server(None).await;
    let client = client_for(addr, "not-needed");
    let request = SpeechRequest::new("kokoro", "am_adam", "Pacing only changes duration.");

    let normal = client.create_speech(&request).await.unwrap();
    let fast = client
        .create_speech(&request.clone().with_speed(1.3))
        .await
        .unwrap();
    assert!(fast.len() < normal.len());
}

#[tokio::test]
async fn empty_input_surfaces_status_error() {
    let addr = spawn_server(None).await;
    let client = client_for(addr, "not-needed");

    let err = client
        .create_speech(&SpeechRequest::new("kokoro", "af_heart", ""))
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Status);
    assert_eq!(err.status().map(|s| s.as_u16()), Some(400));
    match err {
        ClientError::Api { message, .. } => assert!(message.contains("empty")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn client_lists_models_and_voices() {
    let addr = spawn_server(None).await;
    let client = client_for(addr, "");

    let models = client.list_models().await.unwrap();
    let ids: Vec<_> = models.data.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["kokoro", "tts-1", "tts-1-hd"]);
    assert!(models.data.iter().all(|m| m.created > 0));

    let voices = client.list_voices().await.unwrap();
    assert!(voices.data.iter().any(|v| v.id == "bm_lewis"));
}

#[tokio::test]
async fn client_sends_bearer_key() {
    let addr = spawn_server(Some("secret")).await;

    assert!(client_for(addr, "secret").list_models().await.is_ok());

    let err = client_for(addr, "wrong").list_models().await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(401));

    let err = client_for(addr, "").list_models().await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Status);
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let addr = dead_addr().await;
    let err = client_for(addr, "not-needed").list_models().await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Transport);
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn smoke_tester_passes_against_mock() {
    let addr = spawn_server(None).await;
    let dir = tempfile::tempdir().unwrap();

    let report = SmokeTester::new(format!("http://{}", addr), None)
        .with_output_dir(dir.path())
        .run()
        .await;

    assert!(report.all_passed(), "{:?}", report);
    assert_eq!(report.exit_code(), 0);
    let probes: Vec<_> = report.outcomes.iter().map(|o| o.probe).collect();
    assert_eq!(probes, [Probe::Health, Probe::Models, Probe::Speech]);

    let saved = std::fs::read(dir.path().join(OUTPUT_FILE)).unwrap();
    assert!(saved.starts_with(b"RIFF"));
}

#[tokio::test]
async fn smoke_tester_uses_key_when_given() {
    let addr = spawn_server(Some("secret")).await;
    let dir = tempfile::tempdir().unwrap();

    let without_key = SmokeTester::new(format!("http://{}", addr), None)
        .with_output_dir(dir.path())
        .run()
        .await;
    // Health stays open, the OpenAI routes do not
    assert!(without_key.outcomes[0].passed);
    assert!(!without_key.outcomes[1].passed);
    assert!(!without_key.outcomes[2].passed);
    assert_eq!(without_key.exit_code(), 1);

    let with_key = SmokeTester::new(format!("http://{}", addr), Some("secret".into()))
        .with_output_dir(dir.path())
        .run()
        .await;
    assert!(with_key.all_passed(), "{:?}", with_key);
}

#[tokio::test]
async fn smoke_tester_fails_every_probe_without_server() {
    let addr = dead_addr().await;
    let dir = tempfile::tempdir().unwrap();

    let report = SmokeTester::new(format!("http://{}", addr), None)
        .with_output_dir(dir.path())
        .run()
        .await;

    assert_eq!(report.outcomes.len(), 3);
    assert!(report.outcomes.iter().all(|o| !o.passed));
    assert_eq!(report.exit_code(), 1);
    assert!(!dir.path().join(OUTPUT_FILE).exists());
}

#[tokio::test]
async fn demo_runs_end_to_end() {
    let addr = spawn_server(None).await;
    let dir = tempfile::tempdir().unwrap();
    let demo = Demo::new(client_for(addr, "not-needed"), dir.path());

    let mut out = Vec::new();
    let summary = demo.run(&mut out).await.unwrap();

    assert_eq!(
        summary.files,
        [dir.path().join(BASIC_OUTPUT), dir.path().join(FAST_OUTPUT)]
    );
    for file in &summary.files {
        assert!(std::fs::read(file).unwrap().starts_with(b"RIFF"));
    }
    assert_eq!(
        summary.models.as_deref().map(|m| m.len()),
        Some(3)
    );
    assert!(matches!(
        summary.expected_failure,
        ExpectedFailure::Caught {
            category: ErrorCategory::Status,
            ..
        }
    ));

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Example 5: Error Handling"));
    assert!(text.contains("All examples completed!"));
}

#[tokio::test]
async fn demo_aborts_when_server_is_down() {
    let addr = dead_addr().await;
    let dir = tempfile::tempdir().unwrap();
    let demo = Demo::new(client_for(addr, "not-needed"), dir.path());

    let mut out = Vec::new();
    let err = demo.run(&mut out).await.unwrap_err();
    assert!(err.to_string().contains("basic speech generation"));
    assert!(!dir.path().join(BASIC_OUTPUT).exists());
}

#[tokio::test]
async fn demo_reports_server_accepting_empty_input() {
    let addr = spawn_permissive_server().await;
    let dir = tempfile::tempdir().unwrap();
    let demo = Demo::new(client_for(addr, "not-needed"), dir.path());

    let mut out = Vec::new();
    let observed = demo.error_handling(&mut out).await.unwrap();
    assert_eq!(observed, ExpectedFailure::NotRaised);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Server accepted empty input"));
}
