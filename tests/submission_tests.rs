//! Mock HTTP tests for the submission lifecycle.
//!
//! These tests cover:
//! - Multipart request shape sent to /minecraftify
//! - Success, service error and transport error outcomes
//! - Service timeouts outlasting the client's default timeout
//! - At-most-one submission in flight
//! - Result handle replacement and release

use std::time::Duration;

use minecraftimg::i18n::Language;
use minecraftimg::resource::HandleRole;
use minecraftimg::selection::{BlockWidth, ImageMime, SourceImage, WidthPolicy};
use minecraftimg::shell::Shell;
use minecraftimg::submission::{
    ConvertClient, ConvertError, SubmissionController, SubmissionStatus, DEFAULT_TIMEOUT,
    SERVICE_CONVERSION_BUDGET, UNREACHABLE_MESSAGE,
};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use wiremock::matchers::{body_string_contains, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn image() -> SourceImage {
    SourceImage::new("cat.png", ImageMime::Png, b"fake-png-bytes".to_vec())
}

fn shell_for(base_url: &str) -> Shell {
    let client = ConvertClient::with_base_url(base_url).unwrap();
    Shell::new(
        SubmissionController::new(client),
        BlockWidth::default(),
        Language::English,
    )
}

// === Request Shape ===

#[tokio::test]
async fn test_convert_sends_multipart_image_and_width() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/minecraftify"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .and(body_string_contains(
            "name=\"image\"; filename=\"cat.png\"",
        ))
        .and(body_string_contains("image/png"))
        .and(body_string_contains("fake-png-bytes"))
        .and(body_string_contains("name=\"width\"\r\n\r\n32\r\n"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"converted".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ConvertClient::with_base_url(mock_server.uri()).unwrap();
    let result = client.convert(&image(), BlockWidth::new(32)).await;

    assert_eq!(result.unwrap(), b"converted".to_vec());
}

#[tokio::test]
async fn test_convert_preserves_jpeg_type_and_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/minecraftify"))
        .and(body_string_contains("filename=\"holiday.jpeg\""))
        .and(body_string_contains("image/jpeg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ConvertClient::with_base_url(mock_server.uri()).unwrap();
    let jpeg = SourceImage::new("holiday.jpeg", ImageMime::Jpeg, b"jpeg-bytes".to_vec());
    assert!(client.convert(&jpeg, BlockWidth::default()).await.is_ok());
}

// === Outcomes ===

#[tokio::test]
async fn test_success_sets_result_handle_to_response_bytes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/minecraftify"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(b"block-art".to_vec()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut shell = shell_for(&mock_server.uri());
    shell.select(Some(image())).unwrap();

    let submission = shell.submit().expect("submit should dispatch");
    let completion = submission.send().await;
    shell.on_completion(completion);

    assert_eq!(shell.status(), &SubmissionStatus::Succeeded);
    assert_eq!(
        shell.resources().active_bytes(HandleRole::Result),
        Some(&b"block-art"[..])
    );
    assert!(shell.view().error.is_none());
}

#[tokio::test]
async fn test_json_error_is_surfaced_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/minecraftify"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(serde_json::json!({"error": "bad width"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut shell = shell_for(&mock_server.uri());
    shell.select(Some(image())).unwrap();

    let completion = shell.submit().unwrap().send().await;
    shell.on_completion(completion);

    assert_eq!(
        shell.status(),
        &SubmissionStatus::Failed {
            reason: "bad width".to_string()
        }
    );
    assert!(shell.resources().active(HandleRole::Result).is_none());
    // Only the preview was ever minted.
    assert_eq!(shell.resources().stats().minted, 1);
}

#[tokio::test]
async fn test_plain_text_error_falls_back_to_raw_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/minecraftify"))
        .respond_with(ResponseTemplate::new(413).set_body_string("Request Entity Too Large"))
        .mount(&mock_server)
        .await;

    let client = ConvertClient::with_base_url(mock_server.uri()).unwrap();
    let result = client.convert(&image(), BlockWidth::default()).await;

    match result {
        Err(ConvertError::Service { status, message }) => {
            assert_eq!(status, 413);
            assert_eq!(message, "Request Entity Too Large");
        }
        other => panic!("Expected Service error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_error_body_is_unknown_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/minecraftify"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let mut shell = shell_for(&mock_server.uri());
    shell.select(Some(image())).unwrap();
    let completion = shell.submit().unwrap().send().await;
    shell.on_completion(completion);

    assert_eq!(shell.status().failure_reason(), Some("Unknown error"));
}

#[tokio::test]
async fn test_empty_success_body_is_transport_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/minecraftify"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let mut shell = shell_for(&mock_server.uri());
    shell.select(Some(image())).unwrap();
    let completion = shell.submit().unwrap().send().await;
    assert!(matches!(completion.outcome(), Err(ConvertError::EmptyResponse)));
    shell.on_completion(completion);

    assert_eq!(shell.status().failure_reason(), Some(UNREACHABLE_MESSAGE));
    assert!(shell.resources().active(HandleRole::Result).is_none());
}

#[tokio::test]
async fn test_unreachable_service_fails_with_fallback_message() {
    let mut shell = shell_for("http://127.0.0.1:9");
    shell.select(Some(image())).unwrap();

    let completion = shell.submit().unwrap().send().await;
    assert!(matches!(completion.outcome(), Err(ConvertError::Http(_))));
    shell.on_completion(completion);

    assert!(!shell.status().is_in_flight());
    assert_eq!(shell.status().failure_reason(), Some(UNREACHABLE_MESSAGE));
    assert!(shell.view().submit_enabled, "user can retry manually");
}

#[tokio::test]
async fn test_timeout_fails_with_fallback_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/minecraftify"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"late".to_vec())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = ConvertClient::with_timeouts(
        mock_server.uri(),
        Duration::from_millis(200),
        Duration::from_secs(1),
    )
    .unwrap();
    let mut shell = Shell::new(
        SubmissionController::new(client),
        BlockWidth::default(),
        Language::English,
    );
    shell.select(Some(image())).unwrap();

    let completion = shell.submit().unwrap().send().await;
    shell.on_completion(completion);

    assert_eq!(shell.status().failure_reason(), Some(UNREACHABLE_MESSAGE));
}

#[tokio::test]
async fn test_slow_service_timeout_message_reaches_user_with_defaults() {
    let mock_server = MockServer::start().await;

    // Answer just after the service's own conversion budget expires.
    Mock::given(method("POST"))
        .and(path("/minecraftify"))
        .respond_with(
            ResponseTemplate::new(504)
                .set_body_string(
                    r#"{"error":"Conversion took too long. Try a smaller image or fewer blocks."}"#,
                )
                .set_delay(SERVICE_CONVERSION_BUDGET + Duration::from_millis(500)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut shell = shell_for(&mock_server.uri());
    shell.select(Some(image())).unwrap();

    let completion = shell.submit().unwrap().send().await;
    assert!(matches!(
        completion.outcome(),
        Err(ConvertError::Service { status: 504, .. })
    ));
    shell.on_completion(completion);

    assert_eq!(
        shell.status().failure_reason(),
        Some("Conversion took too long. Try a smaller image or fewer blocks.")
    );
}

#[test]
fn test_default_timeout_outlasts_service_budget() {
    assert!(DEFAULT_TIMEOUT >= SERVICE_CONVERSION_BUDGET * 2);
}

#[tokio::test]
async fn test_truncated_error_body_is_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        // Drain the whole multipart request before answering.
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        while !request.ends_with(b"--\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        // Promise 100 bytes, send a few, hang up.
        socket
            .write_all(b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\n{\"error\"")
            .await
            .unwrap();
        socket.flush().await.unwrap();
    });

    let mut shell = shell_for(&format!("http://{}", addr));
    shell.select(Some(image())).unwrap();

    let completion = shell.submit().unwrap().send().await;
    assert!(matches!(completion.outcome(), Err(ConvertError::Http(_))));
    shell.on_completion(completion);
    server.await.unwrap();

    assert_eq!(shell.status().failure_reason(), Some(UNREACHABLE_MESSAGE));
}

// === Serialization ===

#[tokio::test]
async fn test_no_image_means_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut shell = shell_for(&mock_server.uri());
    assert!(shell.submit().is_none());
    assert_eq!(shell.status(), &SubmissionStatus::Idle);
}

#[tokio::test]
async fn test_rapid_double_submit_issues_one_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/minecraftify"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"once".to_vec())
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut shell = shell_for(&mock_server.uri());
    shell.select(Some(image())).unwrap();

    let first = shell.submit().expect("first submit dispatches");
    let pending = tokio::spawn(first.send());

    assert!(shell.status().is_in_flight());
    assert!(shell.submit().is_none(), "second submit must be dropped");

    let completion = pending.await.unwrap();
    shell.on_completion(completion);

    assert_eq!(shell.status(), &SubmissionStatus::Succeeded);
}

#[tokio::test]
async fn test_edits_after_submit_do_not_alter_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/minecraftify"))
        .and(body_string_contains("name=\"width\"\r\n\r\n64\r\n"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut shell = shell_for(&mock_server.uri());
    shell.select(Some(image())).unwrap();
    let submission = shell.submit().unwrap();

    shell.edit_width("500");
    assert_eq!(shell.selection().block_width(), BlockWidth::new(500));

    let completion = submission.send().await;
    shell.on_completion(completion);
    assert_eq!(shell.status(), &SubmissionStatus::Succeeded);
}

#[tokio::test]
async fn test_reject_policy_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = ConvertClient::with_base_url(mock_server.uri()).unwrap();
    let mut shell = Shell::new(
        SubmissionController::with_policy(client, WidthPolicy::Reject),
        BlockWidth::new(1000),
        Language::English,
    );
    shell.select(Some(image())).unwrap();

    assert!(shell.submit().is_none());
    assert_eq!(
        shell.status().failure_reason(),
        Some("Block width must be between 1 and 512, got 1000")
    );
}

// === Result Handle Lifecycle ===

#[tokio::test]
async fn test_second_success_replaces_and_releases_first_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/minecraftify"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"result".to_vec()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut shell = shell_for(&mock_server.uri());
    shell.select(Some(image())).unwrap();

    let completion = shell.submit().unwrap().send().await;
    let first = shell.on_completion(completion).unwrap();

    let completion = shell.submit().unwrap().send().await;
    let second = shell.on_completion(completion).unwrap();

    assert_ne!(first, second);
    assert!(shell.resources().resolve(&first).is_none());
    assert_eq!(shell.resources().active(HandleRole::Result), Some(&second));

    let stats = shell.resources().stats();
    assert_eq!(stats.minted, 3);
    assert_eq!(stats.released, 1);
    assert_eq!(shell.resources().live_count(), 2);
}

#[tokio::test]
async fn test_failure_after_success_keeps_result_and_success_clears_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/minecraftify"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"good".to_vec()))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/minecraftify"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(serde_json::json!({"error": "Invalid width"})),
        )
        .mount(&mock_server)
        .await;

    let mut shell = shell_for(&mock_server.uri());
    shell.select(Some(image())).unwrap();

    let completion = shell.submit().unwrap().send().await;
    let good = shell.on_completion(completion).unwrap();

    let completion = shell.submit().unwrap().send().await;
    shell.on_completion(completion);

    let view = shell.view();
    assert_eq!(view.error.as_deref(), Some("Invalid width"));
    assert_eq!(view.result, Some(good));
}
