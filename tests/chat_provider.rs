//! End-to-end tests for `ChatEditProvider` against an in-process HTTP stub.

use genedit::{
    ChatEditProvider, EditRequest, GenEditError, ImageEditor, ImageEditorExt, ImageInput, Locale,
    MaskInput, SimulatedVideoProvider, VideoGenerationRequest, VideoProvider,
};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// A captured HTTP request.
struct Captured {
    head: String,
    body: Vec<u8>,
}

impl Captured {
    fn header(&self, name: &str) -> Option<String> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }

    fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Serves exactly one response and hands back the request it received.
async fn serve_once(status: u16, body: &str) -> (String, oneshot::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();
    let body = body.to_string();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let head_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
        let content_length = head
            .lines()
            .find_map(|line| {
                let (key, value) = line.split_once(':')?;
                key.trim()
                    .eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);

        while buf.len() < head_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        let _ = tx.send(Captured {
            head,
            body: buf[head_end..].to_vec(),
        });
    });

    (format!("http://{addr}/v1"), rx)
}

fn provider(base_url: &str, locale: Locale) -> ChatEditProvider {
    ChatEditProvider::builder()
        .api_key("sk-test-key")
        .base_url(base_url)
        .locale(locale)
        .build()
        .unwrap()
}

fn completion(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-1",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
    .to_string()
}

fn request() -> EditRequest {
    EditRequest::new(ImageInput::inline("AAAA", "image/jpeg"), "Make the sky purple")
}

#[tokio::test]
async fn test_successful_edit_sends_expected_request() {
    let (base, captured) = serve_once(
        200,
        &completion("Here you go!\n![result](data:image/png;base64,iVBORw0KGgo=)"),
    )
    .await;
    let provider = provider(&base, Locale::En);

    let req = request()
        .with_mask(MaskInput::new("MMMM"))
        .with_secondary_image(ImageInput::inline("SSSS", "image/webp"));
    let content = provider.edit(&req).await.unwrap();

    assert_eq!(
        content.image_url.as_deref(),
        Some("data:image/png;base64,iVBORw0KGgo=")
    );
    assert_eq!(content.text.as_deref(), Some("Here you go!"));
    assert_eq!(content.video_url, None);

    let captured = captured.await.unwrap();
    assert!(captured.head.starts_with("POST /v1/chat/completions "));
    assert_eq!(
        captured.header("authorization").as_deref(),
        Some("Bearer sk-test-key")
    );
    assert_eq!(
        captured.header("content-type").as_deref(),
        Some("application/json")
    );
    assert_eq!(captured.body, provider.request_body(&req).unwrap());

    let json = captured.json();
    assert_eq!(json["stream"], serde_json::json!(false));
    assert_eq!(json["messages"][0]["role"], "user");
    assert_eq!(json["messages"][0]["content"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_positional_edit_image_wrapper() {
    let (base, captured) = serve_once(200, &completion("https://cdn.test/out.webp")).await;
    let provider = provider(&base, Locale::En);

    let content = provider
        .edit_image("AAAA", "image/png", "Remove the car", Some("MMMM"), None)
        .await
        .unwrap();
    assert_eq!(content.image_url.as_deref(), Some("https://cdn.test/out.webp"));
    assert_eq!(content.text, None);

    let json = captured.await.unwrap().json();
    let blocks = json["messages"][0]["content"].as_array().unwrap();
    assert_eq!(blocks.len(), 3);
    assert_eq!(
        blocks[2]["image_url"]["url"],
        "data:image/png;base64,MMMM"
    );
}

#[tokio::test]
async fn test_refusal_text_becomes_error_message() {
    let (base, _captured) = serve_once(200, &completion("  I cannot edit this image.  ")).await;
    let err = provider(&base, Locale::En).edit(&request()).await.unwrap_err();

    assert!(matches!(err, GenEditError::NoImage(_)));
    assert_eq!(err.to_string(), "I cannot edit this image.");
}

#[tokio::test]
async fn test_empty_content_uses_generic_no_image_message() {
    let (base, _captured) = serve_once(200, &completion("")).await;
    let err = provider(&base, Locale::En).edit(&request()).await.unwrap_err();

    assert_eq!(err.to_string(), Locale::En.messages().no_image);
}

#[tokio::test]
async fn test_missing_choices_is_malformed() {
    let (base, _captured) = serve_once(200, r#"{"choices":[]}"#).await;
    let err = provider(&base, Locale::En).edit(&request()).await.unwrap_err();

    assert!(matches!(err, GenEditError::MalformedResponse(_)));
    assert_eq!(err.to_string(), Locale::En.messages().malformed_response);
}

#[tokio::test]
async fn test_resource_exhausted_maps_to_rate_limit_message() {
    let (base, _captured) = serve_once(
        429,
        r#"{"error":{"message":"X","status":"RESOURCE_EXHAUSTED"}}"#,
    )
    .await;
    let err = provider(&base, Locale::Zh).edit(&request()).await.unwrap_err();

    assert!(matches!(err, GenEditError::RateLimited(_)));
    assert_eq!(err.to_string(), Locale::Zh.messages().rate_limited);
}

#[tokio::test]
async fn test_server_error_code_maps_to_transient_message() {
    let (base, _captured) =
        serve_once(500, r#"{"error":{"message":"internal","code":500}}"#).await;
    let err = provider(&base, Locale::En).edit(&request()).await.unwrap_err();

    assert_eq!(err.to_string(), Locale::En.messages().server_unavailable);
}

#[tokio::test]
async fn test_non_json_error_body_is_kept() {
    let (base, _captured) = serve_once(502, "upstream proxy failure").await;
    let err = provider(&base, Locale::En).edit(&request()).await.unwrap_err();

    assert!(matches!(err, GenEditError::Api { status: 502, .. }));
    assert!(err.to_string().contains("upstream proxy failure"));
}

#[tokio::test]
async fn test_plain_message_error_body() {
    let (base, _captured) = serve_once(401, r#"{"message":"invalid token"}"#).await;
    let err = provider(&base, Locale::En).edit(&request()).await.unwrap_err();

    assert_eq!(err.to_string(), "API error: 401 - invalid token");
}

#[tokio::test]
async fn test_video_failure_is_prefixed_and_incomplete() {
    let (base, _captured) = serve_once(
        429,
        r#"{"error":{"message":"X","status":"RESOURCE_EXHAUSTED"}}"#,
    )
    .await;
    let video = SimulatedVideoProvider::new(provider(&base, Locale::En))
        .with_delay(Duration::ZERO);

    let progress = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&progress);
    let cb: genedit::ProgressCallback = Arc::new(move |pct: u8| sink.lock().unwrap().push(pct));

    let err = video
        .generate(&VideoGenerationRequest::new("Waves"), Some(&cb))
        .await
        .unwrap_err();

    let messages = Locale::En.messages();
    assert_eq!(
        err.to_string(),
        format!("{}: {}", messages.video_failed, messages.rate_limited)
    );
    assert!(!progress.lock().unwrap().contains(&100));
}

#[tokio::test]
async fn test_video_failure_prefix_uses_editor_locale() {
    let (base, _captured) = serve_once(
        429,
        r#"{"error":{"message":"X","status":"RESOURCE_EXHAUSTED"}}"#,
    )
    .await;
    let video = SimulatedVideoProvider::new(provider(&base, Locale::Zh))
        .with_delay(Duration::ZERO);

    let err = video
        .generate(&VideoGenerationRequest::new("Waves"), None)
        .await
        .unwrap_err();

    let messages = Locale::Zh.messages();
    assert_eq!(
        err.to_string(),
        format!("{}: {}", messages.video_failed, messages.rate_limited)
    );
}

#[tokio::test]
async fn test_video_success_round_trip() {
    let (base, captured) =
        serve_once(200, &completion("![frame](https://cdn.test/frame.png)")).await;
    let video = SimulatedVideoProvider::new(provider(&base, Locale::En))
        .with_delay(Duration::ZERO);

    let content = video
        .generate(&VideoGenerationRequest::new("Waves"), None)
        .await
        .unwrap();
    assert_eq!(content.image_url.as_deref(), Some("https://cdn.test/frame.png"));
    assert_eq!(
        content.video_url.as_deref(),
        Some(genedit::video::providers::PLACEHOLDER_VIDEO_URL)
    );

    let json = captured.await.unwrap().json();
    let blocks = json["messages"][0]["content"].as_array().unwrap();
    assert_eq!(blocks[0]["text"], "Waves\n\nAspect ratio: 16:9");
    assert_eq!(blocks[1]["image_url"]["url"], "data:image/jpeg;base64,");
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = provider(&format!("http://{addr}"), Locale::En)
        .edit(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, GenEditError::Network(_)));
}
