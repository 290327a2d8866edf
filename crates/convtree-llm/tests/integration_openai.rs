//! Integration tests for the chat completions provider against a local stub server.

use convtree_core::ProviderConfig;
use convtree_llm::{OpenAiProvider, Provider, ProviderError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve one HTTP response and hand back the raw request text.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let lower = line.to_ascii_lowercase();
                        lower
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().parse::<usize>().unwrap())
                    })
                    .unwrap_or(0);
                if request.len() >= header_end + 4 + content_length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }

        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        String::from_utf8_lossy(&request).to_string()
    });

    (format!("http://{addr}/v1"), handle)
}

fn config_for(api_base: String) -> ProviderConfig {
    ProviderConfig {
        api_base,
        model: "test-model".to_string(),
        timeout_secs: 5,
        ..ProviderConfig::default()
    }
}

#[tokio::test]
async fn test_ask_returns_first_choice() {
    let (base, server) = serve_once(
        "HTTP/1.1 200 OK",
        r#"{"choices":[{"message":{"role":"assistant","content":"Denver is about 90 minutes away."}}]}"#,
    )
    .await;

    let provider = OpenAiProvider::new("secret-key", &config_for(base)).unwrap();
    let answer = provider.ask("How long to fly?").await.unwrap();
    assert_eq!(answer, "Denver is about 90 minutes away.");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /v1/chat/completions"));
    assert!(request.to_ascii_lowercase().contains("authorization: bearer secret-key"));
    assert!(request.contains("\"model\":\"test-model\""));
    assert!(request.contains("You are a helpful assistant."));
    assert!(request.contains("How long to fly?"));
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    let (base, _server) = serve_once("HTTP/1.1 401 Unauthorized", r#"{"error":"bad key"}"#).await;

    let provider = OpenAiProvider::new("wrong", &config_for(base)).unwrap();
    let err = provider.ask("hi").await.unwrap_err();
    assert!(matches!(err, ProviderError::Authentication));
}

#[tokio::test]
async fn test_server_error_keeps_body() {
    let (base, _server) = serve_once("HTTP/1.1 500 Internal Server Error", r#"{"error":"down"}"#).await;

    let provider = OpenAiProvider::new("key", &config_for(base)).unwrap();
    match provider.ask("hi").await.unwrap_err() {
        ProviderError::Status { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("down"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_choices() {
    let (base, _server) = serve_once("HTTP/1.1 200 OK", r#"{"choices":[]}"#).await;

    let provider = OpenAiProvider::new("key", &config_for(base)).unwrap();
    let err = provider.ask("hi").await.unwrap_err();
    assert!(matches!(err, ProviderError::EmptyResponse));
}

#[tokio::test]
async fn test_connection_refused_is_http_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let provider = OpenAiProvider::new("key", &config_for(format!("http://{addr}/v1"))).unwrap();
    let err = provider.ask("hi").await.unwrap_err();
    assert!(matches!(err, ProviderError::Http(_)));
}
