//! Integration tests for the OpenAI-compatible client against a mock server.

use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use futures::StreamExt;
use storyweaver::domain::models::{ChatMessage, OpenAiConfig};
use storyweaver::domain::ports::{CompletionClient, CompletionRequest, EmbeddingProvider};
use storyweaver::domain::DomainError;
use storyweaver::infrastructure::openai::{OpenAiClient, OpenAiEmbeddingProvider};

fn test_config(mock_server: &MockServer) -> OpenAiConfig {
    OpenAiConfig {
        api_key: Some("test-api-key".to_string()),
        base_url: mock_server.uri(),
        embedding_dimension: 4,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_successful_completion() {
    let mock_server = MockServer::start().await;

    let response_json = serde_json::json!({
        "id": "chatcmpl-test123",
        "choices": [
            {
                "message": {"role": "assistant", "content": "Once upon a time..."},
                "finish_reason": "stop"
            }
        ]
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-api-key"))
        .and(body_partial_json(serde_json::json!({"model": "gpt-4o-mini"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response_json))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::new(&test_config(&mock_server)).unwrap();
    let request = CompletionRequest::new(vec![ChatMessage::user("Tell me a story")]);

    let content = client.complete(request).await.unwrap();
    assert_eq!(content, "Once upon a time...");
}

#[tokio::test]
async fn test_completion_sends_sampling_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "temperature": 0.1,
            "top_p": 1.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "chatcmpl-1",
            "choices": [{"message": {"role": "assistant", "content": "[]"}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::new(&test_config(&mock_server)).unwrap();
    let request =
        CompletionRequest::new(vec![ChatMessage::user("extract")]).with_sampling(0.1, 1.0);

    client.complete(request).await.unwrap();
}

#[tokio::test]
async fn test_authentication_failure_maps_to_completion_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::new(&test_config(&mock_server)).unwrap();
    let request = CompletionRequest::new(vec![ChatMessage::user("hi")]);

    let err = client.complete(request).await.unwrap_err();
    assert!(matches!(err, DomainError::CompletionFailed(_)));
    assert!(err.to_string().to_lowercase().contains("authentication"));
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::new(&test_config(&mock_server)).unwrap();
    let request = CompletionRequest::new(vec![ChatMessage::user("hi")]);

    let err = client.complete(request).await.unwrap_err();
    assert!(matches!(err, DomainError::CompletionFailed(_)));
}

#[tokio::test]
async fn test_streaming_completion_yields_deltas_in_order() {
    let mock_server = MockServer::start().await;

    let sse_body = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"Once\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\" upon\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\" a time\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
        "data: [DONE]\n\n",
    );

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({"stream": true})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body, "text/event-stream"),
        )
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::new(&test_config(&mock_server)).unwrap();
    let request = CompletionRequest::new(vec![ChatMessage::user("Tell me a story")]);

    let mut stream = client.complete_stream(request).await.unwrap();

    let mut collected = String::new();
    while let Some(delta) = stream.next().await {
        collected.push_str(&delta.unwrap());
    }

    assert_eq!(collected, "Once upon a time");
}

#[tokio::test]
async fn test_streaming_error_status_fails_before_streaming() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::new(&test_config(&mock_server)).unwrap();
    let request = CompletionRequest::new(vec![ChatMessage::user("hi")]);

    let Err(err) = client.complete_stream(request).await else {
        panic!("expected stream setup to fail");
    };
    assert!(matches!(err, DomainError::CompletionFailed(_)));
}

#[tokio::test]
async fn test_embeddings_restore_input_order() {
    let mock_server = MockServer::start().await;

    // Out-of-order data entries must be re-sorted by index.
    let response_json = serde_json::json!({
        "data": [
            {"index": 1, "embedding": [0.0, 1.0, 0.0, 0.0]},
            {"index": 0, "embedding": [1.0, 0.0, 0.0, 0.0]},
            {"index": 2, "embedding": [0.0, 0.0, 1.0, 0.0]}
        ]
    });

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(header("authorization", "Bearer test-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response_json))
        .mount(&mock_server)
        .await;

    let provider = OpenAiEmbeddingProvider::new(&test_config(&mock_server)).unwrap();
    let texts = vec![
        "first".to_string(),
        "second".to_string(),
        "third".to_string(),
    ];

    let vectors = provider.embed_batch(&texts).await.unwrap();

    assert_eq!(vectors.len(), 3);
    assert_eq!(vectors[0], vec![1.0, 0.0, 0.0, 0.0]);
    assert_eq!(vectors[1], vec![0.0, 1.0, 0.0, 0.0]);
    assert_eq!(vectors[2], vec![0.0, 0.0, 1.0, 0.0]);
}

#[tokio::test]
async fn test_embeddings_count_mismatch_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{"index": 0, "embedding": [1.0, 0.0, 0.0, 0.0]}]
        })))
        .mount(&mock_server)
        .await;

    let provider = OpenAiEmbeddingProvider::new(&test_config(&mock_server)).unwrap();
    let texts = vec!["one".to_string(), "two".to_string()];

    let err = provider.embed_batch(&texts).await.unwrap_err();
    assert!(matches!(err, DomainError::EmbeddingFailed(_)));
}

#[tokio::test]
async fn test_embeddings_error_status_propagates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let provider = OpenAiEmbeddingProvider::new(&test_config(&mock_server)).unwrap();
    let err = provider.embed("hello").await.unwrap_err();
    assert!(matches!(err, DomainError::EmbeddingFailed(_)));
}
