use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use scholar_chat::{Config, Server};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tower::ServiceExt;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_PATH: &str = "/graph/v1/paper/search";

fn app_for(mock_server: &MockServer) -> Router {
    let mut config = Config::default();
    config.search.endpoint = format!("{}{SEARCH_PATH}", mock_server.uri());
    config.search.timeout_secs = 2;
    Server::new(config).router().unwrap()
}

fn chat_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/chat")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

#[tokio::test]
async fn test_chat_returns_answer_and_refs() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "paperId": "p1",
                    "title": "Peer mediation",
                    "year": 2018,
                    "abstract": "Peers as agents of change.",
                    "venue": "",
                    "url": "https://example.org/p1",
                    "authors": [{"name": "A"}, {"name": "B"}, {"name": "C"}, {"name": "D"}]
                },
                {
                    "paperId": "p2",
                    "title": "Visual routines",
                    "year": null,
                    "abstract": "Routines support autonomy.",
                    "venue": "Early Childhood Research Quarterly",
                    "url": null,
                    "authors": []
                }
            ]
        })))
        .mount(&mock_server)
        .await;

    let (status, headers, body) = send(
        app_for(&mock_server),
        chat_request(r#"{"question": "autismo sala de aula"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "application/json; charset=utf-8");
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");

    assert_eq!(
        body["refs"],
        json!([
            {
                "ref": "REF-1",
                "title": "Peer mediation",
                "year": 2018,
                "authors": "A, B, C et al.",
                "url": "https://example.org/p1"
            },
            {
                "ref": "REF-2",
                "title": "Visual routines",
                "year": "s/d",
                "venue": "Early Childhood Research Quarterly",
                "authors": "s/d"
            }
        ])
    );
    assert!(body["answer"]
        .as_str()
        .unwrap()
        .ends_with("Referências: REF-1, REF-2"));
    assert!(body.get("detail").is_none());
}

#[tokio::test]
async fn test_empty_question_envelope() {
    let mock_server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    for payload in [
        r#"{"question": ""}"#,
        r#"{"question": "   "}"#,
        "{}",
        r#"{"question": null}"#,
        r#"{"question": []}"#,
        r#"{"question": [null]}"#,
    ] {
        let (status, _, body) = send(app_for(&mock_server), chat_request(payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"answer": "Escreva uma pergunta para eu pesquisar.", "refs": []})
        );
    }
}

#[tokio::test]
async fn test_unparseable_body_is_still_200() {
    let mock_server = MockServer::start().await;

    let (status, headers, body) =
        send(app_for(&mock_server), chat_request("{not json")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "application/json; charset=utf-8");
    assert_eq!(
        body["answer"],
        "Algo deu errado ao processar sua pergunta. Tente novamente."
    );
    assert_eq!(body["refs"], json!([]));
    assert!(!body["detail"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_oversized_body_is_still_200() {
    let mock_server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let payload = format!(r#"{{"question": "{}"}}"#, "a".repeat(3 * 1024 * 1024));
    let (status, headers, body) = send(app_for(&mock_server), chat_request(payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "application/json; charset=utf-8");
    assert_eq!(
        body["answer"],
        "Algo deu errado ao processar sua pergunta. Tente novamente."
    );
    assert_eq!(body["refs"], json!([]));
    assert!(!body["detail"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_upstream_failure_is_still_200() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let (status, _, body) = send(
        app_for(&mock_server),
        chat_request(r#"{"question": "inclusão"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "answer": "Não consegui acessar a base de artigos agora. Tente novamente em instantes.",
            "refs": []
        })
    );
}

#[tokio::test]
async fn test_preflight() {
    let mock_server = MockServer::start().await;

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/chat")
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(app_for(&mock_server), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
}

#[tokio::test]
async fn test_health_endpoint() {
    let mock_server = MockServer::start().await;

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(app_for(&mock_server), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "scholar-chat");
}

#[tokio::test]
async fn test_server_lifecycle() {
    let mut config = Config::default();
    config.server.port = 0;
    config.server.graceful_shutdown_timeout_secs = 1;

    let server = Arc::new(Server::new(config));
    let server_clone = Arc::clone(&server);
    let handle = tokio::spawn(async move { server_clone.run().await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!server.is_shutdown_requested());

    server.shutdown();
    assert!(server.is_shutdown_requested());

    let result = timeout(Duration::from_secs(3), handle).await;
    assert!(result.is_ok(), "Server should shutdown gracefully");
    assert!(result.unwrap().unwrap().is_ok());
}
