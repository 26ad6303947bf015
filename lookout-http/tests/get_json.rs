use lookout_http::{Auth, HttpClient, HttpError, RequestOpts};
use serde::Deserialize;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize)]
struct Echo {
    ok: bool,
}

#[tokio::test]
async fn sends_query_and_auth_params_once_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("q", "rust & tokio"))
        .and(query_param("key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let got: Echo = client
        .get_json(
            "v1/search",
            RequestOpts {
                query: Some(vec![("q", "rust & tokio".into())]),
                auth: Some(Auth::query("key", "secret")),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(got.ok);
}

#[tokio::test]
async fn api_errors_carry_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": { "code": 403, "message": "quota exceeded" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_json::<Echo>("", RequestOpts::default())
        .await
        .unwrap_err();

    match err {
        HttpError::Api { status, message } => {
            assert_eq!(status.as_u16(), 403);
            assert_eq!(message, "quota exceeded");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_json::<Echo>("", RequestOpts::default())
        .await
        .unwrap_err();

    assert!(matches!(err, HttpError::Api { .. }));
    server.verify().await;
}

#[tokio::test]
async fn slow_responses_time_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "ok": true }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri())
        .unwrap()
        .with_timeout(Duration::from_millis(200));
    let err = client
        .get_json::<Echo>("", RequestOpts::default())
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {err:?}");
}

#[tokio::test]
async fn undecodable_bodies_are_decode_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_json::<Echo>("", RequestOpts::default())
        .await
        .unwrap_err();

    match err {
        HttpError::Decode(_, snippet) => assert!(snippet.contains("not json")),
        other => panic!("expected decode error, got {other:?}"),
    }
}
