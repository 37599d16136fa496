use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Echo, GZIP_BODY};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(body.to_string())
        .unwrap()
}

// --- echo ---

#[tokio::test]
async fn echo_reports_query_string() {
    let resp = app()
        .oneshot(request("GET", "/echo?a=1&b=2", ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.query.as_deref(), Some("a=1&b=2"));
    assert!(echo.body.is_empty());
}

#[tokio::test]
async fn echo_reports_body_and_content_type() {
    let resp = app()
        .oneshot(request("POST", "/echo", "a=1&b=2"))
        .await
        .unwrap();

    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "POST");
    assert!(echo.query.is_none());
    assert_eq!(echo.body, "a=1&b=2");
    assert_eq!(echo.content_type.as_deref(), Some("text/plain; charset=utf-8"));
}

#[tokio::test]
async fn echo_accepts_every_supported_method() {
    for method in ["PUT", "DELETE", "PATCH", "OPTIONS"] {
        let resp = app().oneshot(request(method, "/echo", "x")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{method}");
        let echo: Echo = body_json(resp).await;
        assert_eq!(echo.method, method);
        assert_eq!(echo.body, "x");
    }
}

#[tokio::test]
async fn echo_head_has_no_body() {
    let resp = app().oneshot(request("HEAD", "/echo", "")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());
}

// --- redirect ---

#[tokio::test]
async fn redirect_points_at_next_hop() {
    let resp = app().oneshot(request("GET", "/redirect/2", "")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(resp.headers()[http::header::LOCATION], "/redirect/1");
    assert_eq!(resp.headers()["x-hop"], "2");
}

#[tokio::test]
async fn redirect_zero_is_final() {
    let resp = app().oneshot(request("GET", "/redirect/0", "")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("x-hop").is_none());
    assert_eq!(&body_bytes(resp).await[..], b"final");
}

#[tokio::test]
async fn loop_redirects_to_itself() {
    let resp = app().oneshot(request("GET", "/loop", "")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(resp.headers()[http::header::LOCATION], "/loop");
}

// --- status / headers ---

#[tokio::test]
async fn status_route_returns_requested_code() {
    let resp = app().oneshot(request("GET", "/status/418", "")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(&body_bytes(resp).await[..], b"status 418");
}

#[tokio::test]
async fn status_route_rejects_invalid_code() {
    let resp = app().oneshot(request("GET", "/status/42", "")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn headers_route_sets_custom_header() {
    let resp = app().oneshot(request("GET", "/headers", "")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-chttp-test"], "yes");
}

#[tokio::test]
async fn gzip_route_serves_compressed_bytes_unchanged() {
    let resp = app().oneshot(request("GET", "/gzip", "")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-encoding"], "gzip");
    assert_eq!(body_bytes(resp).await.as_ref(), GZIP_BODY);
}

#[tokio::test]
async fn echo_lists_request_header_names() {
    let resp = app().oneshot(request("GET", "/echo", "")).await.unwrap();
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.header_names, vec!["content-type"]);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let resp = app().oneshot(request("GET", "/nope", "")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
