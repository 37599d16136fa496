use axum::{
    extract::{Path, RawQuery},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What the server saw of an `/echo` request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub user_agent: Option<String>,
    /// Lower-case names of every request header, in arrival order.
    #[serde(default)]
    pub header_names: Vec<String>,
    pub body: String,
}

/// `hello raw body`, gzip-compressed. Served as-is by `/gzip`.
pub const GZIP_BODY: &[u8] = &[
    0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x03, 0xcb, 0x48, 0xcd, 0xc9, 0xc9, 0x57,
    0x28, 0x4a, 0x2c, 0x57, 0x48, 0xca, 0x4f, 0xa9, 0x04, 0x00, 0xd2, 0x6e, 0xd6, 0x46, 0x0e, 0x00,
    0x00, 0x00,
];

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/redirect/{hops}", get(redirect))
        .route("/loop", get(redirect_loop))
        .route("/status/{code}", any(status))
        .route("/headers", get(headers))
        .route("/gzip", get(gzip))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: String,
) -> Json<Echo> {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    Json(Echo {
        method: method.to_string(),
        query,
        content_type: header_text(header::CONTENT_TYPE),
        user_agent: header_text(header::USER_AGENT),
        header_names: headers.keys().map(|name| name.to_string()).collect(),
        body,
    })
}

/// Redirect `hops` times down to `/redirect/0`, which answers "final".
/// Every intermediate hop tags itself with an `x-hop` header.
async fn redirect(Path(hops): Path<u32>) -> Response {
    if hops == 0 {
        return "final".into_response();
    }
    let next = format!("/redirect/{}", hops - 1);
    ([("x-hop", hops.to_string())], Redirect::temporary(&next)).into_response()
}

async fn redirect_loop() -> Redirect {
    Redirect::temporary("/loop")
}

async fn status(Path(code): Path<u16>) -> Response {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, format!("status {code}")).into_response(),
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn headers() -> impl IntoResponse {
    ([("x-chttp-test", "yes")], "headers")
}

async fn gzip() -> impl IntoResponse {
    ([(header::CONTENT_ENCODING, "gzip")], GZIP_BODY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_serializes_to_json() {
        let echo = Echo {
            method: "POST".to_string(),
            query: None,
            content_type: Some("text/plain".to_string()),
            user_agent: None,
            header_names: vec!["content-type".to_string()],
            body: "a=1".to_string(),
        };
        let json = serde_json::to_value(&echo).unwrap();
        assert_eq!(json["method"], "POST");
        assert!(json["query"].is_null());
        assert_eq!(json["body"], "a=1");
        assert_eq!(json["header_names"][0], "content-type");
    }

    #[test]
    fn echo_deserializes_from_json() {
        let echo: Echo = serde_json::from_str(
            r#"{"method":"GET","query":"q=1","content_type":null,"user_agent":"ua","body":""}"#,
        )
        .unwrap();
        assert_eq!(echo.query.as_deref(), Some("q=1"));
        assert_eq!(echo.user_agent.as_deref(), Some("ua"));
        assert!(echo.header_names.is_empty());
    }
}
