//! HTTP response builders
//!
//! Builders for the two responses this server produces: the fixed
//! greeting and the 404 fallback. Build failures are logged and fall
//! back to a bare response so the handler stays infallible.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::config::HttpConfig;

/// Build the 200 greeting response.
///
/// HEAD requests get an empty body; Content-Length still reports the
/// full body size.
pub fn build_greeting_response(
    greeting: &'static str,
    http_config: &HttpConfig,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = greeting.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from_static(greeting.as_bytes())
    };

    Response::builder()
        .status(200)
        .header("Content-Type", &http_config.default_content_type)
        .header("Content-Length", content_length)
        .header("Server", &http_config.server_name)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::from_static(greeting.as_bytes())))
        })
}

/// Build the 404 Not Found response.
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("404 Not Found")))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_http_config() -> HttpConfig {
        HttpConfig {
            default_content_type: "text/plain; charset=utf-8".to_string(),
            server_name: "DailyApp/0.1".to_string(),
        }
    }

    #[test]
    fn greeting_response_carries_body_and_headers() {
        let resp = build_greeting_response("Hello from Daily App!", &test_http_config(), false);
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers()["Content-Type"],
            "text/plain; charset=utf-8"
        );
        assert_eq!(resp.headers()["Server"], "DailyApp/0.1");
        assert_eq!(resp.headers()["Content-Length"], "21");
    }

    #[test]
    fn head_greeting_has_empty_body_but_full_length() {
        use hyper::body::Body;

        let resp = build_greeting_response("Hello from Daily App!", &test_http_config(), true);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Length"], "21");
        assert_eq!(resp.body().size_hint().exact(), Some(0));
    }

    #[test]
    fn not_found_is_plain_text_404() {
        let resp = build_404_response();
        assert_eq!(resp.status(), 404);
        assert_eq!(resp.headers()["Content-Type"], "text/plain");
    }
}
