//! Request routing dispatch
//!
//! Entry point for HTTP request processing. Routing looks at the path
//! only: the root path serves the fixed greeting, everything else gets
//! the standard 404. Method and headers are not inspected; the root
//! route answers every verb with the same response.

use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::logger::AccessLogEntry;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// The one piece of application data this server serves.
pub const GREETING: &str = "Hello from Daily App!";

/// Path that serves the greeting.
const ROOT_PATH: &str = "/";

/// Main entry point for HTTP request handling.
///
/// Generic over the request body type: the server passes
/// `hyper::body::Incoming`, tests pass whatever is convenient. The
/// body is never read.
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let is_head = req.method() == Method::HEAD;

    let response = route_request(req.uri().path(), is_head, &state);

    if state.config.logging.access_log {
        let entry = access_entry(&req, peer_addr, &response, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route by exact path match.
fn route_request(path: &str, is_head: bool, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    if path == ROOT_PATH {
        http::build_greeting_response(GREETING, &state.config.http, is_head)
    } else {
        http::build_404_response()
    }
}

/// Assemble the access-log entry for a handled request.
fn access_entry<B>(
    req: &Request<B>,
    peer_addr: SocketAddr,
    response: &Response<Full<Bytes>>,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header_value(req, "referer");
    entry.user_agent = header_value(req, "user-agent");
    entry.request_time_us =
        u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

/// HTTP version as it appears in a log line ("1.0", "1.1", "2").
fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}

fn header_value<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};
    use http_body_util::BodyExt;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                workers: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: false,
                access_log_format: "common".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
            http: HttpConfig {
                default_content_type: "text/plain; charset=utf-8".to_string(),
                server_name: "DailyApp/0.1".to_string(),
            },
            performance: PerformanceConfig {
                keep_alive_timeout: 75,
                read_timeout: 30,
                write_timeout: 30,
            },
        }))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:54321".parse().unwrap()
    }

    async fn body_string(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn get_root_returns_greeting() {
        let req = Request::builder().uri("/").body(()).unwrap();
        let resp = handle_request(req, peer(), test_state()).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(body_string(resp).await, "Hello from Daily App!");
    }

    #[tokio::test]
    async fn every_method_gets_the_greeting() {
        for method in ["GET", "POST", "PUT", "DELETE", "OPTIONS", "PATCH"] {
            let req = Request::builder()
                .method(method)
                .uri("/")
                .body(())
                .unwrap();
            let resp = handle_request(req, peer(), test_state()).await.unwrap();
            assert_eq!(resp.status(), 200, "method {method}");
            assert_eq!(body_string(resp).await, "Hello from Daily App!");
        }
    }

    #[tokio::test]
    async fn query_and_headers_do_not_change_the_response() {
        let req = Request::builder()
            .uri("/?utm_source=test&page=2")
            .header("X-Custom", "anything")
            .header("Accept", "application/json")
            .body(())
            .unwrap();
        let resp = handle_request(req, peer(), test_state()).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(body_string(resp).await, "Hello from Daily App!");
    }

    #[tokio::test]
    async fn head_root_has_empty_body() {
        let req = Request::builder()
            .method("HEAD")
            .uri("/")
            .body(())
            .unwrap();
        let resp = handle_request(req, peer(), test_state()).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Length"], "21");
        assert_eq!(body_string(resp).await, "");
    }

    #[tokio::test]
    async fn unknown_paths_fall_through_to_404() {
        for path in ["/about", "/index.html", "//", "/hello"] {
            let req = Request::builder().uri(path).body(()).unwrap();
            let resp = handle_request(req, peer(), test_state()).await.unwrap();
            assert_eq!(resp.status(), 404, "path {path}");
        }
    }

    #[tokio::test]
    async fn repeated_requests_are_identical() {
        let state = test_state();
        let mut seen = Vec::new();
        for _ in 0..3 {
            let req = Request::builder().uri("/").body(()).unwrap();
            let resp = handle_request(req, peer(), Arc::clone(&state))
                .await
                .unwrap();
            let status = resp.status();
            seen.push((status, body_string(resp).await));
        }
        assert!(seen.windows(2).all(|w| w[0] == w[1]));
    }
}
