//! Access log formatting
//!
//! One `AccessLogEntry` is produced per handled request and rendered in
//! the format named by `logging.access_log_format`:
//! - `common` (Common Log Format)
//! - `combined` (Apache/Nginx combined format)
//! - `json` (one JSON object per line)
//! - anything else is treated as a custom `$variable` pattern

use chrono::Local;

/// Everything an access-log line can mention about a request/response pair.
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    /// Request timestamp
    pub time: chrono::DateTime<Local>,
    /// HTTP method (GET, HEAD, ...)
    pub method: String,
    /// Request path
    pub path: String,
    /// Query string without the leading `?`
    pub query: Option<String>,
    /// HTTP version (1.0, 1.1, 2)
    pub http_version: String,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: usize,
    /// Referer header
    pub referer: Option<String>,
    /// User-Agent header
    pub user_agent: Option<String>,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create an entry stamped with the current local time.
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Render the entry in the named format.
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => self.format_combined(),
            "common" => self.format_common(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent "$http_referer" "$http_user_agent"`
    fn format_combined(&self) -> String {
        format!(
            "{} \"{}\" \"{}\"",
            self.format_common(),
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    /// One JSON object per line, keys matching the struct fields.
    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Custom pattern with `$variable` substitution.
    ///
    /// Supported variables: `$remote_addr`, `$time_local`,
    /// `$time_iso8601`, `$request`, `$request_method`, `$request_uri`,
    /// `$request_time`, `$status`, `$body_bytes_sent`, `$http_referer`,
    /// `$http_user_agent`.
    fn format_custom(&self, pattern: &str) -> String {
        let mut result = pattern.to_string();

        // Longer variables first so $request does not eat $request_time etc.
        result = result.replace("$remote_addr", &self.remote_addr);
        result = result.replace(
            "$time_local",
            &self.time.format("%d/%b/%Y:%H:%M:%S %z").to_string(),
        );
        result = result.replace("$time_iso8601", &self.time.to_rfc3339());
        #[allow(clippy::cast_precision_loss)]
        let request_time = self.request_time_us as f64 / 1_000_000.0;
        result = result.replace("$request_time", &format!("{request_time:.3}"));
        result = result.replace("$request_method", &self.method);
        result = result.replace("$request_uri", &self.request_uri());
        result = result.replace("$request", &self.request_line());
        result = result.replace("$status", &self.status.to_string());
        result = result.replace("$body_bytes_sent", &self.body_bytes.to_string());
        result = result.replace(
            "$http_referer",
            self.referer.as_deref().unwrap_or("-"),
        );
        result = result.replace(
            "$http_user_agent",
            self.user_agent.as_deref().unwrap_or("-"),
        );

        result
    }

    /// Path plus query string, e.g. `/?debug=1`.
    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{}", self.path, q),
            None => self.path.clone(),
        }
    }

    /// Full request line, e.g. `GET / HTTP/1.1`.
    fn request_line(&self) -> String {
        format!(
            "{} {} HTTP/{}",
            self.method,
            self.request_uri(),
            self.http_version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "172.17.0.1".to_string(),
            "GET".to_string(),
            "/".to_string(),
        );
        entry.query = Some("from=curl".to_string());
        entry.status = 200;
        entry.body_bytes = 21;
        entry.referer = Some("https://example.com/".to_string());
        entry.user_agent = Some("curl/8.5.0".to_string());
        entry.request_time_us = 850;
        entry
    }

    #[test]
    fn common_has_request_line_and_size() {
        let log = sample_entry().format("common");
        assert!(log.contains("172.17.0.1"));
        assert!(log.contains("\"GET /?from=curl HTTP/1.1\""));
        assert!(log.ends_with("200 21"));
        assert!(!log.contains("curl/8.5.0"));
    }

    #[test]
    fn combined_appends_referer_and_user_agent() {
        let log = sample_entry().format("combined");
        assert!(log.contains("\"GET /?from=curl HTTP/1.1\""));
        assert!(log.contains("\"https://example.com/\""));
        assert!(log.contains("\"curl/8.5.0\""));
    }

    #[test]
    fn json_round_trips_through_serde() {
        let log = sample_entry().format("json");
        let value: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(value["remote_addr"], "172.17.0.1");
        assert_eq!(value["status"], 200);
        assert_eq!(value["body_bytes"], 21);
        assert_eq!(value["query"], "from=curl");
    }

    #[test]
    fn json_renders_missing_fields_as_null() {
        let mut entry = sample_entry();
        entry.query = None;
        entry.referer = None;
        let value: serde_json::Value = serde_json::from_str(&entry.format("json")).unwrap();
        assert!(value["query"].is_null());
        assert!(value["referer"].is_null());
    }

    #[test]
    fn custom_pattern_substitutes_variables() {
        let log = sample_entry().format("$status $request_method $request_time");
        assert!(log.starts_with("200 GET"));
        // 850us rounds to 0.001s at three decimal places
        assert!(log.ends_with("0.001"), "got: {log}");
    }
}
