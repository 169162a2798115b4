//! Access log rendering.
//!
//! `logging.access_log_format` selects one of the nginx-style presets or a
//! custom pattern of `$variables`; it is parsed once at startup into an
//! [`AccessLogFormat`].

use chrono::{DateTime, Local};
use std::borrow::Cow;
use std::time::Duration;

const TIME_LOCAL_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// How access log lines are rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessLogFormat {
    /// `common` plus quoted referer and user agent
    Combined,
    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    Common,
    /// One JSON object per line
    Json,
    /// Free text with `$variable` substitution; unknown variables are kept as-is
    Custom(String),
}

impl AccessLogFormat {
    pub fn parse(spec: &str) -> Self {
        match spec {
            "combined" => Self::Combined,
            "common" => Self::Common,
            "json" => Self::Json,
            pattern => Self::Custom(pattern.to_string()),
        }
    }
}

/// One served request, as seen by the access log
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub client_ip: String,
    pub received_at: DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Without the leading `?`
    pub query: Option<String>,
    /// `1.0`, `1.1` or `2`
    pub http_version: &'static str,
    pub status: u16,
    pub bytes_sent: u64,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub elapsed: Duration,
    /// Tenant the request was routed to, if it got that far
    pub tenant: Option<String>,
}

impl AccessLogEntry {
    /// Entry for a request received at `received_at`; the response fields start zeroed
    pub fn new(
        client_ip: String,
        method: String,
        path: String,
        received_at: DateTime<Local>,
    ) -> Self {
        Self {
            client_ip,
            received_at,
            method,
            path,
            query: None,
            http_version: "1.1",
            status: 0,
            bytes_sent: 0,
            referer: None,
            user_agent: None,
            elapsed: Duration::ZERO,
            tenant: None,
        }
    }

    pub fn render(&self, format: &AccessLogFormat) -> String {
        match format {
            AccessLogFormat::Combined => format!(
                "{} \"{}\" \"{}\"",
                self.render_common(),
                or_dash(self.referer.as_deref()),
                or_dash(self.user_agent.as_deref()),
            ),
            AccessLogFormat::Common => self.render_common(),
            AccessLogFormat::Json => self.render_json(),
            AccessLogFormat::Custom(pattern) => self.render_pattern(pattern),
        }
    }

    fn uri(&self) -> Cow<'_, str> {
        match &self.query {
            Some(query) => Cow::Owned(format!("{}?{query}", self.path)),
            None => Cow::Borrowed(&self.path),
        }
    }

    fn request_line(&self) -> String {
        format!("{} {} HTTP/{}", self.method, self.uri(), self.http_version)
    }

    fn render_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.client_ip,
            self.received_at.format(TIME_LOCAL_FORMAT),
            self.request_line(),
            self.status,
            self.bytes_sent,
        )
    }

    fn render_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.client_ip,
            "time": self.received_at.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.bytes_sent,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time": self.elapsed.as_secs_f64(),
            "tenant": self.tenant,
        })
        .to_string()
    }

    /// Value of a pattern variable, `None` if the name is unknown
    fn variable(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = match name {
            "remote_addr" => Cow::Borrowed(self.client_ip.as_str()),
            "time_local" => Cow::Owned(self.received_at.format(TIME_LOCAL_FORMAT).to_string()),
            "time_iso8601" => Cow::Owned(self.received_at.to_rfc3339()),
            "request" => Cow::Owned(self.request_line()),
            "request_method" => Cow::Borrowed(self.method.as_str()),
            "request_uri" => self.uri(),
            "request_time" => Cow::Owned(format!("{:.3}", self.elapsed.as_secs_f64())),
            "status" => Cow::Owned(self.status.to_string()),
            "body_bytes_sent" => Cow::Owned(self.bytes_sent.to_string()),
            "http_referer" => Cow::Borrowed(or_dash(self.referer.as_deref())),
            "http_user_agent" => Cow::Borrowed(or_dash(self.user_agent.as_deref())),
            "tenant" => Cow::Borrowed(or_dash(self.tenant.as_deref())),
            _ => return None,
        };
        Some(value)
    }

    /// Substitute `$name` tokens, where a name is the longest run of `[a-z0-9_]`
    fn render_pattern(&self, pattern: &str) -> String {
        let mut out = String::with_capacity(pattern.len() + 64);
        let mut rest = pattern;

        while let Some(dollar) = rest.find('$') {
            out.push_str(&rest[..dollar]);
            let after = &rest[dollar + 1..];
            let name_len = after
                .bytes()
                .take_while(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'_')
                .count();
            let name = &after[..name_len];

            match self.variable(name) {
                Some(value) => out.push_str(&value),
                None => {
                    out.push('$');
                    out.push_str(name);
                }
            }
            rest = &after[name_len..];
        }
        out.push_str(rest);
        out
    }
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "10.0.0.7".to_string(),
            "GET".to_string(),
            "/pr-5/index.html".to_string(),
            Local.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap(),
        );
        entry.query = Some("v=1".to_string());
        entry.status = 304;
        entry.bytes_sent = 0;
        entry.referer = Some("https://notebooks.example.org/".to_string());
        entry.user_agent = Some("curl/8.5".to_string());
        entry.elapsed = Duration::from_micros(1500);
        entry.tenant = Some("pr-5".to_string());
        entry
    }

    #[test]
    fn presets_parse_and_anything_else_is_custom() {
        assert_eq!(AccessLogFormat::parse("combined"), AccessLogFormat::Combined);
        assert_eq!(AccessLogFormat::parse("common"), AccessLogFormat::Common);
        assert_eq!(AccessLogFormat::parse("json"), AccessLogFormat::Json);
        assert_eq!(
            AccessLogFormat::parse("$status"),
            AccessLogFormat::Custom("$status".to_string())
        );
    }

    #[test]
    fn combined_line() {
        let line = sample().render(&AccessLogFormat::Combined);
        assert!(line.starts_with("10.0.0.7 - - ["));
        assert!(line.contains("\"GET /pr-5/index.html?v=1 HTTP/1.1\" 304 0"));
        assert!(line.ends_with("\"https://notebooks.example.org/\" \"curl/8.5\""));
    }

    #[test]
    fn common_line_omits_client_headers() {
        let line = sample().render(&AccessLogFormat::Common);
        assert!(line.ends_with("\"GET /pr-5/index.html?v=1 HTTP/1.1\" 304 0"));
        assert!(!line.contains("curl"));
    }

    #[test]
    fn json_line_is_valid_and_escaped() {
        let mut entry = sample();
        entry.user_agent = Some("quote\" and \\ slash".to_string());

        let value: serde_json::Value =
            serde_json::from_str(&entry.render(&AccessLogFormat::Json)).unwrap();
        assert_eq!(value["remote_addr"], "10.0.0.7");
        assert_eq!(value["status"], 304);
        assert_eq!(value["tenant"], "pr-5");
        assert_eq!(value["query"], "v=1");
        assert_eq!(value["user_agent"], "quote\" and \\ slash");
    }

    #[test]
    fn pattern_substitution_uses_whole_names() {
        let format = AccessLogFormat::parse("$remote_addr $tenant $status $request_time \"$request\"");
        assert_eq!(
            sample().render(&format),
            "10.0.0.7 pr-5 304 0.002 \"GET /pr-5/index.html?v=1 HTTP/1.1\""
        );
    }

    #[test]
    fn timestamps_are_the_arrival_time() {
        let entry = sample();
        assert!(entry
            .render(&AccessLogFormat::Common)
            .contains("[14/Mar/2026:09:26:53 "));
        assert!(entry
            .render(&AccessLogFormat::parse("$time_iso8601"))
            .starts_with("2026-03-14T09:26:53"));
    }

    #[test]
    fn pattern_keeps_unknown_variables_and_stray_dollars() {
        let mut entry = sample();
        entry.tenant = None;
        let format = AccessLogFormat::parse("[$tenant] $nope $ $request_method$");
        assert_eq!(entry.render(&format), "[-] $nope $ GET$");
    }
}
