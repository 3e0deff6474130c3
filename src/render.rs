//! Request rendering: placeholder substitution and raw request text
//!
//! One assignment in, one output record out. Host, port and the TLS flag
//! are derived by parsing the locator *after* substitution, since the host
//! or path may themselves contain placeholders.

use std::collections::HashMap;
use std::fmt::Write as _;

use serde::Serialize;
use url::Url;

use crate::error::FuzzError;

/// One complete set of placeholder → value bindings, a single point in the
/// cartesian product.
pub type Assignment = HashMap<String, String>;

/// The templated request, as declared on the command line. Every string
/// field may contain placeholder tokens as literal substrings.
#[derive(Debug, Clone)]
pub struct RequestTemplate {
    /// Raw target locator, e.g. `https://example.com:8443/FUZZ?q=1`.
    pub url: String,
    pub method: String,
    pub headers: Vec<String>,
    pub body: String,
}

impl RequestTemplate {
    /// Concatenation of every field a placeholder may appear in, used for
    /// used-placeholder detection. The scheme prefix is excluded so a
    /// placeholder spelled like a scheme never reads as used. Fields are
    /// joined with `\n`, which a placeholder cannot contain (words are
    /// single lines).
    pub fn substitutable_text(&self) -> String {
        let mut text = String::new();
        text.push_str(locator_without_scheme(&self.url));
        text.push('\n');
        text.push_str(&self.body);
        text.push('\n');
        for header in &self.headers {
            text.push_str(header);
            text.push('\n');
        }
        text
    }
}

fn locator_without_scheme(url: &str) -> &str {
    url.split_once("://").map(|(_, rest)| rest).unwrap_or(url)
}

/// One rendered combination, serialized as a single JSON line.
///
/// `port` is present only when the locator carries a non-default port for
/// its scheme.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct OutputRecord {
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    pub tls: bool,
    pub req: String,
}

/// Replace every occurrence of each placeholder with its assigned value.
///
/// `order` must be sorted longest token first; that ordering guarantees a
/// token sharing a prefix or suffix with a longer one is never substituted
/// into the middle of it.
pub fn substitute(field: &str, order: &[String], assignment: &Assignment) -> String {
    let mut out = field.to_string();
    for placeholder in order {
        if let Some(value) = assignment.get(placeholder) {
            out = out.replace(placeholder.as_str(), value);
        }
    }
    out
}

/// Render one assignment into an output record.
///
/// The scheme check happens here, after substitution, because an
/// unsupported scheme is a template-level misconfiguration: every
/// combination would fail identically, so the first failure aborts the
/// whole run.
pub fn render(
    template: &RequestTemplate,
    order: &[String],
    assignment: &Assignment,
) -> Result<OutputRecord, FuzzError> {
    // Substitute into everything after the scheme prefix, mirroring the
    // scheme exclusion in used-placeholder detection.
    let locator = match template.url.split_once("://") {
        Some((scheme, rest)) => format!("{}://{}", scheme, substitute(rest, order, assignment)),
        None => substitute(&template.url, order, assignment),
    };

    let url = Url::parse(&locator).map_err(|e| FuzzError::InvalidUrl {
        url: locator.clone(),
        details: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(FuzzError::UnsupportedScheme {
                scheme: other.to_string(),
                url: locator,
            })
        }
    }
    let host = url
        .host_str()
        .ok_or_else(|| FuzzError::MissingHost {
            url: locator.clone(),
        })?
        .to_string();
    let port = url.port();
    let tls = url.scheme() == "https";

    // The parsed `Url` serves metadata only; the request-target comes from
    // the substituted locator text so payload bytes reach the output
    // verbatim, without percent-encoding, dot-segment normalization, or
    // fragment splitting.
    let target = request_target(locator_without_scheme(&locator));
    let req = request_text(template, order, assignment, &target, &host, port);
    Ok(OutputRecord {
        host,
        port,
        tls,
        req,
    })
}

/// Everything from the end of the authority onward; `/` when the locator
/// has no path.
fn request_target(rest: &str) -> String {
    match rest.find(['/', '?']) {
        Some(idx) if rest.as_bytes()[idx] == b'?' => format!("/{}", &rest[idx..]),
        Some(idx) => rest[idx..].to_string(),
        None => "/".to_string(),
    }
}

fn request_text(
    template: &RequestTemplate,
    order: &[String],
    assignment: &Assignment,
    target: &str,
    host: &str,
    port: Option<u16>,
) -> String {
    let mut req = String::new();
    let _ = write!(req, "{} {} HTTP/1.1\r\n", template.method, target);
    match port {
        Some(port) => {
            let _ = write!(req, "Host: {host}:{port}\r\n");
        }
        None => {
            let _ = write!(req, "Host: {host}\r\n");
        }
    }
    for header in &template.headers {
        let _ = write!(req, "{}\r\n", substitute(header, order, assignment));
    }
    if template.body.is_empty() {
        req.push_str("\r\n");
    } else {
        // Content length is the substituted body's byte length, so it must
        // be computed after substitution.
        let body = substitute(&template.body, order, assignment);
        let _ = write!(req, "Content-Length: {}\r\n\r\n{}", body.len(), body);
    }
    req
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(url: &str) -> RequestTemplate {
        RequestTemplate {
            url: url.to_string(),
            method: "GET".to_string(),
            headers: Vec::new(),
            body: String::new(),
        }
    }

    fn assignment(pairs: &[(&str, &str)]) -> Assignment {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn order(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_substitute_replaces_all_occurrences() {
        let result = substitute(
            "/FUZZ/again/FUZZ",
            &order(&["FUZZ"]),
            &assignment(&[("FUZZ", "x")]),
        );
        assert_eq!(result, "/x/again/x");
    }

    #[test]
    fn test_substitute_longest_token_first() {
        // FUZZ is a prefix of FUZZLONG; longest-first order must keep the
        // longer token intact.
        let result = substitute(
            "/FUZZ/FUZZLONG",
            &order(&["FUZZLONG", "FUZZ"]),
            &assignment(&[("FUZZ", "a"), ("FUZZLONG", "bb")]),
        );
        assert_eq!(result, "/a/bb");
    }

    #[test]
    fn test_render_simple_get() {
        let record = render(
            &template("http://example.com/FUZZ"),
            &order(&["FUZZ"]),
            &assignment(&[("FUZZ", "x")]),
        )
        .unwrap();
        assert_eq!(record.host, "example.com");
        assert_eq!(record.port, None);
        assert!(!record.tls);
        assert_eq!(record.req, "GET /x HTTP/1.1\r\nHost: example.com\r\n\r\n");
    }

    #[test]
    fn test_render_body_recomputes_content_length() {
        let mut tpl = template("https://h:8443/p");
        tpl.method = "POST".to_string();
        tpl.body = "id=FUZZ".to_string();
        let record = render(&tpl, &order(&["FUZZ"]), &assignment(&[("FUZZ", "7")])).unwrap();
        assert_eq!(record.host, "h");
        assert_eq!(record.port, Some(8443));
        assert!(record.tls);
        assert_eq!(
            record.req,
            "POST /p HTTP/1.1\r\nHost: h:8443\r\nContent-Length: 4\r\n\r\nid=7"
        );
    }

    #[test]
    fn test_render_default_port_omitted() {
        let record = render(&template("http://example.com:80/"), &[], &Assignment::new()).unwrap();
        assert_eq!(record.port, None);
        assert!(record.req.contains("Host: example.com\r\n"));
    }

    #[test]
    fn test_render_placeholder_in_host() {
        let record = render(
            &template("http://FUZZ.example.com/"),
            &order(&["FUZZ"]),
            &assignment(&[("FUZZ", "dev")]),
        )
        .unwrap();
        assert_eq!(record.host, "dev.example.com");
        assert!(record.req.contains("Host: dev.example.com\r\n"));
    }

    #[test]
    fn test_render_substitutes_headers() {
        let mut tpl = template("http://example.com/");
        tpl.headers = vec!["X-User: FUZZ".to_string()];
        let record = render(&tpl, &order(&["FUZZ"]), &assignment(&[("FUZZ", "alice")])).unwrap();
        assert!(record.req.contains("X-User: alice\r\n"));
    }

    #[test]
    fn test_render_keeps_query() {
        let record = render(
            &template("http://example.com/search?q=FUZZ"),
            &order(&["FUZZ"]),
            &assignment(&[("FUZZ", "term")]),
        )
        .unwrap();
        assert!(record.req.starts_with("GET /search?q=term HTTP/1.1\r\n"));
    }

    #[test]
    fn test_render_target_keeps_word_bytes_verbatim() {
        // Words routinely carry URL-special bytes; none of them may be
        // rewritten on the way to the start-line.
        let cases = [
            ("a b", "GET /a b HTTP/1.1\r\n"),
            ("x#y", "GET /x#y HTTP/1.1\r\n"),
            ("%2e%2e", "GET /%2e%2e HTTP/1.1\r\n"),
        ];
        for (word, start_line) in cases {
            let record = render(
                &template("http://example.com/FUZZ"),
                &order(&["FUZZ"]),
                &assignment(&[("FUZZ", word)]),
            )
            .unwrap();
            assert!(
                record.req.starts_with(start_line),
                "word {word:?} rendered as {:?}",
                record.req
            );
        }
    }

    #[test]
    fn test_render_target_keeps_dot_segments() {
        let record = render(
            &template("http://example.com/a/FUZZ"),
            &order(&["FUZZ"]),
            &assignment(&[("FUZZ", "../../etc/passwd")]),
        )
        .unwrap();
        assert!(record
            .req
            .starts_with("GET /a/../../etc/passwd HTTP/1.1\r\n"));
    }

    #[test]
    fn test_render_target_defaults_to_slash() {
        let record = render(&template("http://example.com"), &[], &Assignment::new()).unwrap();
        assert!(record.req.starts_with("GET / HTTP/1.1\r\n"));
    }

    #[test]
    fn test_render_target_query_without_path() {
        let record = render(
            &template("http://example.com?q=FUZZ"),
            &order(&["FUZZ"]),
            &assignment(&[("FUZZ", "1")]),
        )
        .unwrap();
        assert!(record.req.starts_with("GET /?q=1 HTTP/1.1\r\n"));
    }

    #[test]
    fn test_render_rejects_unsupported_scheme() {
        let err = render(&template("ftp://example.com/"), &[], &Assignment::new()).unwrap_err();
        assert!(matches!(err, FuzzError::UnsupportedScheme { .. }));
    }

    #[test]
    fn test_render_rejects_garbage_locator() {
        let err = render(&template("not a url"), &[], &Assignment::new()).unwrap_err();
        assert!(matches!(err, FuzzError::InvalidUrl { .. }));
    }

    #[test]
    fn test_record_json_shape() {
        let record = OutputRecord {
            host: "example.com".to_string(),
            port: None,
            tls: false,
            req: "GET / HTTP/1.1\r\nHost: example.com\r\n\r\n".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            "{\"host\":\"example.com\",\"tls\":false,\"req\":\"GET / HTTP/1.1\\r\\nHost: example.com\\r\\n\\r\\n\"}"
        );
    }

    #[test]
    fn test_record_json_includes_port_when_set() {
        let record = OutputRecord {
            host: "h".to_string(),
            port: Some(8443),
            tls: true,
            req: String::new(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"port\":8443"));
    }
}
