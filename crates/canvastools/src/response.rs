use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct ErrorBody {
    detail: Value,
}

/// The `detail` field of an error body, if there is one.
///
/// Validation failures send a list of objects rather than a string; those
/// are passed through as compact JSON.
pub(crate) fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        Value::Null => None,
        Value::String(detail) => Some(detail),
        other => Some(other.to_string()),
    }
}

/// Message surfaced for a non-success response
pub(crate) fn failure_message(status: u16, body: &str) -> String {
    error_detail(body).unwrap_or_else(|| format!("Request failed with status code {}", status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_string_is_used() {
        assert_eq!(
            failure_message(500, r#"{"detail": "All AI providers failed."}"#),
            "All AI providers failed."
        );
    }

    #[test]
    fn falls_back_to_status() {
        assert_eq!(
            failure_message(502, "<html>Bad Gateway</html>"),
            "Request failed with status code 502"
        );
        assert_eq!(
            failure_message(500, r#"{"detail": null}"#),
            "Request failed with status code 500"
        );
    }

    #[test]
    fn structured_detail_is_kept() {
        let body = r#"{"detail":[{"loc":["body","content"],"msg":"field required"}]}"#;

        let detail = error_detail(body).unwrap();

        assert!(detail.contains("field required"));
    }
}
