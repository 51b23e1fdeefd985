//! Classification of failed API exchanges.

use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// A request that did not produce a decodable success response, as captured at
/// the transport boundary.
#[derive(Debug, Clone)]
pub struct FailedResponse {
    /// Full request URL, for display.
    pub url: String,
    /// HTTP status, or `None` when the request never reached the server.
    pub status: Option<u16>,
    /// Canonical reason phrase for `status`, e.g. `Forbidden`.
    pub status_text: String,
    /// `Content-Type` of the response body, if any.
    pub content_type: Option<String>,
    /// Raw response body, if any.
    pub body: String,
}

impl FailedResponse {
    /// A request that failed before any response arrived.
    pub fn unreachable(url: String, cause: impl std::fmt::Display) -> Self {
        Self {
            url,
            status: None,
            status_text: String::new(),
            content_type: None,
            body: cause.to_string(),
        }
    }

    /// The structured `message` field of a JSON error payload, if present.
    pub fn error_message(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(&self.body).ok()?;
        Some(value.get("message")?.as_str()?.to_owned())
    }

    /// Human-readable rendering for the notification sink.
    pub fn display_message(&self) -> String {
        match self.status {
            None => format!("Cannot reach {}", self.url),
            Some(status)
                if self
                    .content_type
                    .as_deref()
                    .is_some_and(|ct| ct.starts_with("text/html")) =>
            {
                // During auth problems, proxies may answer with full HTML pages
                // even though the request accepts JSON only. The raw document
                // carries no diagnostic value, so only the status is shown.
                format!(
                    "Received status {} {} from {}",
                    status, self.status_text, self.url
                )
            }
            Some(_) => {
                let message = self.error_message().unwrap_or_else(|| self.body.clone());
                format!("{} (from {})", message, self.url)
            }
        }
    }
}

impl std::fmt::Display for FailedResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_message())
    }
}

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AccessDenied,
    Generic,
}

/// All errors surfaced by API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 404 — the resource does not exist. Expected for optional lookups, which
    /// substitute a default value instead of failing.
    #[error("not found: {0}")]
    NotFound(FailedResponse),

    /// 403 on an approval-gated resource. Distinguishable from [`ApiError::Response`]
    /// so callers can offer an approval-request flow instead of a failure banner.
    #[error("access denied: {message}")]
    AccessDenied {
        message: String,
        response: FailedResponse,
    },

    /// Any other failed exchange, including network-level failures.
    #[error("{0}")]
    Response(FailedResponse),

    /// The server broke the API contract, e.g. an undecodable success payload
    /// or a nominally successful initiate call without an operation id.
    #[error("API contract violation: {0}")]
    Contract(String),
}

impl ApiError {
    /// Classifies a failed exchange by status code.
    pub fn classify(response: FailedResponse) -> Self {
        match response.status {
            Some(404) => ApiError::NotFound(response),
            Some(403) => ApiError::AccessDenied {
                message: response
                    .error_message()
                    .unwrap_or_else(|| response.body.clone()),
                response,
            },
            _ => ApiError::Response(response),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::AccessDenied { .. } => ErrorKind::AccessDenied,
            ApiError::Response(_) | ApiError::Contract(_) => ErrorKind::Generic,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_access_denied(&self) -> bool {
        self.kind() == ErrorKind::AccessDenied
    }

    /// Human-readable rendering for the notification sink.
    pub fn display_message(&self) -> String {
        match self {
            ApiError::NotFound(response) | ApiError::Response(response) => {
                response.display_message()
            }
            ApiError::AccessDenied { response, .. } => response.display_message(),
            ApiError::Contract(message) => message.clone(),
        }
    }
}

/// Replaces a `NotFound` failure with `replacement`, passing everything else
/// through unchanged. Used by optional single-resource lookups.
pub fn not_found_to<T>(result: ApiResult<T>, replacement: T) -> ApiResult<T> {
    match result {
        Err(err) if err.is_not_found() => Ok(replacement),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(status: u16, body: &str) -> FailedResponse {
        FailedResponse {
            url: "https://server/api/v2/hunts/H1/results".to_owned(),
            status: Some(status),
            status_text: "Error".to_owned(),
            content_type: Some("application/json".to_owned()),
            body: body.to_owned(),
        }
    }

    #[test]
    fn status_404_classifies_as_not_found() {
        let err = ApiError::classify(failed(404, "{}"));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn status_403_classifies_as_access_denied_with_message() {
        let err = ApiError::classify(failed(403, r#"{"message": "No approval found."}"#));
        match &err {
            ApiError::AccessDenied { message, .. } => assert_eq!(message, "No approval found."),
            other => panic!("expected AccessDenied, got {other:?}"),
        }
        assert_eq!(err.kind(), ErrorKind::AccessDenied);
    }

    #[test]
    fn other_statuses_classify_as_generic() {
        let err = ApiError::classify(failed(500, "boom"));
        assert_eq!(err.kind(), ErrorKind::Generic);
    }

    #[test]
    fn network_failures_render_cannot_reach() {
        let response = FailedResponse::unreachable(
            "https://server/api/v2/clients".to_owned(),
            "connection refused",
        );
        assert_eq!(
            response.display_message(),
            "Cannot reach https://server/api/v2/clients"
        );
    }

    #[test]
    fn html_bodies_render_only_the_status() {
        let response = FailedResponse {
            url: "https://server/api/v2/clients".to_owned(),
            status: Some(302),
            status_text: "Found".to_owned(),
            content_type: Some("text/html; charset=utf-8".to_owned()),
            body: "<html>login page</html>".to_owned(),
        };
        assert_eq!(
            response.display_message(),
            "Received status 302 Found from https://server/api/v2/clients"
        );
    }

    #[test]
    fn structured_messages_render_with_the_address() {
        let response = failed(500, r#"{"message": "internal error"}"#);
        assert_eq!(
            response.display_message(),
            "internal error (from https://server/api/v2/hunts/H1/results)"
        );
    }

    #[test]
    fn not_found_substitution_keeps_other_errors() {
        let ok: ApiResult<Option<i32>> = not_found_to(
            Err(ApiError::classify(failed(404, "{}"))),
            None,
        );
        assert!(matches!(ok, Ok(None)));

        let err: ApiResult<Option<i32>> = not_found_to(
            Err(ApiError::classify(failed(500, "boom"))),
            None,
        );
        assert!(err.is_err());
    }
}
