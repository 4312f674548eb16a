use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use triage_core::{RequestContext, Violations};

/// Media type of RFC 7807 JSON documents
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// Problem type used when no more specific type URI applies
pub const ABOUT_BLANK: &str = "about:blank";

/// RFC 7807 problem details document
///
/// Validation problems additionally carry the per-field `violations`
/// extension member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// URI reference identifying the problem type
    #[serde(rename = "type", default = "about_blank")]
    pub type_uri: String,
    /// Short summary of the problem type
    pub title: String,
    /// HTTP status code
    pub status: u16,
    /// Explanation specific to this occurrence
    #[serde(default)]
    pub detail: String,
    /// URI reference of the failing request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Trace identifier of the failing request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Field name to violation messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violations: Option<Violations>,
}

fn about_blank() -> String {
    ABOUT_BLANK.to_owned()
}

impl Problem {
    /// Problem for a status with its canonical reason as title
    pub fn new(status: StatusCode) -> Self {
        Self {
            type_uri: about_blank(),
            title: status.canonical_reason().unwrap_or("Unknown Status").to_owned(),
            status: status.as_u16(),
            detail: String::new(),
            instance: None,
            trace_id: None,
            violations: None,
        }
    }

    /// Problem for a status with an occurrence-specific detail
    pub fn detailed(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            ..Self::new(status)
        }
    }

    /// `422 Unprocessable Entity` problem listing field violations
    pub fn validation(detail: impl Into<String>, violations: Violations) -> Self {
        Self {
            violations: Some(violations),
            ..Self::detailed(StatusCode::UNPROCESSABLE_ENTITY, detail)
        }
    }

    #[must_use]
    pub fn with_type(mut self, type_uri: impl Into<String>) -> Self {
        self.type_uri = type_uri.into();
        self
    }

    #[must_use]
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Copy the request's instance and trace identifier onto the problem
    #[must_use]
    pub fn with_context(mut self, ctx: &RequestContext) -> Self {
        if let Some(instance) = &ctx.instance {
            self.instance = Some(instance.clone());
        }
        if let Some(trace_id) = &ctx.trace_id {
            self.trace_id = Some(trace_id.clone());
        }
        self
    }

    /// Status as a typed code, `500` if the stored number is not a status
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = (status, Json(self)).into_response();

        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_PROBLEM_JSON));

        response
    }
}
