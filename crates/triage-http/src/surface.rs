use http::StatusCode;
use triage_core::{Matchers, RequestContext, Surface, is_bad_request, is_conflict, is_not_found, is_validation};

use crate::{Problem, ValidationProblemMatcher};

/// HTTP problem details surface
#[derive(Debug, Clone, Copy, Default)]
pub struct Http;

impl Surface for Http {
    type Code = StatusCode;
    type Payload = Problem;

    const NAME: &'static str = "http";
    const INTERNAL: StatusCode = StatusCode::INTERNAL_SERVER_ERROR;

    fn payload(ctx: &RequestContext, code: StatusCode, message: &str) -> Problem {
        Problem::detailed(code, message).with_context(ctx)
    }

    fn default_matchers() -> Matchers<Self> {
        Matchers::new()
            .with_code(StatusCode::NOT_FOUND, is_not_found)
            .with(ValidationProblemMatcher)
            .with_code(StatusCode::UNPROCESSABLE_ENTITY, is_validation)
            .with_code(StatusCode::BAD_REQUEST, is_bad_request)
            .with_code(StatusCode::CONFLICT, is_conflict)
    }
}
