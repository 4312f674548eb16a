use tonic::{Code, Status};
use tonic_types::{ErrorDetails, FieldViolation, StatusExt};
use triage_core::{Classify, Convert, Matcher, RequestContext, Violations, has_violations, is_validation, violations};

use crate::Grpc;
use crate::surface::with_request_id;

/// Matches validation errors that carry field violations
///
/// Answers with `InvalidArgument` and a `google.rpc.BadRequest` detail
/// holding one field violation per message. Validation errors without
/// violations fall through to the plain `InvalidArgument` matcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationStatusMatcher;

impl Matcher<Grpc> for ValidationStatusMatcher {
    fn matches(&self, err: &dyn Classify) -> bool {
        is_validation(err) && has_violations(err)
    }

    fn converter(&self) -> Option<&dyn Convert<Grpc>> {
        Some(self)
    }
}

impl Convert<Grpc> for ValidationStatusMatcher {
    fn convert(&self, ctx: &RequestContext, err: &dyn Classify) -> Status {
        let message = err.to_string();

        let status = match violations(err) {
            Some(violations) => Status::with_error_details(
                Code::InvalidArgument,
                message,
                ErrorDetails::with_bad_request(field_violations(violations)),
            ),
            None => Status::new(Code::InvalidArgument, message),
        };

        with_request_id(ctx, status)
    }
}

/// Flatten a violation map, keeping field order and per-field message order
fn field_violations(violations: &Violations) -> Vec<FieldViolation> {
    violations
        .iter()
        .flat_map(|(field, messages)| {
            messages
                .iter()
                .map(move |description| FieldViolation::new(field.as_str(), description.as_str()))
        })
        .collect()
}
