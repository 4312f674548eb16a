use tonic::metadata::MetadataValue;
use tonic::{Code, Status};
use triage_core::{
    Matchers, REQUEST_ID_HEADER, RequestContext, Surface, is_conflict, is_not_found, is_validation,
};

use crate::ValidationStatusMatcher;

/// gRPC status surface
#[derive(Debug, Clone, Copy, Default)]
pub struct Grpc;

impl Surface for Grpc {
    type Code = Code;
    type Payload = Status;

    const NAME: &'static str = "grpc";
    const INTERNAL: Code = Code::Internal;

    fn payload(ctx: &RequestContext, code: Code, message: &str) -> Status {
        with_request_id(ctx, Status::new(code, message))
    }

    fn default_matchers() -> Matchers<Self> {
        Matchers::new()
            .with_code(Code::NotFound, is_not_found)
            .with(ValidationStatusMatcher)
            .with_code(Code::InvalidArgument, is_validation)
            .with_code(Code::FailedPrecondition, is_conflict)
    }
}

/// Echo the request's trace identifier as response metadata
pub(crate) fn with_request_id(ctx: &RequestContext, mut status: Status) -> Status {
    let Some(trace_id) = ctx.trace_id.as_deref() else {
        return status;
    };

    match MetadataValue::try_from(trace_id) {
        Ok(value) => {
            status.metadata_mut().insert(REQUEST_ID_HEADER, value);
        }
        Err(_) => tracing::debug!(trace_id, "trace id is not valid metadata, omitting it"),
    }

    status
}
