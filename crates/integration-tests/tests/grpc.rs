mod harness;

use harness::service::UserService;
use tonic::{Code, Request};
use tonic_types::StatusExt;
use triage_grpc::StatusConverter;

fn service() -> UserService {
    harness::init_tracing();
    UserService::new(StatusConverter::with_defaults())
}

#[test]
fn known_user_resolves() {
    let response = service().get_name(Request::new(1)).unwrap();
    assert_eq!(response.into_inner(), "Ada");
}

#[test]
fn missing_user_is_not_found() {
    let mut request = Request::new(42);
    request.metadata_mut().insert("x-request-id", "req-42".parse().unwrap());

    let status = service().get_name(request).unwrap_err();

    assert_eq!(status.code(), Code::NotFound);
    assert_eq!(status.message(), "user 42 not found");
    assert_eq!(
        status.metadata().get("x-request-id").and_then(|value| value.to_str().ok()),
        Some("req-42")
    );
}

#[test]
fn invalid_name_carries_bad_request_details() {
    let status = service().create(Request::new((2, String::new()))).unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
    assert_eq!(status.message(), "invalid user");

    let details = status.get_details_bad_request().unwrap();
    assert_eq!(details.field_violations.len(), 1);
    assert_eq!(details.field_violations[0].field, "name");
    assert_eq!(details.field_violations[0].description, "is required");
}

#[test]
fn duplicate_user_is_failed_precondition() {
    let status = service().create(Request::new((1, "Ada".to_owned()))).unwrap_err();

    assert_eq!(status.code(), Code::FailedPrecondition);
    assert_eq!(status.message(), "user 1 already exists");
}

#[test]
fn created_user_can_be_read_back() {
    let service = service();
    service.create(Request::new((3, "Grace".to_owned()))).unwrap();

    assert_eq!(service.get_name(Request::new(3)).unwrap().into_inner(), "Grace");
}
