//! gRPC surface for triage: errors become `tonic::Status` values
//!
//! Return `converter.convert(&ctx, &err)` from a service method's error
//! branch to get a status with the right code, a client-safe message and,
//! for validation failures, a `google.rpc.BadRequest` detail.

#![allow(clippy::must_use_candidate)]

mod surface;
mod validation;

use tonic::Code;
use triage_config::GrpcConfig;
use triage_core::{Converter, ConverterConfig, Matchers, RequestContext};

pub use surface::Grpc;
pub use validation::ValidationStatusMatcher;

/// Engine producing gRPC statuses
pub type StatusConverter = Converter<Grpc>;

/// Build options for a [`StatusConverter`]
pub type StatusConverterConfig = ConverterConfig<Grpc>;

/// Matcher chain for the gRPC surface
pub type StatusMatchers = Matchers<Grpc>;

/// Turn configured gRPC rules into converter options
///
/// Rules keep file order. Codes are expected to have passed
/// `Config::validate`; anything else maps to `Unknown`.
pub fn config_from(config: &GrpcConfig) -> StatusConverterConfig {
    let matchers = config.rules.iter().fold(Matchers::<Grpc>::new(), |matchers, rule| {
        matchers.with_code(Code::from_i32(rule.code), rule.kind)
    });

    ConverterConfig {
        mode: config.mode,
        matchers,
        ..ConverterConfig::default()
    }
}

/// Context for an incoming call, trace identifier taken from its metadata
pub fn request_context<T>(request: &tonic::Request<T>) -> RequestContext {
    RequestContext::from_headers(&request.metadata().clone().into_headers())
}
