//! Error classification and the protocol-agnostic conversion engine
//!
//! Business errors expose narrow capabilities through [`Classify`]. Ordered
//! matcher chains map those capabilities to protocol responses, and a
//! [`Converter`] resolves each error to exactly one payload.

#![allow(clippy::must_use_candidate)]

mod classify;
mod context;
mod engine;
mod error;
mod kind;
mod matcher;

pub use classify::{Chain, Classify, MAX_CAUSE_DEPTH, Opaque, Violations, chain, has_violations, violations};
pub use context::{REQUEST_ID_HEADER, RequestContext, TRACEPARENT_HEADER};
pub use engine::{
    CodeMatcher, Convert, ConvertWithCode, Converter, ConverterConfig, DefaultConverter, FALLBACK_MESSAGE, Matcher,
    MatcherMode, Matchers, Predicate, Surface, Unclassified,
};
pub use error::ServiceError;
#[allow(deprecated)]
pub use kind::is_client_error;
pub use kind::{ErrorKind, UnknownKind, is_bad_request, is_conflict, is_not_found, is_service_error, is_validation};
pub use matcher::ErrorMatcher;
