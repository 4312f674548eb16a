use serde::Deserialize;

use crate::classify::{Classify, lookup};
use crate::matcher::ErrorMatcher;

/// Whether the error reports a missing resource
pub fn is_not_found(err: &dyn Classify) -> bool {
    lookup(err, |link| link.not_found())
}

/// Whether the error reports a validation failure
pub fn is_validation(err: &dyn Classify) -> bool {
    lookup(err, |link| link.validation())
}

/// Whether the error reports a malformed request
pub fn is_bad_request(err: &dyn Classify) -> bool {
    lookup(err, |link| link.bad_request())
}

/// Whether the error reports a state conflict
pub fn is_conflict(err: &dyn Classify) -> bool {
    lookup(err, |link| link.conflict())
}

/// Whether the error should be surfaced to the caller as is
///
/// A link answers through either [`Classify::service_error`] or the legacy
/// [`Classify::client_error`] capability, the former taking precedence.
#[allow(deprecated)]
pub fn is_service_error(err: &dyn Classify) -> bool {
    lookup(err, |link| link.service_error().or_else(|| link.client_error()))
}

/// Legacy name of [`is_service_error`]
#[deprecated(note = "use `is_service_error` instead")]
pub fn is_client_error(err: &dyn Classify) -> bool {
    is_service_error(err)
}

/// Semantic error kinds recognized by the built-in predicates
///
/// Each kind is itself an [`ErrorMatcher`], so it can be placed straight
/// into a matcher chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Validation,
    BadRequest,
    Conflict,
    #[serde(alias = "client_error")]
    ServiceError,
}

impl ErrorKind {
    /// Every kind, in the order [`ErrorKind::of`] checks them
    pub const ALL: [Self; 5] = [
        Self::NotFound,
        Self::Validation,
        Self::BadRequest,
        Self::Conflict,
        Self::ServiceError,
    ];

    /// Run the predicate backing this kind
    pub fn is(self, err: &dyn Classify) -> bool {
        match self {
            Self::NotFound => is_not_found(err),
            Self::Validation => is_validation(err),
            Self::BadRequest => is_bad_request(err),
            Self::Conflict => is_conflict(err),
            Self::ServiceError => is_service_error(err),
        }
    }

    /// First kind the error classifies as, if any
    pub fn of(err: &dyn Classify) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.is(err))
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::BadRequest => "bad_request",
            Self::Conflict => "conflict",
            Self::ServiceError => "service_error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name that is not one of the [`ErrorKind`] identifiers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error kind `{0}` (expected one of not_found, validation, bad_request, conflict, service_error)")]
pub struct UnknownKind(pub String);

impl std::str::FromStr for ErrorKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client_error" => Ok(Self::ServiceError),
            _ => Self::ALL
                .into_iter()
                .find(|kind| kind.as_str() == s)
                .ok_or_else(|| UnknownKind(s.to_owned())),
        }
    }
}

impl ErrorMatcher for ErrorKind {
    fn matches(&self, err: &dyn Classify) -> bool {
        self.is(err)
    }
}
