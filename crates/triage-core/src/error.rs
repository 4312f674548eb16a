use std::error::Error;
use std::fmt;

use crate::classify::{Classify, Violations};
use crate::kind::ErrorKind;

type Source = Box<dyn Classify + Send + Sync>;

/// Ready-made classified error for business logic
///
/// Carries at most one [`ErrorKind`], a client-safe message, optional
/// per-field violations and an optional classified source. Errors built
/// without a kind classify as nothing themselves but still expose whatever
/// their source exposes.
#[derive(Debug)]
pub struct ServiceError {
    kind: Option<ErrorKind>,
    message: String,
    violations: Option<Violations>,
    source: Option<Source>,
}

impl ServiceError {
    /// Unclassified error with a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: None,
            message: message.into(),
            violations: None,
            source: None,
        }
    }

    /// Error of the given kind
    pub fn with_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind: Some(kind),
            ..Self::new(message)
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::NotFound, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Validation, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::BadRequest, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Conflict, message)
    }

    pub fn service(message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::ServiceError, message)
    }

    /// Record a violation against a field, keeping insertion order
    #[must_use]
    pub fn with_violation(mut self, field: impl Into<String>, violation: impl Into<String>) -> Self {
        self.violations
            .get_or_insert_with(Violations::new)
            .entry(field.into())
            .or_default()
            .push(violation.into());
        self
    }

    /// Replace the violation map wholesale
    #[must_use]
    pub fn with_violations(mut self, violations: Violations) -> Self {
        self.violations = Some(violations);
        self
    }

    /// Attach the error this one wraps
    #[must_use]
    pub fn with_source(mut self, source: impl Classify + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub const fn kind(&self) -> Option<ErrorKind> {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn answers(&self, kind: ErrorKind) -> Option<bool> {
        (self.kind == Some(kind)).then_some(true)
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref().map(|source| source as &(dyn Error + 'static))
    }
}

impl Classify for ServiceError {
    fn not_found(&self) -> Option<bool> {
        self.answers(ErrorKind::NotFound)
    }

    fn validation(&self) -> Option<bool> {
        self.answers(ErrorKind::Validation)
    }

    fn bad_request(&self) -> Option<bool> {
        self.answers(ErrorKind::BadRequest)
    }

    fn conflict(&self) -> Option<bool> {
        self.answers(ErrorKind::Conflict)
    }

    fn service_error(&self) -> Option<bool> {
        self.answers(ErrorKind::ServiceError)
    }

    fn violations(&self) -> Option<&Violations> {
        self.violations.as_ref()
    }

    fn classified_cause(&self) -> Option<&dyn Classify> {
        self.source.as_deref().map(|source| source as &dyn Classify)
    }
}
