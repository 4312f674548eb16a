use std::error::Error;
use std::fmt;

use indexmap::IndexMap;

/// Field name to ordered violation messages
pub type Violations = IndexMap<String, Vec<String>>;

/// Upper bound on how many links of a cause chain are inspected
pub const MAX_CAUSE_DEPTH: usize = 64;

/// Capabilities an error exposes to the conversion engine
///
/// Every capability defaults to `None`, meaning the error has no opinion.
/// `Some(false)` is an explicit answer and stops the cause-chain walk for
/// that capability just like `Some(true)` does.
pub trait Classify: Error {
    /// The requested resource does not exist
    fn not_found(&self) -> Option<bool> {
        None
    }

    /// The input failed semantic validation
    fn validation(&self) -> Option<bool> {
        None
    }

    /// The request itself is malformed
    fn bad_request(&self) -> Option<bool> {
        None
    }

    /// The request conflicts with the current state of a resource
    fn conflict(&self) -> Option<bool> {
        None
    }

    /// The error is meant to be returned to the caller as is
    fn service_error(&self) -> Option<bool> {
        None
    }

    /// Legacy spelling of [`Classify::service_error`]
    #[deprecated(note = "expose `service_error` instead")]
    fn client_error(&self) -> Option<bool> {
        None
    }

    /// Per-field violations attached to a validation failure
    fn violations(&self) -> Option<&Violations> {
        None
    }

    /// The wrapped error, when it takes part in classification
    fn classified_cause(&self) -> Option<&dyn Classify> {
        None
    }
}

/// Iterate over an error and its classified causes, outermost first
///
/// The walk ends after [`MAX_CAUSE_DEPTH`] links, which also bounds chains
/// that loop back on themselves.
pub fn chain(err: &dyn Classify) -> Chain<'_> {
    Chain {
        next: Some(err),
        depth: 0,
    }
}

/// Iterator returned by [`chain`]
pub struct Chain<'a> {
    next: Option<&'a dyn Classify>,
    depth: usize,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a dyn Classify;

    fn next(&mut self) -> Option<Self::Item> {
        if self.depth >= MAX_CAUSE_DEPTH {
            return None;
        }

        let current = self.next.take()?;
        self.depth += 1;
        self.next = current.classified_cause();

        Some(current)
    }
}

/// Resolve a capability against the first link that exposes it
pub(crate) fn lookup(err: &dyn Classify, capability: impl Fn(&dyn Classify) -> Option<bool>) -> bool {
    chain(err).find_map(capability).unwrap_or(false)
}

/// Extract the first violation map found along the cause chain
pub fn violations(err: &dyn Classify) -> Option<&Violations> {
    chain(err).find_map(|link| link.violations())
}

/// Whether any link of the cause chain carries a violation map
pub fn has_violations(err: &dyn Classify) -> bool {
    violations(err).is_some()
}

/// Adapter for errors that expose no capabilities
///
/// Lets plain library errors flow through the engine, where they always take
/// the fallback path unless a custom matcher inspects them.
#[derive(Debug)]
pub struct Opaque<E>(pub E);

impl<E: fmt::Display> fmt::Display for Opaque<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<E: Error> Error for Opaque<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.0.source()
    }
}

impl<E: Error> Classify for Opaque<E> {}

impl Classify for std::io::Error {}
