use crate::classify::Classify;

/// Predicate deciding whether an error satisfies some condition
///
/// Matchers are stateless: the answer depends on the error alone. Plain
/// functions such as [`crate::is_not_found`] and closures over
/// `&dyn Classify` are matchers, as is every [`crate::ErrorKind`].
pub trait ErrorMatcher: Send + Sync {
    fn matches(&self, err: &dyn Classify) -> bool;
}

impl<F> ErrorMatcher for F
where
    F: Fn(&dyn Classify) -> bool + Send + Sync,
{
    fn matches(&self, err: &dyn Classify) -> bool {
        self(err)
    }
}
