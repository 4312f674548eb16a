use http::StatusCode;
use triage_core::{Classify, Convert, Matcher, RequestContext, has_violations, is_validation, violations};

use crate::{Http, Problem};

/// Matches validation errors that carry field violations
///
/// Produces a [`Problem::validation`] document listing every violation.
/// Validation errors without a violation map are left to later matchers,
/// so this one has to precede any plain validation matcher in a chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationProblemMatcher;

impl Matcher<Http> for ValidationProblemMatcher {
    fn matches(&self, err: &dyn Classify) -> bool {
        is_validation(err) && has_violations(err)
    }

    fn converter(&self) -> Option<&dyn Convert<Http>> {
        Some(self)
    }
}

impl Convert<Http> for ValidationProblemMatcher {
    fn convert(&self, ctx: &RequestContext, err: &dyn Classify) -> Problem {
        let problem = violations(err).map_or_else(
            || Problem::detailed(StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            |violations| Problem::validation(err.to_string(), violations.clone()),
        );

        problem.with_context(ctx)
    }
}
