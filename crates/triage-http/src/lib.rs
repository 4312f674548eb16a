//! HTTP surface for triage: errors become RFC 7807 problem documents
//!
//! [`ProblemConverter`] resolves an error against the built-in chain (or a
//! configured one) and returns a [`Problem`], which axum handlers can return
//! directly.

#![allow(clippy::must_use_candidate)]

mod problem;
mod surface;
mod validation;

use triage_config::HttpConfig;
use triage_core::{Converter, ConverterConfig, Matchers};

pub use problem::{ABOUT_BLANK, APPLICATION_PROBLEM_JSON, Problem};
pub use surface::Http;
pub use validation::ValidationProblemMatcher;

/// Engine producing problem documents
pub type ProblemConverter = Converter<Http>;

/// Build options for a [`ProblemConverter`]
pub type ProblemConverterConfig = ConverterConfig<Http>;

/// Matcher chain for the HTTP surface
pub type ProblemMatchers = Matchers<Http>;

/// Turn configured HTTP rules into converter options
///
/// Each rule becomes a status matcher, in file order.
pub fn config_from(config: &HttpConfig) -> ProblemConverterConfig {
    let matchers = config
        .rules
        .iter()
        .fold(Matchers::<Http>::new(), |matchers, rule| matchers.with_code(rule.status, rule.kind));

    ConverterConfig {
        mode: config.mode,
        matchers,
        ..ConverterConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use triage_config::Config;
    use triage_core::{Classify, FALLBACK_MESSAGE, RequestContext, ServiceError, Surface};

    use super::*;

    fn converter(toml: &str) -> ProblemConverter {
        let config = Config::from_toml(toml).unwrap();
        ProblemConverter::new(config_from(&config.http))
    }

    #[test]
    fn empty_config_keeps_builtin_chain() {
        let converter = converter("");
        assert_eq!(converter.matchers().len(), Http::default_matchers().len());
    }

    #[test]
    fn appended_rules_run_after_defaults() {
        let converter = converter(
            r#"
            [[http.rules]]
            kind = "service_error"
            status = 418

            [[http.rules]]
            kind = "not_found"
            status = 410
            "#,
        );

        let ctx = RequestContext::empty();
        let teapot = converter.convert(&ctx, &ServiceError::service("short and stout"));
        assert_eq!(teapot.status_code(), StatusCode::IM_A_TEAPOT);

        // built-in 404 is evaluated first
        let gone = converter.convert(&ctx, &ServiceError::not_found("gone"));
        assert_eq!(gone.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn replaced_rules_drop_defaults() {
        let converter = converter(
            r#"
            [http]
            mode = "replace"

            [[http.rules]]
            kind = "not_found"
            status = 410
            "#,
        );

        let ctx = RequestContext::empty();
        assert_eq!(converter.matchers().len(), 1);
        assert_eq!(
            converter.convert(&ctx, &ServiceError::not_found("gone")).status_code(),
            StatusCode::GONE
        );

        let conflict = converter.convert(&ctx, &ServiceError::conflict("version mismatch"));
        assert_eq!(conflict.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(conflict.detail, FALLBACK_MESSAGE);
    }

    #[test]
    fn conversion_is_deterministic() {
        let converter = ProblemConverter::with_defaults();
        let err = ServiceError::validation("invalid")
            .with_violation("b", "second")
            .with_violation("a", "first");

        let first = converter.convert(&RequestContext::empty(), &err);
        for _ in 0..10 {
            assert_eq!(converter.convert(&RequestContext::empty(), &err), first);
        }

        let violations = first.violations.unwrap();
        let fields: Vec<&str> = violations.keys().map(String::as_str).collect();
        assert_eq!(fields, ["b", "a"]);
    }

    #[test]
    fn custom_predicate_can_be_appended() {
        fn is_timeout(err: &dyn Classify) -> bool {
            err.to_string().contains("timed out")
        }

        let matchers = ProblemMatchers::new().with_code(StatusCode::GATEWAY_TIMEOUT, is_timeout);
        let converter = ProblemConverter::new(ProblemConverterConfig::append(matchers));

        let problem = converter.convert(&RequestContext::empty(), &ServiceError::new("upstream timed out"));
        assert_eq!(problem.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(problem.detail, "upstream timed out");
    }
}
