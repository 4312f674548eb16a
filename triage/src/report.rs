use std::fmt::{self, Write};

use tonic::Status;
use tonic_types::StatusExt;
use triage_core::{Classify, ErrorKind, Matchers, RequestContext, Surface};
use triage_grpc::StatusConverter;
use triage_http::ProblemConverter;

/// Describe the resolved chain of one surface, one line per matcher
pub fn chain<S: Surface>(matchers: &Matchers<S>) -> String {
    let mut out = format!("{} ({} matchers)\n", S::NAME, matchers.len());

    for (index, matcher) in matchers.iter().enumerate() {
        let strategy = match (matcher.converter(), matcher.code()) {
            (Some(_), _) => "converter".to_owned(),
            (None, Some(code)) => format!("code {code:?}"),
            (None, None) => "generic".to_owned(),
        };
        let _ = writeln!(out, "  {index:>2}  {strategy}");
    }

    if matchers.is_empty() {
        out.push_str("  (empty, every error takes the fallback)\n");
    }

    out
}

/// Convert one error through both surfaces and describe the results
pub fn explain(grpc: &StatusConverter, http: &ProblemConverter, err: &dyn Classify) -> anyhow::Result<String> {
    let ctx = RequestContext::empty();
    let mut out = String::new();

    let kind = ErrorKind::of(err).map_or("unclassified", ErrorKind::as_str);
    writeln!(out, "kind: {kind}")?;

    let status = grpc.convert(&ctx, err);
    writeln!(out, "grpc: {}", GrpcSummary(&status))?;

    let problem = http.convert(&ctx, err);
    writeln!(out, "http: {}", serde_json::to_string_pretty(&problem)?)?;

    Ok(out)
}

struct GrpcSummary<'a>(&'a Status);

impl fmt::Display for GrpcSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?}", self.0.code(), self.0.message())?;

        if let Some(bad_request) = self.0.get_details_bad_request() {
            for violation in &bad_request.field_violations {
                write!(f, "\n  {}: {}", violation.field, violation.description)?;
            }
        }

        Ok(())
    }
}
