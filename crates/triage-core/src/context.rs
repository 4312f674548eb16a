use http::{HeaderMap, Uri};

/// Header carrying a caller-assigned request identifier
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// W3C trace context header
pub const TRACEPARENT_HEADER: &str = "traceparent";

/// Request-scoped data available to converters
///
/// Conversion never branches on the context; it only lets converters
/// decorate payloads with identifiers of the request that failed.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Identifier correlating the failure with traces and logs
    pub trace_id: Option<String>,
    /// URI reference of the failed request, used as the problem instance
    pub instance: Option<String>,
    /// Arbitrary typed request data for custom converters
    pub extensions: http::Extensions,
}

impl RequestContext {
    /// Context for conversions happening outside a request
    pub fn empty() -> Self {
        Self::default()
    }

    /// Capture the path and trace identifier of an incoming HTTP request
    pub fn from_parts(parts: &http::request::Parts) -> Self {
        Self {
            extensions: parts.extensions.clone(),
            ..Self::from_request(&parts.uri, &parts.headers)
        }
    }

    /// Capture the path and trace identifier from a URI and header map
    ///
    /// `x-request-id` wins over the trace-id segment of `traceparent`.
    pub fn from_request(uri: &Uri, headers: &HeaderMap) -> Self {
        Self {
            instance: Some(uri.path().to_owned()),
            ..Self::from_headers(headers)
        }
    }

    /// Capture only the trace identifier, for transports without a path
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            trace_id: trace_id_from_headers(headers),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    #[must_use]
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Typed request data inserted by middleware
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions.get::<T>()
    }
}

fn trace_id_from_headers(headers: &HeaderMap) -> Option<String> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    if let Some(request_id) = header(REQUEST_ID_HEADER) {
        return Some(request_id.to_owned());
    }

    // version-traceid-parentid-flags
    let traceparent = header(TRACEPARENT_HEADER)?;
    let trace_id = traceparent.split('-').nth(1)?;

    (trace_id.len() == 32 && trace_id.bytes().all(|b| b.is_ascii_hexdigit())).then(|| trace_id.to_owned())
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        pairs
            .iter()
            .map(|(name, value)| {
                (
                    http::HeaderName::from_static(name),
                    HeaderValue::from_static(value),
                )
            })
            .collect()
    }

    #[test]
    fn empty_context_has_nothing() {
        let ctx = RequestContext::empty();
        assert!(ctx.trace_id.is_none());
        assert!(ctx.instance.is_none());
        assert!(ctx.extensions.is_empty());
    }

    #[test]
    fn request_id_header_is_preferred() {
        let headers = headers(&[
            ("x-request-id", "req-1"),
            ("traceparent", "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"),
        ]);

        let ctx = RequestContext::from_request(&Uri::from_static("/users/42?expand=true"), &headers);
        assert_eq!(ctx.trace_id.as_deref(), Some("req-1"));
        assert_eq!(ctx.instance.as_deref(), Some("/users/42"));
    }

    #[test]
    fn traceparent_trace_id_is_extracted() {
        let headers = headers(&[(
            "traceparent",
            "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01",
        )]);

        let ctx = RequestContext::from_request(&Uri::from_static("/"), &headers);
        assert_eq!(ctx.trace_id.as_deref(), Some("4bf92f3577b34da6a3ce929d0e0e4736"));
    }

    #[test]
    fn headers_alone_leave_instance_empty() {
        let ctx = RequestContext::from_headers(&headers(&[("x-request-id", "  req-2  ")]));
        assert_eq!(ctx.trace_id.as_deref(), Some("req-2"));
        assert!(ctx.instance.is_none());
    }

    #[test]
    fn malformed_traceparent_is_ignored() {
        let headers = headers(&[("traceparent", "garbage")]);
        let ctx = RequestContext::from_request(&Uri::from_static("/"), &headers);
        assert!(ctx.trace_id.is_none());
    }

    #[test]
    fn extensions_are_carried_over_from_parts() {
        #[derive(Clone, Debug, PartialEq)]
        struct Tenant(&'static str);

        let (mut parts, ()) = http::Request::builder()
            .uri("/orders")
            .body(())
            .unwrap()
            .into_parts();
        parts.extensions.insert(Tenant("acme"));

        let ctx = RequestContext::from_parts(&parts);
        assert_eq!(ctx.get::<Tenant>(), Some(&Tenant("acme")));
        assert_eq!(ctx.instance.as_deref(), Some("/orders"));
    }
}
