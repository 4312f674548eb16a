use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::classify::Classify;
use crate::context::RequestContext;
use crate::kind::ErrorKind;
use crate::matcher::ErrorMatcher;

/// Message returned for errors no matcher recognized
pub const FALLBACK_MESSAGE: &str = "something went wrong";

/// Stand-in error handed to the code converter on the fallback path
///
/// Keeps the text of unclassified errors out of client responses.
#[derive(Debug, thiserror::Error)]
#[error("{}", FALLBACK_MESSAGE)]
pub struct Unclassified;

impl Classify for Unclassified {}

/// A response protocol the engine can produce payloads for
pub trait Surface: Sized + Send + Sync + 'static {
    /// Protocol status code
    type Code: Copy + PartialEq + fmt::Debug + Send + Sync + 'static;
    /// Response object handed back to the transport
    type Payload;

    /// Short name used in log events
    const NAME: &'static str;
    /// Code for unexpected failures
    const INTERNAL: Self::Code;

    /// Build the plain payload for a code and a client-facing message
    fn payload(ctx: &RequestContext, code: Self::Code, message: &str) -> Self::Payload;

    /// Built-in matcher chain for this protocol
    fn default_matchers() -> Matchers<Self>;
}

/// Builds a payload from an error, choosing the code itself
pub trait Convert<S: Surface>: Send + Sync {
    fn convert(&self, ctx: &RequestContext, err: &dyn Classify) -> S::Payload;
}

/// Builds a payload from an error and an already chosen code
pub trait ConvertWithCode<S: Surface>: Send + Sync {
    fn convert_with_code(&self, ctx: &RequestContext, code: S::Code, err: &dyn Classify) -> S::Payload;
}

/// Converter used when no override is configured
///
/// Renders the error's `Display` output as the message.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConverter;

impl<S: Surface> Convert<S> for DefaultConverter {
    fn convert(&self, ctx: &RequestContext, err: &dyn Classify) -> S::Payload {
        S::payload(ctx, S::INTERNAL, &err.to_string())
    }
}

impl<S: Surface> ConvertWithCode<S> for DefaultConverter {
    fn convert_with_code(&self, ctx: &RequestContext, code: S::Code, err: &dyn Classify) -> S::Payload {
        S::payload(ctx, code, &err.to_string())
    }
}

/// Entry of a matcher chain
///
/// Besides the predicate a matcher may carry a response code, a converter
/// that takes over payload construction, or neither.
pub trait Matcher<S: Surface>: Send + Sync {
    fn matches(&self, err: &dyn Classify) -> bool;

    /// Code to respond with when this matcher wins
    fn code(&self) -> Option<S::Code> {
        None
    }

    /// Converter owning payload construction when this matcher wins
    fn converter(&self) -> Option<&dyn Convert<S>> {
        None
    }
}

impl<S: Surface> Matcher<S> for ErrorKind {
    fn matches(&self, err: &dyn Classify) -> bool {
        self.is(err)
    }
}

/// Matcher pairing a predicate with a fixed response code
pub struct CodeMatcher<S: Surface> {
    code: S::Code,
    predicate: Box<dyn ErrorMatcher>,
}

impl<S: Surface> CodeMatcher<S> {
    pub fn new(code: S::Code, predicate: impl ErrorMatcher + 'static) -> Self {
        Self {
            code,
            predicate: Box::new(predicate),
        }
    }
}

impl<S: Surface> Matcher<S> for CodeMatcher<S> {
    fn matches(&self, err: &dyn Classify) -> bool {
        self.predicate.matches(err)
    }

    fn code(&self) -> Option<S::Code> {
        Some(self.code)
    }
}

impl<S: Surface> fmt::Debug for CodeMatcher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeMatcher").field("code", &self.code).finish_non_exhaustive()
    }
}

/// Matcher carrying only a predicate
///
/// Errors it catches go through the generic converter with the internal
/// code, but keep their own message.
pub struct Predicate<M>(pub M);

impl<S: Surface, M: ErrorMatcher> Matcher<S> for Predicate<M> {
    fn matches(&self, err: &dyn Classify) -> bool {
        self.0.matches(err)
    }
}

/// Ordered matcher chain, evaluated first match wins
pub struct Matchers<S: Surface> {
    entries: Vec<Arc<dyn Matcher<S>>>,
}

impl<S: Surface> Matchers<S> {
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// The surface's built-in chain
    pub fn defaults() -> Self {
        S::default_matchers()
    }

    /// Append a matcher after the ones already registered
    pub fn push(&mut self, matcher: impl Matcher<S> + 'static) {
        self.entries.push(Arc::new(matcher));
    }

    /// Append a matcher that is shared with other chains
    pub fn push_shared(&mut self, matcher: Arc<dyn Matcher<S>>) {
        self.entries.push(matcher);
    }

    #[must_use]
    pub fn with(mut self, matcher: impl Matcher<S> + 'static) -> Self {
        self.push(matcher);
        self
    }

    /// Append a code matcher built from a predicate
    #[must_use]
    pub fn with_code(self, code: S::Code, predicate: impl ErrorMatcher + 'static) -> Self {
        self.with(CodeMatcher::new(code, predicate))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(dyn Matcher<S> + 'static)> {
        self.entries.iter().map(AsRef::as_ref)
    }

    /// Position and matcher of the first entry matching the error
    ///
    /// Entries after the first match are never consulted.
    pub fn resolve(&self, err: &dyn Classify) -> Option<(usize, &dyn Matcher<S>)> {
        self.iter().enumerate().find(|(_, matcher)| matcher.matches(err))
    }
}

impl<S: Surface> Default for Matchers<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Surface> Clone for Matchers<S> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<S: Surface> Extend<Arc<dyn Matcher<S>>> for Matchers<S> {
    fn extend<I: IntoIterator<Item = Arc<dyn Matcher<S>>>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl<S: Surface> FromIterator<Arc<dyn Matcher<S>>> for Matchers<S> {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Matcher<S>>>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<S: Surface> IntoIterator for Matchers<S> {
    type Item = Arc<dyn Matcher<S>>;
    type IntoIter = std::vec::IntoIter<Arc<dyn Matcher<S>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<S: Surface> fmt::Debug for Matchers<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matchers").field("len", &self.len()).finish()
    }
}

/// How configured matchers relate to the surface's built-in chain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherMode {
    /// Built-in matchers first, configured ones after them
    #[default]
    Append,
    /// Only the configured matchers
    Replace,
}

/// Everything a [`Converter`] is built from
pub struct ConverterConfig<S: Surface> {
    /// Relation of `matchers` to the built-in chain
    pub mode: MatcherMode,
    /// Matchers in evaluation order
    pub matchers: Matchers<S>,
    /// Override for matchers that carry neither code nor converter
    pub converter: Option<Arc<dyn Convert<S>>>,
    /// Override for code matchers and the fallback path
    pub code_converter: Option<Arc<dyn ConvertWithCode<S>>>,
}

impl<S: Surface> ConverterConfig<S> {
    /// Built-in chain followed by `matchers`
    pub fn append(matchers: Matchers<S>) -> Self {
        Self {
            mode: MatcherMode::Append,
            matchers,
            ..Self::default()
        }
    }

    /// Exactly `matchers`, without the built-in chain
    pub fn replace(matchers: Matchers<S>) -> Self {
        Self {
            mode: MatcherMode::Replace,
            matchers,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_converter(mut self, converter: impl Convert<S> + 'static) -> Self {
        self.converter = Some(Arc::new(converter));
        self
    }

    #[must_use]
    pub fn with_code_converter(mut self, converter: impl ConvertWithCode<S> + 'static) -> Self {
        self.code_converter = Some(Arc::new(converter));
        self
    }

    /// Use one value for both overrides
    #[must_use]
    pub fn with_converters<C>(mut self, converter: C) -> Self
    where
        C: Convert<S> + ConvertWithCode<S> + 'static,
    {
        let converter = Arc::new(converter);
        self.code_converter = Some(converter.clone());
        self.converter = Some(converter);
        self
    }
}

impl<S: Surface> Default for ConverterConfig<S> {
    fn default() -> Self {
        Self {
            mode: MatcherMode::default(),
            matchers: Matchers::new(),
            converter: None,
            code_converter: None,
        }
    }
}

/// Turns errors into protocol payloads
///
/// Immutable once built, so one instance can be shared by every request
/// handler of a process.
pub struct Converter<S: Surface> {
    matchers: Matchers<S>,
    converter: Arc<dyn Convert<S>>,
    code_converter: Arc<dyn ConvertWithCode<S>>,
}

impl<S: Surface> Converter<S> {
    pub fn new(config: ConverterConfig<S>) -> Self {
        let ConverterConfig {
            mode,
            matchers,
            converter,
            code_converter,
        } = config;

        let matchers = match mode {
            MatcherMode::Append => {
                let mut chain = S::default_matchers();
                chain.extend(matchers);
                chain
            }
            MatcherMode::Replace => matchers,
        };

        tracing::debug!(
            surface = S::NAME,
            ?mode,
            matchers = matchers.len(),
            "error converter configured"
        );

        Self {
            matchers,
            converter: converter.unwrap_or_else(|| Arc::new(DefaultConverter)),
            code_converter: code_converter.unwrap_or_else(|| Arc::new(DefaultConverter)),
        }
    }

    /// Converter using only the built-in chain and converters
    pub fn with_defaults() -> Self {
        Self::new(ConverterConfig::default())
    }

    /// The resolved chain, built-in matchers included
    pub const fn matchers(&self) -> &Matchers<S> {
        &self.matchers
    }

    /// Build the payload for an error
    ///
    /// Never fails: errors no matcher recognizes get the internal code and
    /// [`FALLBACK_MESSAGE`].
    pub fn convert(&self, ctx: &RequestContext, err: &dyn Classify) -> S::Payload {
        let Some((index, matcher)) = self.matchers.resolve(err) else {
            tracing::debug!(surface = S::NAME, error = %err, "no matcher recognized error");
            return self.code_converter.convert_with_code(ctx, S::INTERNAL, &Unclassified);
        };

        if let Some(converter) = matcher.converter() {
            tracing::debug!(surface = S::NAME, matcher = index, strategy = "converter", "error matched");
            return converter.convert(ctx, err);
        }

        if let Some(code) = matcher.code() {
            tracing::debug!(surface = S::NAME, matcher = index, strategy = "code", ?code, "error matched");
            return self.code_converter.convert_with_code(ctx, code, err);
        }

        tracing::debug!(surface = S::NAME, matcher = index, strategy = "generic", "error matched");
        self.converter.convert(ctx, err)
    }
}

impl<S: Surface> Default for Converter<S> {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl<S: Surface> fmt::Debug for Converter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("surface", &S::NAME)
            .field("matchers", &self.matchers)
            .finish_non_exhaustive()
    }
}
