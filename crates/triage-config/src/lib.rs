//! Static configuration for triage matcher chains
//!
//! Describes, per protocol, which error kinds map to which codes and whether
//! those rules extend or replace the built-in chain.

#![allow(clippy::must_use_candidate)]

mod env;
mod loader;

use http::StatusCode;
use serde::{Deserialize, Deserializer};
pub use triage_core::{ErrorKind, MatcherMode};

pub use env::{ExpandError, expand_env};

/// Top-level triage configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// gRPC status conversion
    #[serde(default)]
    pub grpc: GrpcConfig,
    /// HTTP problem conversion
    #[serde(default)]
    pub http: HttpConfig,
}

/// Matcher rules for the gRPC surface
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrpcConfig {
    #[serde(default)]
    pub mode: MatcherMode,
    #[serde(default)]
    pub rules: Vec<GrpcRule>,
}

/// Map an error kind to a gRPC status code
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GrpcRule {
    pub kind: ErrorKind,
    /// Numeric `google.rpc.Code`, `1..=16`
    pub code: i32,
}

/// Matcher rules for the HTTP surface
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    #[serde(default)]
    pub mode: MatcherMode,
    #[serde(default)]
    pub rules: Vec<HttpRule>,
}

/// Map an error kind to an HTTP status
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HttpRule {
    pub kind: ErrorKind,
    #[serde(deserialize_with = "status_code")]
    pub status: StatusCode,
}

fn status_code<'de, D>(deserializer: D) -> Result<StatusCode, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = u16::deserialize(deserializer)?;
    StatusCode::from_u16(raw).map_err(|_| serde::de::Error::custom(format!("invalid HTTP status code: {raw}")))
}
