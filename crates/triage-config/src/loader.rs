use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::path::Path;

use crate::{Config, ErrorKind, MatcherMode};

/// Highest defined `google.rpc.Code`
const MAX_GRPC_CODE: i32 = 16;

/// Informational through server error classes
const HTTP_STATUS_RANGE: RangeInclusive<u16> = 100..=599;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then parses and
    /// validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a placeholder cannot be
    /// expanded, the TOML is invalid, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if a placeholder cannot be expanded, the TOML is
    /// invalid, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configured rules are usable
    ///
    /// Rules that can never fire are reported as warnings rather than
    /// errors, since the chain still behaves deterministically.
    ///
    /// # Errors
    ///
    /// Returns an error if a gRPC rule names a code outside `1..=16` or an
    /// HTTP rule names a status outside `100..=599`
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_grpc_config()?;
        self.validate_http_config()?;

        warn_unreachable("grpc", self.grpc.mode, self.grpc.rules.iter().map(|rule| rule.kind));
        warn_unreachable("http", self.http.mode, self.http.rules.iter().map(|rule| rule.kind));

        Ok(())
    }

    fn validate_grpc_config(&self) -> anyhow::Result<()> {
        for (index, rule) in self.grpc.rules.iter().enumerate() {
            if !(1..=MAX_GRPC_CODE).contains(&rule.code) {
                anyhow::bail!(
                    "grpc.rules[{index}]: code {} is not a gRPC error code (expected 1..={MAX_GRPC_CODE})",
                    rule.code
                );
            }
        }

        Ok(())
    }

    fn validate_http_config(&self) -> anyhow::Result<()> {
        for (index, rule) in self.http.rules.iter().enumerate() {
            let status = rule.status.as_u16();
            if !HTTP_STATUS_RANGE.contains(&status) {
                anyhow::bail!(
                    "http.rules[{index}]: status {status} is outside {}..={}",
                    HTTP_STATUS_RANGE.start(),
                    HTTP_STATUS_RANGE.end()
                );
            }
        }

        Ok(())
    }
}

/// Log rules shadowed by an earlier rule for the same kind
fn warn_unreachable(surface: &str, mode: MatcherMode, kinds: impl Iterator<Item = ErrorKind>) {
    let mut seen = HashSet::new();
    let mut count = 0;

    for (index, kind) in kinds.enumerate() {
        count += 1;
        if !seen.insert(kind) {
            tracing::warn!(surface, index, %kind, "rule is shadowed by an earlier rule for the same kind");
        }
    }

    if mode == MatcherMode::Replace && count == 0 {
        tracing::warn!(surface, "replace mode without rules, every error will take the fallback path");
    }
}
