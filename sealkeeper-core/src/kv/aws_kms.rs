//! Options selecting the AWS KMS + SSM storage strategy for unseal secrets.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::AggregateError;

/// A single option-conflict failure.
///
/// Messages name the CLI flags the options are wired to, so the aggregated
/// report reads the same whether it surfaces from flag parsing or from a
/// config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidateError {
    #[error("--aws.kms-key-id and --aws.use-secure-string both are defined, but only one of them is needed")]
    BothKeySources,
    #[error("--aws.kms-key-id or --aws.use-secure-string must be defined")]
    NoKeySource,
}

/// User-selected strategy for storing unseal secrets in AWS.
///
/// Exactly one of `kms_key_id` and `use_secure_string` must be set: values
/// are either wrapped with the named KMS key, or written as SSM secure
/// strings with no externally managed key. Immutable once validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// Identifier of the externally managed KMS key wrapping stored values.
    pub kms_key_id: String,
    /// Store values as SSM secure strings instead of KMS-wrapped blobs.
    pub use_secure_string: bool,
    /// Prefix prepended to parameter-store keys. Not validated here.
    pub ssm_key_prefix: String,
}

impl Options {
    /// Check the mutual-exclusivity rule, collecting every failure.
    ///
    /// Pure and deterministic; an empty vec signals success. The current
    /// rules are mutually exclusive so at most one error fires per call,
    /// but callers must treat the result as a list.
    pub fn validate(&self) -> Vec<ValidateError> {
        let has_key = !self.kms_key_id.is_empty();
        let mut errs = Vec::new();
        if has_key && self.use_secure_string {
            errs.push(ValidateError::BothKeySources);
        }
        if !has_key && !self.use_secure_string {
            errs.push(ValidateError::NoKeySource);
        }
        errs
    }

    /// Validate and combine any failures into a single reportable error.
    pub fn ensure_valid(&self) -> crate::errors::Result<()> {
        match AggregateError::from_errors(self.validate()) {
            Some(agg) => agg.into_result(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(kms_key_id: &str, use_secure_string: bool) -> Options {
        Options {
            kms_key_id: kms_key_id.to_string(),
            use_secure_string,
            ssm_key_prefix: String::new(),
        }
    }

    #[test]
    fn kms_key_alone_is_valid() {
        assert!(options("test-key", false).validate().is_empty());
        assert!(options("test-key", false).ensure_valid().is_ok());
    }

    #[test]
    fn secure_string_alone_is_valid() {
        assert!(options("", true).validate().is_empty());
    }

    #[test]
    fn both_selected_reports_one_conflict() {
        let errs = options("test-key", true).validate();
        assert_eq!(errs, vec![ValidateError::BothKeySources]);
        assert_eq!(
            errs[0].to_string(),
            "--aws.kms-key-id and --aws.use-secure-string both are defined, but only one of them is needed"
        );
    }

    #[test]
    fn neither_selected_reports_one_missing() {
        let errs = options("", false).validate();
        assert_eq!(errs, vec![ValidateError::NoKeySource]);
        assert_eq!(
            errs[0].to_string(),
            "--aws.kms-key-id or --aws.use-secure-string must be defined"
        );
    }

    #[test]
    fn ensure_valid_aggregates_the_failure() {
        let err = options("", false).ensure_valid().unwrap_err();
        assert_eq!(
            err.to_string(),
            "--aws.kms-key-id or --aws.use-secure-string must be defined"
        );
    }

    #[test]
    fn ssm_key_prefix_is_not_validated() {
        let mut opts = options("test-key", false);
        opts.ssm_key_prefix = "/anything goes/".into();
        assert!(opts.validate().is_empty());
    }

    #[test]
    fn validation_is_repeatable() {
        let opts = options("test-key", true);
        assert_eq!(opts.validate(), opts.validate());
    }
}
