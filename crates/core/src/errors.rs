use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("ranking weights must sum to 1.0, got {sum}")]
    InvalidWeights { sum: f64 },
    #[error("factor `{factor}` outside [0,1]: {value}")]
    FactorOutOfRange { factor: &'static str, value: f64 },
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("{entity} `{id}` not found in tenant `{tenant}`")]
    NotFound { entity: &'static str, id: String, tenant: String },
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl ApplicationError {
    pub fn not_found(entity: &'static str, id: impl Into<String>, tenant: impl Into<String>) -> Self {
        Self::NotFound { entity, id: id.into(), tenant: tenant.into() }
    }

    /// NotFound propagates to the caller unchanged and is never worth retrying;
    /// persistence failures may succeed on a caller-driven retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

#[cfg(test)]
mod tests {
    use super::{ApplicationError, DomainError};

    #[test]
    fn domain_error_converts_into_application_error() {
        let error: ApplicationError =
            DomainError::InvalidWeights { sum: 0.95 }.into();
        assert!(matches!(error, ApplicationError::Domain(_)));
        assert!(!error.is_retryable());
    }

    #[test]
    fn not_found_carries_entity_and_tenant() {
        let error = ApplicationError::not_found("customer", "cust-9", "tenant-1");
        assert_eq!(error.to_string(), "customer `cust-9` not found in tenant `tenant-1`");
        assert!(!error.is_retryable());
    }

    #[test]
    fn persistence_errors_are_retryable() {
        let error = ApplicationError::Persistence("database lock timeout".to_owned());
        assert!(error.is_retryable());
    }
}
