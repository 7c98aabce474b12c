#![forbid(unsafe_code)]

//! Configuration errors for the numeric layer.
//!
//! Runtime paths never fail: the solvers sanitize their inputs and degrade to
//! "no movement". Only configuration supplied by the caller is validated.

use thiserror::Error;

/// An invalid elasticity or physics configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    /// An elastic factor outside `[0, 1]` or not finite.
    #[error("elastic factor must be a finite value in [0, 1] (got {value})")]
    ElasticOutOfRange { value: f64 },

    /// A physics override that must be strictly positive and finite.
    #[error("{field} must be a positive finite value (got {value})")]
    NonPositive { field: &'static str, value: f64 },
}

/// Check that `value` is finite and strictly positive.
pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let err = ensure_positive("bounce_stiffness", 0.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "bounce_stiffness must be a positive finite value (got 0)"
        );
        assert!(ensure_positive("rest_delta", f64::NAN).is_err());
        assert!(ensure_positive("rest_delta", 0.0).is_err());
        assert!(ensure_positive("rest_delta", 0.5).is_ok());
    }
}
