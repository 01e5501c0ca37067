use thiserror::Error;

/// Error type for invalid operations.
///
/// All validation happens at ingestion: constructors, warehouse `add`, and the
/// `calculate` entry points. Each public operation either returns a correct
/// result or reports one of these errors; there is no silent degradation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkyradError {
    /// Array sizes inconsistent with the declared grid/profile sizes, or an
    /// attempt to combine optical-property blocks of different shapes.
    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    InvalidDimension {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// A physically meaningless parameter value (non-positive logarithmic
    /// bounds, zenith angle outside [0, 180], albedo outside [0, 1], ...).
    #[error("invalid bounds for {context}: {value}")]
    InvalidBounds { context: String, value: f64 },

    /// Warehouse lookup of a non-existent name/handle.
    #[error("{kind} \"{key}\" not found")]
    MissingEntity { kind: &'static str, key: String },

    /// Adding an entity under a key that is already occupied.
    #[error("{kind} \"{key}\" already exists")]
    DuplicateEntity { kind: &'static str, key: String },

    /// NaN or infinite values supplied where finite numbers are required.
    #[error("non-finite value in {context}: {value}")]
    NumericInvalid { context: String, value: f64 },

    /// A condition the implementation believes cannot occur.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

impl SkyradError {
    /// Shorthand for a dimension-mismatch error.
    pub fn dimension(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        SkyradError::InvalidDimension {
            context: context.into(),
            expected,
            actual,
        }
    }

    /// Shorthand for an out-of-bounds parameter error.
    pub fn bounds(context: impl Into<String>, value: f64) -> Self {
        SkyradError::InvalidBounds {
            context: context.into(),
            value,
        }
    }

    /// Shorthand for a non-finite input error.
    pub fn non_finite(context: impl Into<String>, value: f64) -> Self {
        SkyradError::NumericInvalid {
            context: context.into(),
            value,
        }
    }
}

/// Convenience type for `Result<T, SkyradError>`.
pub type SkyradResult<T> = Result<T, SkyradError>;

/// Validate that every value in a slice is finite.
///
/// Returns the first offending value as a [`SkyradError::NumericInvalid`].
pub fn ensure_finite(context: &str, values: &[f64]) -> SkyradResult<()> {
    for &v in values {
        if !v.is_finite() {
            return Err(SkyradError::non_finite(context, v));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_offending_values() {
        let err = SkyradError::bounds("solar zenith angle", 200.0);
        assert!(err.to_string().contains("200"));

        let err = SkyradError::dimension("grid edges", 11, 10);
        assert!(err.to_string().contains("11"));
        assert!(err.to_string().contains("10"));
    }

    #[test]
    fn ensure_finite_rejects_nan_and_infinity() {
        assert!(ensure_finite("x", &[1.0, 2.0]).is_ok());
        assert!(ensure_finite("x", &[1.0, f64::NAN]).is_err());
        assert!(ensure_finite("x", &[f64::INFINITY]).is_err());
        assert!(ensure_finite("x", &[]).is_ok());
    }
}
