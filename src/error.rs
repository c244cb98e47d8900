//! Load-time error types.
//!
//! Per-tick computations never fail; they degrade to zero force. Only the
//! setup of curves and tables can be rejected, and that happens loudly when
//! configuration is loaded.

use thiserror::Error;

/// Errors raised while building curves, tables and component descriptors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetupError {
    /// Sample arrays of different lengths were supplied.
    #[error("sample length mismatch: {xs} x-samples but {ys} y-samples")]
    LengthMismatch {
        /// Number of x samples
        xs: usize,
        /// Number of y samples
        ys: usize,
    },

    /// Fewer samples than the interpolator needs.
    #[error("need at least {required} samples, got {got}")]
    TooFewSamples {
        /// Minimum accepted
        required: usize,
        /// Number supplied
        got: usize,
    },

    /// Sample abscissae are not strictly increasing at `index`.
    #[error("x-samples must be strictly increasing (x[{index}] = {prev}, x[{next_index}] = {next})", next_index = .index + 1)]
    NotIncreasing {
        /// Index of the first offending sample
        index: usize,
        /// Value at `index`
        prev: f64,
        /// Value at `index + 1`
        next: f64,
    },

    /// A sample is NaN or infinite.
    #[error("sample {index} is not finite")]
    NonFinite {
        /// Index of the bad sample
        index: usize,
    },

    /// A named curve inside a descriptor failed to set up.
    #[error("curve `{curve}`: {source}")]
    Curve {
        /// Which curve of the descriptor
        curve: &'static str,
        /// Underlying failure
        #[source]
        source: Box<SetupError>,
    },
}

impl SetupError {
    /// Tags this error with the curve it came from.
    pub fn in_curve(self, curve: &'static str) -> Self {
        Self::Curve { curve, source: Box::new(self) }
    }
}

/// Checks a sample set the way every interpolator in this crate requires:
/// equal lengths, at least `min_len` samples, finite, strictly increasing x.
pub fn validate_samples(xs: &[f64], ys: &[f64], min_len: usize) -> Result<(), SetupError> {
    if xs.len() != ys.len() {
        return Err(SetupError::LengthMismatch { xs: xs.len(), ys: ys.len() });
    }
    validate_knots(xs, min_len)?;
    if let Some(index) = ys.iter().position(|y| !y.is_finite()) {
        return Err(SetupError::NonFinite { index });
    }
    Ok(())
}

/// Checks knot positions only.
pub fn validate_knots(xs: &[f64], min_len: usize) -> Result<(), SetupError> {
    if xs.len() < min_len {
        return Err(SetupError::TooFewSamples { required: min_len, got: xs.len() });
    }
    if let Some(index) = xs.iter().position(|x| !x.is_finite()) {
        return Err(SetupError::NonFinite { index });
    }
    for (index, pair) in xs.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(SetupError::NotIncreasing { index, prev: pair[0], next: pair[1] });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_flat_knots() {
        let err = validate_samples(&[0.0, 1.0, 1.0], &[0.0, 1.0, 2.0], 2).unwrap_err();
        assert_eq!(err, SetupError::NotIncreasing { index: 1, prev: 1.0, next: 1.0 });
        assert!(err.to_string().contains("strictly increasing"));
    }

    #[test]
    fn test_validate_rejects_mismatch_and_short() {
        assert!(matches!(
            validate_samples(&[0.0, 1.0], &[0.0], 2),
            Err(SetupError::LengthMismatch { xs: 2, ys: 1 })
        ));
        assert!(matches!(
            validate_samples(&[0.0], &[0.0], 2),
            Err(SetupError::TooFewSamples { required: 2, got: 1 })
        ));
        assert!(matches!(
            validate_samples(&[0.0, f64::NAN], &[0.0, 1.0], 2),
            Err(SetupError::NonFinite { index: 1 })
        ));
    }

    #[test]
    fn test_curve_context() {
        let err = SetupError::TooFewSamples { required: 2, got: 0 }.in_curve("cl");
        assert!(err.to_string().starts_with("curve `cl`"));
    }
}
