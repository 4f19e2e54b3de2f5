//! Input validation for simulation and optimization requests.
//!
//! Checks structural integrity before any sampling or solving starts.
//! Detects:
//! - Unsupported config versions
//! - Out-of-range or inverted parameter ranges
//! - Non-finite numeric parameters
//! - Empty, ragged, non-square or non-finite matrices
//!
//! Config checks collect every problem instead of stopping at the first,
//! so a caller can fix a request in one round trip.

use crate::error::{Result, YieldError};
use crate::models::{Config, ValueRange, CONFIG_VERSION};

/// Largest accepted batch count; four `n × n` matrices are allocated per experiment.
pub const MAX_N: usize = 2000;

/// Validation result.
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Config schema version is not supported.
    UnsupportedVersion,
    /// A parameter lies outside its allowed range.
    OutOfRange,
    /// A `[min, max]` pair has `min > max`.
    InvertedRange,
    /// A parameter is NaN or infinite.
    NonFinite,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a scenario config.
///
/// Checks:
/// 1. `version` is supported
/// 2. All floating-point parameters are finite
/// 3. `1 ≤ n ≤ MAX_N`, `m > 0`, `delta_k ≥ 1`
/// 4. `0 ≤ a_min ≤ a_max`
/// 5. `beta1 > 0`, `beta2 > 0`
/// 6. `growth_base > 1`
/// 7. Every chemistry range has `min ≤ max`
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_config(config: &Config) -> ValidationResult {
    let mut errors = Vec::new();

    if config.version != CONFIG_VERSION {
        errors.push(ValidationError::new(
            ValidationErrorKind::UnsupportedVersion,
            format!(
                "config version {} is not supported (expected {CONFIG_VERSION})",
                config.version
            ),
        ));
    }

    let scalars = [
        ("m", config.m),
        ("a_min", config.a_min),
        ("a_max", config.a_max),
        ("beta1", config.beta1),
        ("beta2", config.beta2),
        ("growth_base", config.growth_base),
    ];
    let mut all_finite = true;
    for (name, value) in scalars {
        if !value.is_finite() {
            all_finite = false;
            errors.push(ValidationError::new(
                ValidationErrorKind::NonFinite,
                format!("{name} must be finite, got {value}"),
            ));
        }
    }

    if config.n < 1 {
        errors.push(out_of_range("n must be at least 1"));
    } else if config.n > MAX_N {
        errors.push(out_of_range(format!(
            "n must not exceed {MAX_N}, got {}",
            config.n
        )));
    }
    if config.delta_k < 1 {
        errors.push(out_of_range("delta_k must be at least 1"));
    }

    if all_finite {
        if config.m <= 0.0 {
            errors.push(out_of_range(format!("m must be positive, got {}", config.m)));
        }
        if config.a_min < 0.0 {
            errors.push(out_of_range(format!(
                "a_min must not be negative, got {}",
                config.a_min
            )));
        }
        if config.a_min > config.a_max {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvertedRange,
                format!(
                    "a_min ({}) must not exceed a_max ({})",
                    config.a_min, config.a_max
                ),
            ));
        }
        if config.beta1 <= 0.0 || config.beta2 <= 0.0 {
            errors.push(out_of_range(format!(
                "beta1 and beta2 must be positive, got {} and {}",
                config.beta1, config.beta2
            )));
        }
        if config.growth_base <= 1.0 {
            errors.push(out_of_range(format!(
                "growth_base must be greater than 1, got {}",
                config.growth_base
            )));
        }
    }

    let chemistry = &config.chemistry;
    for (name, range) in [
        ("chemistry.potassium", chemistry.potassium),
        ("chemistry.sodium", chemistry.sodium),
        ("chemistry.nitrogen", chemistry.nitrogen),
        ("chemistry.invert_sugar", chemistry.invert_sugar),
    ] {
        check_range(name, range, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a config, folding all problems into one `InvalidConfig`.
pub fn ensure_config(config: &Config) -> Result<()> {
    validate_config(config).map_err(YieldError::InvalidConfig)
}

/// Checks that `matrix` is a non-empty, square, all-finite matrix.
///
/// # Returns
/// The dimension `n`.
pub fn validate_matrix(matrix: &[Vec<f64>]) -> Result<usize> {
    let n = matrix.len();
    if n == 0 {
        return Err(YieldError::DimensionMismatch("matrix is empty".into()));
    }
    for (i, row) in matrix.iter().enumerate() {
        if row.len() != n {
            return Err(YieldError::DimensionMismatch(format!(
                "row {i} has {} entries, expected {n}",
                row.len()
            )));
        }
        if let Some(j) = row.iter().position(|v| !v.is_finite()) {
            return Err(YieldError::DimensionMismatch(format!(
                "entry ({i}, {j}) is not finite"
            )));
        }
    }
    Ok(n)
}

fn out_of_range(message: impl Into<String>) -> ValidationError {
    ValidationError::new(ValidationErrorKind::OutOfRange, message)
}

fn check_range(name: &str, range: ValueRange, errors: &mut Vec<ValidationError>) {
    if !range.min.is_finite() || !range.max.is_finite() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NonFinite,
            format!("{name} bounds must be finite"),
        ));
    } else if range.min > range.max {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvertedRange,
            format!("{name}.min ({}) must not exceed max ({})", range.min, range.max),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChemistryRanges;

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&Config::new(10)).is_ok());
    }

    #[test]
    fn test_zero_batches() {
        let errors = validate_config(&Config::new(0)).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::OutOfRange && e.message.contains("n must")));
    }

    #[test]
    fn test_inverted_initial_range() {
        let config = Config::new(3).with_initial_range(20.0, 10.0);
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvertedRange));
    }

    #[test]
    fn test_equal_initial_bounds_allowed() {
        let config = Config::new(3).with_initial_range(15.0, 15.0);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_negative_initial_value_rejected() {
        let config = Config::new(3).with_initial_range(-5.0, -1.0);
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::OutOfRange && e.message.contains("a_min")));

        let zero = Config::new(3).with_initial_range(0.0, 1.0);
        assert!(validate_config(&zero).is_ok());
    }

    #[test]
    fn test_batch_count_upper_bound() {
        assert!(validate_config(&Config::new(MAX_N)).is_ok());
        let errors = validate_config(&Config::new(MAX_N + 1)).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::OutOfRange && e.message.contains("must not exceed")));
    }

    #[test]
    fn test_zero_delta_k() {
        let config = Config::new(3).with_delta_k(0);
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("delta_k")));
    }

    #[test]
    fn test_non_positive_beta() {
        let config = Config::new(3).with_beta_range(0.0, 0.9);
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("beta1 and beta2")));
    }

    #[test]
    fn test_growth_base_must_exceed_one() {
        let config = Config::new(3).with_growth_base(1.0);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_non_finite_mass() {
        let config = Config::new(3).with_mass(f64::NAN);
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::NonFinite));
    }

    #[test]
    fn test_unsupported_version() {
        let mut config = Config::new(3);
        config.version = 2;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnsupportedVersion));
    }

    #[test]
    fn test_inverted_chemistry_range() {
        let mut chemistry = ChemistryRanges::default();
        chemistry.sodium = ValueRange::new(0.9, 0.1);
        let config = Config::new(3).with_chemistry(chemistry);
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("sodium")));
    }

    #[test]
    fn test_multiple_errors() {
        let config = Config::new(0).with_delta_k(0).with_initial_range(5.0, 1.0);
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3);
    }

    #[test]
    fn test_ensure_config_wraps_errors() {
        let err = ensure_config(&Config::new(0)).unwrap_err();
        assert_eq!(err.kind(), "invalid_config");
    }

    #[test]
    fn test_matrix_square() {
        let m = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        assert_eq!(validate_matrix(&m).unwrap(), 2);
    }

    #[test]
    fn test_matrix_ragged() {
        let m = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            validate_matrix(&m),
            Err(YieldError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_matrix_non_square() {
        let m = vec![vec![1.0, 2.0, 3.0], vec![3.0, 4.0, 5.0]];
        assert!(validate_matrix(&m).is_err());
    }

    #[test]
    fn test_matrix_non_finite() {
        let m = vec![vec![1.0, f64::INFINITY], vec![3.0, 4.0]];
        assert!(validate_matrix(&m).is_err());
    }

    #[test]
    fn test_matrix_empty() {
        assert!(validate_matrix(&[]).is_err());
    }
}
