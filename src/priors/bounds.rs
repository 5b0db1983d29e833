//! Outer prior bounds `(a, b)` of a window.
//!
//! `b` is the largest absolute value in the window and `a = 0.1·b`, so
//! `0 <= a <= b` always holds, with equality only at `b = 0`.
use crate::priors::errors::{PriorError, PriorResult};
use ndarray::ArrayView1;

/// Ratio `a / b` of the lower to the upper bound.
pub const LOWER_BOUND_FRACTION: f64 = 0.1;

/// Outer bounds of the variance hierarchy for one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorBounds {
    pub a: f64,
    pub b: f64,
}

impl PriorBounds {
    /// Validated bounds.
    ///
    /// Errors
    /// ------
    /// - [`PriorError::InvalidBounds`] unless both are finite and `0 <= a <= b`.
    pub fn new(a: f64, b: f64) -> PriorResult<Self> {
        if !a.is_finite() || !b.is_finite() || a < 0.0 || a > b {
            return Err(PriorError::InvalidBounds { a, b });
        }
        Ok(Self { a, b })
    }

    /// Placeholder bounds written for degenerate windows.
    pub fn zero() -> Self {
        Self { a: 0.0, b: 0.0 }
    }
}

/// Bounds for one window of differenced values.
///
/// Errors
/// ------
/// - [`PriorError::EmptyWindow`] for an empty window.
/// - [`PriorError::NonFiniteWindow`] at the first NaN/±inf.
/// - [`PriorError::DegenerateWindow`] when every value is zero.
pub fn bounds_for_window(window: ArrayView1<'_, f64>) -> PriorResult<PriorBounds> {
    if window.is_empty() {
        return Err(PriorError::EmptyWindow);
    }
    if let Some((index, &value)) = window.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(PriorError::NonFiniteWindow { index, value });
    }
    let b = window.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if b == 0.0 {
        return Err(PriorError::DegenerateWindow);
    }
    Ok(PriorBounds { a: LOWER_BOUND_FRACTION * b, b })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, array};

    #[test]
    // Purpose
    // -------
    // `b` is the max absolute value (negative values included) and `a = 0.1·b`.
    //
    // Given
    // -----
    // - [2, -7, 3, 0].
    //
    // Expect
    // ------
    // - b = 7, a = 0.7.
    fn bounds_use_max_absolute_value() {
        let bounds = bounds_for_window(array![2.0, -7.0, 3.0, 0.0].view()).expect("valid window");

        assert_eq!(bounds.b, 7.0);
        assert!((bounds.a - 0.7).abs() < 1e-15);
        assert!(bounds.a <= bounds.b);
    }

    #[test]
    // Purpose
    // -------
    // Empty, all-zero and non-finite windows are rejected; `new` validates.
    //
    // Given
    // -----
    // - [], [0, 0, 0], [1, NaN]; bounds (2, 1) and (-1, 1).
    //
    // Expect
    // ------
    // - `EmptyWindow`, `DegenerateWindow`, `NonFiniteWindow`, `InvalidBounds`.
    fn unusable_windows_and_bounds_are_rejected() {
        let empty = Array1::<f64>::zeros(0);
        assert_eq!(bounds_for_window(empty.view()), Err(PriorError::EmptyWindow));
        assert_eq!(bounds_for_window(array![0.0, 0.0, 0.0].view()), Err(PriorError::DegenerateWindow));
        assert!(matches!(
            bounds_for_window(array![1.0, f64::NAN].view()),
            Err(PriorError::NonFiniteWindow { index: 1, .. })
        ));
        assert!(matches!(PriorBounds::new(2.0, 1.0), Err(PriorError::InvalidBounds { .. })));
        assert!(matches!(PriorBounds::new(-1.0, 1.0), Err(PriorError::InvalidBounds { .. })));
        assert!(PriorBounds::new(0.0, 0.0).is_ok());
    }
}
