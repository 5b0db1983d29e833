//! Validated window container for the switching model.
//!
//! Purpose
//! -------
//! Turn one window of differenced values into the data payload the filter,
//! EM and the optimizer work on. The window is divided by its standard
//! deviation so every fit sees unit-scale data; the scale is kept to map
//! parameters and the log-likelihood back to original units.
//!
//! Invariants & assumptions
//! ------------------------
//! - `values.len() >= MIN_WINDOW`, all finite, non-zero spread.
//! - `scale > 0` and `values * scale` reproduces the raw window.
//! - Smoothed regime probabilities do not depend on `scale`.
use crate::{
    optimization::numerical_stability::GENERAL_TOL,
    regime::errors::{RegimeError, RegimeResult},
};
use ndarray::{Array1, ArrayView1};

/// Smallest window the model is fitted on.
pub const MIN_WINDOW: usize = 10;

/// Scaled window values plus the divisor that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct RegimeData {
    /// Window values divided by `scale`.
    pub values: Array1<f64>,
    /// Population standard deviation of the raw window.
    pub scale: f64,
}

impl RegimeData {
    /// Validate and scale a raw window.
    ///
    /// Errors
    /// ------
    /// - [`RegimeError::WindowTooShort`] for fewer than [`MIN_WINDOW`] values.
    /// - [`RegimeError::NonFiniteData`] at the first NaN/±inf.
    /// - [`RegimeError::ConstantWindow`] when the standard deviation is ~0.
    pub fn new(window: ArrayView1<'_, f64>) -> RegimeResult<Self> {
        if window.len() < MIN_WINDOW {
            return Err(RegimeError::WindowTooShort { len: window.len(), min: MIN_WINDOW });
        }
        if let Some((index, &value)) = window.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(RegimeError::NonFiniteData { index, value });
        }
        let scale = window.std(0.0);
        if !(scale > GENERAL_TOL) {
            return Err(RegimeError::ConstantWindow);
        }
        Ok(Self { values: window.mapv(|v| v / scale), scale })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Scaled values have unit population variance and rescale to the raw data.
    //
    // Given
    // -----
    // - Ten alternating values ±2 plus a trend.
    //
    // Expect
    // ------
    // - `values.std(0) ≈ 1` and `values * scale ≈ raw`.
    fn new_scales_window_to_unit_spread() {
        let raw = Array1::from_shape_fn(10, |i| (if i % 2 == 0 { 2.0 } else { -2.0 }) + i as f64);

        let data = RegimeData::new(raw.view()).expect("valid window");

        assert!((data.values.std(0.0) - 1.0).abs() < 1e-12);
        let back = &data.values * data.scale;
        assert!(back.iter().zip(raw.iter()).all(|(a, b)| (a - b).abs() < 1e-12));
    }

    #[test]
    // Purpose
    // -------
    // Short, constant and non-finite windows are rejected.
    //
    // Given
    // -----
    // - Nine values; ten zeros; ten values with an infinity.
    //
    // Expect
    // ------
    // - `WindowTooShort`, `ConstantWindow`, `NonFiniteData`.
    fn new_rejects_unusable_windows() {
        assert_eq!(
            RegimeData::new(Array1::<f64>::ones(9).view()),
            Err(RegimeError::WindowTooShort { len: 9, min: MIN_WINDOW })
        );
        assert_eq!(RegimeData::new(Array1::<f64>::zeros(10).view()), Err(RegimeError::ConstantWindow));
        let mut bad = Array1::from_shape_fn(10, |i| i as f64);
        bad[4] = f64::INFINITY;
        assert!(matches!(
            RegimeData::new(bad.view()),
            Err(RegimeError::NonFiniteData { index: 4, .. })
        ));
    }
}
