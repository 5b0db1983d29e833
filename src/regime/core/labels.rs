//! Post-hoc regime labels.
//!
//! Regime slots 0/1 are arbitrary after estimation (label switching). A fit
//! resolves them once into [`Regime::Baseline`] / [`Regime::Epidemic`] by
//! comparing fitted variances; everything downstream asks for a [`Regime`],
//! never for a raw slot.
use crate::regime::core::params::N_REGIMES;

/// Named latent regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Regime {
    /// Lower-variance regime.
    Baseline,
    /// Higher-variance regime (anomalous / viral activity).
    Epidemic,
}

/// Slot assignment of the two named regimes for one fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegimeLabels {
    epidemic: usize,
}

impl RegimeLabels {
    /// The slot with the larger variance is the epidemic regime; on an exact
    /// tie slot 1 is chosen.
    pub fn from_variances(variance: &[f64; N_REGIMES]) -> Self {
        let epidemic = if variance[1] >= variance[0] { 1 } else { 0 };
        Self { epidemic }
    }

    /// Slot holding `regime`.
    pub fn index(&self, regime: Regime) -> usize {
        match regime {
            Regime::Epidemic => self.epidemic,
            Regime::Baseline => 1 - self.epidemic,
        }
    }

    /// Named regime stored in `slot`.
    pub fn regime_at(&self, slot: usize) -> Regime {
        if slot == self.epidemic { Regime::Epidemic } else { Regime::Baseline }
    }
}
