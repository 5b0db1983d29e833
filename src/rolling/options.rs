//! Rolling run options.
//!
//! `window`, `step` and `workers` are validated at construction; `seed`
//! is the base seed from which every window derives its own stream.
use crate::{
    regime::core::{FitOptions, MIN_WINDOW},
    rolling::errors::{RollingError, RollingResult},
};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Default window length.
pub const DEFAULT_WINDOW: usize = 100;

/// Settings of one rolling run.
#[derive(Debug, Clone)]
pub struct RollingOptions {
    pub window: usize,
    pub step: usize,
    /// `1` runs windows sequentially in index order; more uses a rayon pool.
    pub workers: usize,
    pub seed: u64,
    pub fit: FitOptions,
    pub show_progress: bool,
    /// When set to `true`, windows not yet started are skipped.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl RollingOptions {
    /// Errors
    /// ------
    /// - [`RollingError::InvalidWindow`], [`RollingError::InvalidStep`],
    ///   [`RollingError::InvalidWorkers`].
    pub fn new(window: usize, step: usize, workers: usize) -> RollingResult<Self> {
        let opts = Self { window, step, workers, ..Self::default() };
        opts.validate()?;
        Ok(opts)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_fit(mut self, fit: FitOptions) -> Self {
        self.fit = fit;
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Re-check the public fields.
    pub fn validate(&self) -> RollingResult<()> {
        if self.window < MIN_WINDOW {
            return Err(RollingError::InvalidWindow { window: self.window, min: MIN_WINDOW });
        }
        if self.step == 0 {
            return Err(RollingError::InvalidStep { step: self.step });
        }
        if self.workers == 0 {
            return Err(RollingError::InvalidWorkers { workers: self.workers });
        }
        Ok(())
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

impl Default for RollingOptions {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            step: 1,
            workers: 1,
            seed: 0,
            fit: FitOptions::default(),
            show_progress: false,
            cancel: None,
        }
    }
}
