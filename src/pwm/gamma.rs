//! Perceptual correction of PWM levels
//!
//! The lookup maps a linear light level onto a duty value using an exponential
//! curve `duty = (B^x - 1) / (B - 1)` with `B = 2^exponent` and `x` the level as
//! a fraction of full scale. With the default exponent of 10 and a 10-bit
//! timer the curve spans exactly the 1024 timer steps.

use crate::config::{FULL_SCALE, PWM_STEPS};

/// Precomputed level → duty table, one entry per PWM step
#[derive(Clone)]
pub struct GammaTable {
    lut: [u16; PWM_STEPS],
}

impl GammaTable {
    /// Build the table. An exponent of zero or below yields a linear table.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn new(exponent: f32) -> Self {
        let mut lut = [0; PWM_STEPS];
        let full_scale = f32::from(FULL_SCALE);
        let base = libm::exp2f(exponent);

        for (level, duty) in lut.iter_mut().enumerate() {
            let x = level as f32 / full_scale;
            let corrected = if exponent > 0.0 {
                (libm::powf(base, x) - 1.0) / (base - 1.0)
            } else {
                x
            };
            *duty = libm::roundf(corrected.clamp(0.0, 1.0) * full_scale) as u16;
        }

        Self { lut }
    }

    /// Duty value for a linear level; levels above full scale saturate.
    pub fn duty(&self, level: u16) -> u16 {
        self.lut[usize::from(level.min(FULL_SCALE))]
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.lut
    }
}

impl core::fmt::Debug for GammaTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GammaTable")
            .field("steps", &self.lut.len())
            .finish_non_exhaustive()
    }
}
