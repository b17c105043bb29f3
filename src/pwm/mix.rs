//! Warm/cold white mixing
//!
//! Color temperature is split into two linear channel levels around the
//! neutral calibration point, then scaled by the strip brightness. Gamma is
//! applied later to the final level, never to the mix ratio.

use crate::config::{ColorCalibration, FULL_SCALE};

/// Logical state of one strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripConfig {
    /// Brightness in percent (0-100)
    pub brightness: u8,
    /// Color temperature in Kelvin
    pub color_temperature: u16,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            brightness: 50,
            color_temperature: ColorCalibration::DEFAULT.neutral,
        }
    }
}

/// Linear levels of the two white channels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelLevels {
    pub warm: u16,
    pub cold: u16,
}

impl ChannelLevels {
    pub const OFF: Self = Self { warm: 0, cold: 0 };
}

/// Full-brightness mix for a color temperature.
///
/// Below neutral the warm channel is at full scale and the cold channel ramps
/// up; from neutral on the cold channel is at full scale and the warm channel
/// ramps down.
pub fn mix(kelvin: u16, calibration: &ColorCalibration) -> ChannelLevels {
    let kelvin = calibration.clamp(kelvin);
    if kelvin < calibration.neutral {
        ChannelLevels {
            warm: FULL_SCALE,
            cold: ratio(kelvin - calibration.warm, calibration.neutral - calibration.warm),
        }
    } else {
        ChannelLevels {
            warm: ratio(calibration.cold - kelvin, calibration.cold - calibration.neutral),
            cold: FULL_SCALE,
        }
    }
}

/// Target levels for a strip configuration.
pub fn levels(config: &StripConfig, calibration: &ColorCalibration) -> ChannelLevels {
    let mixed = mix(config.color_temperature, calibration);
    let brightness = config.brightness.min(100);
    ChannelLevels {
        warm: scale_percent(mixed.warm, brightness),
        cold: scale_percent(mixed.cold, brightness),
    }
}

/// `FULL_SCALE * numerator / denominator`, full scale for an empty range
#[allow(clippy::cast_possible_truncation)]
fn ratio(numerator: u16, denominator: u16) -> u16 {
    if denominator == 0 {
        return FULL_SCALE;
    }
    (u32::from(FULL_SCALE) * u32::from(numerator) / u32::from(denominator)) as u16
}

#[allow(clippy::cast_possible_truncation)]
fn scale_percent(level: u16, percent: u8) -> u16 {
    (u32::from(level) * u32::from(percent) / 100) as u16
}
