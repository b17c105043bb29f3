//! Compile-time configuration shared by both board roles.

use embassy_time::Duration;

/// Number of PWM steps of the strip timers (10 bit).
pub const PWM_STEPS: usize = 1024;

/// Highest linear channel level.
#[allow(clippy::cast_possible_truncation)]
pub const FULL_SCALE: u16 = (PWM_STEPS - 1) as u16;

/// Exponent of the perceptual correction curve.
pub const GAMMA_EXPONENT: f32 = 10.0;

/// Capacity of the CAN RX and TX byte streams.
pub const STREAM_BUFFER_SIZE: usize = 256;

/// How long the dispatcher waits for a payload once its header arrived.
pub const PAYLOAD_TIMEOUT: Duration = Duration::from_millis(100);

/// Pending commands per strip.
pub const STRIP_QUEUE_SIZE: usize = 8;

/// Brightness change per local step, in percent.
pub const BRIGHTNESS_STEP: u8 = 5;

/// Color temperature change per local step, in Kelvin.
pub const COLOR_TEMPERATURE_STEP: u16 = 100;

/// Timing of channel fades
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeTimings {
    /// Time a complete fade should take
    pub duration: Duration,
    /// Shortest delay the scheduler can honor
    pub tick: Duration,
    /// Output refresh period while no fade is running
    pub refresh: Duration,
}

impl FadeTimings {
    pub const DEFAULT: Self = Self {
        duration: Duration::from_millis(300),
        tick: Duration::from_millis(1),
        refresh: Duration::from_millis(10),
    };

    /// Number of scheduler ticks that fit into one fade.
    pub fn max_steps(&self) -> u64 {
        let tick = self.tick.as_ticks().max(1);
        (self.duration.as_ticks() / tick).max(1)
    }
}

impl Default for FadeTimings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Calibration points of the warm/cold white mix, in Kelvin.
///
/// `neutral` is the temperature at which both channels run at full scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorCalibration {
    pub warm: u16,
    pub neutral: u16,
    pub cold: u16,
}

impl ColorCalibration {
    pub const DEFAULT: Self = Self {
        warm: 2700,
        neutral: 4200,
        cold: 6000,
    };

    /// Clamp a temperature into the supported range
    pub fn clamp(&self, kelvin: u16) -> u16 {
        kelvin.clamp(self.warm, self.cold)
    }
}

impl Default for ColorCalibration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Control panel tuning.
pub mod panel {
    use embassy_time::Duration;

    /// LEDs on the feedback bar.
    pub const FEEDBACK_LEDS: usize = 12;
    /// Highest brightness / color temperature level.
    pub const MAX_LEVEL: u8 = 12;
    /// Brightness level at boot and after a reset (about 80 %).
    pub const DEFAULT_BRIGHTNESS_LEVEL: u8 = 9;
    /// Color temperature level at boot and after a reset (4200 K).
    pub const DEFAULT_COLOR_TEMPERATURE_LEVEL: u8 = 6;
    pub const PERCENT_PER_BRIGHTNESS_LEVEL: u8 = 8;
    pub const KELVIN_PER_COLOR_TEMPERATURE_LEVEL: u16 = 300;
    /// Temperature of level 0; level 1 is the warmest selectable value.
    pub const BASE_COLOR_TEMPERATURE: u16 = 2700 - KELVIN_PER_COLOR_TEMPERATURE_LEVEL;
    pub const MAX_COLOR_TEMPERATURE: u16 = 6500;
    /// Encoders on the main panel (index 0).
    pub const MAIN_PANEL_ENCODERS: usize = 4;
    /// Encoders on side panels.
    pub const SIDE_PANEL_ENCODERS: usize = 2;
    pub const MAX_ENCODERS: usize = MAIN_PANEL_ENCODERS;
    /// Pending feedback requests.
    pub const FEEDBACK_QUEUE_SIZE: usize = 4;
    /// Encoder and button sampling period.
    pub const SAMPLING_PERIOD: Duration = Duration::from_millis(10);

    /// Feedback bar refresh period.
    pub const FEEDBACK_REFRESH: Duration = Duration::from_millis(20);
    pub const FEEDBACK_FADE: Duration = Duration::from_millis(150);
    /// The bar goes dark after this long without a new status.
    pub const FEEDBACK_TIMEOUT: Duration = Duration::from_secs(5);
    pub const FEEDBACK_OFF_FADE: Duration = Duration::from_millis(300);
    /// Duration of each color of the startup sweep.
    pub const SWEEP_PHASE: Duration = Duration::from_millis(250);
}
