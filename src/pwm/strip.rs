//! One warm/cold white LED strip
//!
//! Holds the logical configuration (brightness, color temperature), the power
//! state and the two fading channels. Every change recomputes the channel
//! targets and, by default, fades towards them from the current levels.

use embassy_time::Instant;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use super::fade::ChannelState;
use super::mix::{self, ChannelLevels, StripConfig};
use crate::config::{BRIGHTNESS_STEP, COLOR_TEMPERATURE_STEP, ColorCalibration, FadeTimings};
use crate::intent::StripCommand;

/// Power state of a strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    Off,
    On,
    FadingOn,
    FadingOff,
}

impl PowerState {
    /// Whether the strip is heading towards (or at) its configured levels
    pub const fn is_powered(self) -> bool {
        matches!(self, Self::On | Self::FadingOn)
    }
}

#[derive(Debug, Clone)]
pub struct LedStrip {
    config: StripConfig,
    power: PowerState,
    warm: ChannelState,
    cold: ChannelState,
    calibration: ColorCalibration,
    timings: FadeTimings,
}

impl LedStrip {
    /// Create a strip that is switched off.
    pub fn new(config: StripConfig, calibration: ColorCalibration, timings: FadeTimings) -> Self {
        Self {
            config: StripConfig {
                brightness: config.brightness.min(100),
                color_temperature: calibration.clamp(config.color_temperature),
            },
            power: PowerState::Off,
            warm: ChannelState::new(0),
            cold: ChannelState::new(0),
            calibration,
            timings,
        }
    }

    pub const fn config(&self) -> StripConfig {
        self.config
    }

    pub const fn power(&self) -> PowerState {
        self.power
    }

    pub const fn warm(&self) -> &ChannelState {
        &self.warm
    }

    pub const fn cold(&self) -> &ChannelState {
        &self.cold
    }

    /// Current linear levels of both channels
    pub const fn levels(&self) -> ChannelLevels {
        ChannelLevels {
            warm: self.warm.level(),
            cold: self.cold.level(),
        }
    }

    /// Whether any light is (or will soon be) emitted
    pub fn is_enabled(&self) -> bool {
        self.power != PowerState::Off
    }

    pub fn is_fading(&self) -> bool {
        self.warm.is_fading() || self.cold.is_fading()
    }

    /// Levels the channels are heading to
    pub fn target_levels(&self) -> ChannelLevels {
        if self.power.is_powered() {
            mix::levels(&self.config, &self.calibration)
        } else {
            ChannelLevels::OFF
        }
    }

    /// Set brightness in percent.
    ///
    /// Zero fades the strip off; a non-zero value on a dark strip fades it on.
    pub fn set_brightness(&mut self, percent: u8, now: Instant) {
        let percent = percent.min(100);
        self.config.brightness = percent;
        if percent == 0 {
            if self.power.is_powered() {
                self.power = PowerState::FadingOff;
            }
        } else if !self.power.is_powered() {
            self.power = PowerState::FadingOn;
        }
        self.retarget(true, now);
    }

    /// Set color temperature in Kelvin, clamped to the calibration range.
    pub fn set_color_temperature(&mut self, kelvin: u16, now: Instant) {
        self.config.color_temperature = self.calibration.clamp(kelvin);
        self.retarget(true, now);
    }

    /// Change brightness by `steps` local increments.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn step_brightness(&mut self, steps: i8, now: Instant) {
        let percent = i16::from(self.config.brightness) + i16::from(steps) * i16::from(BRIGHTNESS_STEP);
        self.set_brightness(percent.clamp(0, 100) as u8, now);
    }

    /// Change color temperature by `steps` local increments.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn step_color_temperature(&mut self, steps: i8, now: Instant) {
        let kelvin = i32::from(self.config.color_temperature)
            + i32::from(steps) * i32::from(COLOR_TEMPERATURE_STEP);
        let kelvin = kelvin.clamp(
            i32::from(self.calibration.warm),
            i32::from(self.calibration.cold),
        );
        self.set_color_temperature(kelvin as u16, now);
    }

    /// Fade on when off (or fading off), fade off otherwise.
    pub fn toggle(&mut self, now: Instant) {
        if self.power.is_powered() {
            self.turn_off(true, now);
        } else {
            self.turn_on(true, now);
        }
    }

    pub fn turn_on(&mut self, fade: bool, now: Instant) {
        self.power = if fade {
            PowerState::FadingOn
        } else {
            PowerState::On
        };
        self.retarget(fade, now);
    }

    pub fn turn_off(&mut self, fade: bool, now: Instant) {
        self.power = if fade {
            PowerState::FadingOff
        } else {
            PowerState::Off
        };
        self.retarget(fade, now);
    }

    /// Apply a queued command
    pub fn apply(&mut self, command: StripCommand, now: Instant) {
        match command {
            StripCommand::SetBrightness(percent) => self.set_brightness(percent, now),
            StripCommand::SetColorTemperature(kelvin) => self.set_color_temperature(kelvin, now),
            StripCommand::StepBrightness(steps) => self.step_brightness(steps, now),
            StripCommand::StepColorTemperature(steps) => self.step_color_temperature(steps, now),
            StripCommand::TogglePower => self.toggle(now),
            StripCommand::PowerOn { fade } => self.turn_on(fade, now),
            StripCommand::PowerOff { fade } => self.turn_off(fade, now),
        }
    }

    /// Advance both channels to `now` and return the resulting levels.
    pub fn tick(&mut self, now: Instant) -> ChannelLevels {
        self.warm.tick(now);
        self.cold.tick(now);
        self.settle();
        self.levels()
    }

    /// Earliest pending fade step of either channel
    pub fn next_step_at(&self) -> Option<Instant> {
        match (self.warm.next_step_at(), self.cold.next_step_at()) {
            (Some(warm), Some(cold)) => Some(warm.min(cold)),
            (warm, cold) => warm.or(cold),
        }
    }

    fn retarget(&mut self, fade: bool, now: Instant) {
        let target = self.target_levels();
        #[cfg(feature = "esp32-log")]
        println!(
            "[LedStrip.retarget] {:?} -> warm {} cold {} (fade: {})",
            self.power, target.warm, target.cold, fade
        );
        if fade {
            self.warm.fade_to(target.warm, &self.timings, now);
            self.cold.fade_to(target.cold, &self.timings, now);
        } else {
            self.warm.set_immediate(target.warm);
            self.cold.set_immediate(target.cold);
        }
        self.settle();
    }

    /// Finish a power transition once both channels have arrived.
    fn settle(&mut self) {
        if self.is_fading() {
            return;
        }
        self.power = match self.power {
            PowerState::FadingOn => PowerState::On,
            PowerState::FadingOff => PowerState::Off,
            state => state,
        };
    }
}

impl Default for LedStrip {
    fn default() -> Self {
        Self::new(
            StripConfig::default(),
            ColorCalibration::DEFAULT,
            FadeTimings::DEFAULT,
        )
    }
}
