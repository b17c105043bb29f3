//! Control panel
//!
//! Turns encoder rotation and button presses into brightness and color
//! temperature commands for the light drivers, and mirrors every change on
//! the feedback bar.
//!
//! Encoders come in pairs. Encoder `i` belongs to strip group `i / 2`; the
//! even one of a pair changes brightness, the odd one color temperature. The
//! main panel (index 0) drives the long strips of drivers 1 and 2, every other
//! panel drives the short strip of the driver with its own index.

pub mod feedback;

use embassy_time::{Instant, Timer};
use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::address::{DeviceAddress, Role};
use crate::channel::{Channel, Sender};
use crate::codec::{Command, StripSelector};
use crate::config::panel::{
    BASE_COLOR_TEMPERATURE, DEFAULT_BRIGHTNESS_LEVEL, DEFAULT_COLOR_TEMPERATURE_LEVEL,
    KELVIN_PER_COLOR_TEMPERATURE_LEVEL, MAIN_PANEL_ENCODERS, MAX_COLOR_TEMPERATURE,
    MAX_ENCODERS, MAX_LEVEL, PERCENT_PER_BRIGHTNESS_LEVEL, SAMPLING_PERIOD, SIDE_PANEL_ENCODERS,
};
use crate::error::{Error, Result};
use crate::sender::FrameSender;

pub use feedback::{Animation, ColorSweep, FeedbackBar, StatusAnimation};

/// Debounced button event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    ShortPress,
    LongPress,
}

/// A rotary encoder with a push button.
///
/// Quadrature decoding and debouncing happen in the implementation.
pub trait PanelEncoder {
    /// Mechanical detents turned since the last call (signed).
    fn poll_delta(&mut self) -> i32;

    /// Button event completed since the last call, if any.
    fn poll_action(&mut self) -> Option<ButtonAction>;
}

/// What the feedback bar should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackRequest {
    /// Brightness level, 0 is dark
    Brightness(u8),
    /// Color temperature level, 1 is warmest
    ColorTemperature(u8),
}

pub type FeedbackChannel<const SIZE: usize> = Channel<FeedbackRequest, SIZE>;
pub type FeedbackSender<'a, const SIZE: usize> = Sender<'a, FeedbackRequest, SIZE>;

/// Settings of one strip group as remembered by the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupState {
    pub brightness_level: u8,
    pub color_temperature_level: u8,
    pub powered: bool,
}

impl GroupState {
    pub const DEFAULT: Self = Self {
        brightness_level: DEFAULT_BRIGHTNESS_LEVEL,
        color_temperature_level: DEFAULT_COLOR_TEMPERATURE_LEVEL,
        powered: false,
    };
}

impl Default for GroupState {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Brightness percentage sent for a level
pub fn brightness_percent(level: u8) -> u8 {
    level.saturating_mul(PERCENT_PER_BRIGHTNESS_LEVEL).min(100)
}

/// Color temperature in Kelvin sent for a level
pub fn color_temperature_kelvin(level: u8) -> u16 {
    (BASE_COLOR_TEMPERATURE + u16::from(level) * KELVIN_PER_COLOR_TEMPERATURE_LEVEL)
        .min(MAX_COLOR_TEMPERATURE)
}

const GROUPS: usize = MAX_ENCODERS / 2;

pub struct ControlPanel<'a, E: PanelEncoder, const SIZE: usize, const FEEDBACK: usize> {
    address: DeviceAddress,
    encoders: Vec<E, MAX_ENCODERS>,
    sender: FrameSender<'a, SIZE>,
    feedback: FeedbackSender<'a, FEEDBACK>,
    groups: [GroupState; GROUPS],
}

impl<'a, E: PanelEncoder, const SIZE: usize, const FEEDBACK: usize>
    ControlPanel<'a, E, SIZE, FEEDBACK>
{
    /// The main panel needs four encoders, side panels two.
    pub fn new(
        address: DeviceAddress,
        encoders: Vec<E, MAX_ENCODERS>,
        sender: FrameSender<'a, SIZE>,
        feedback: FeedbackSender<'a, FEEDBACK>,
    ) -> Result<Self> {
        if address.role() != Role::ControlPanel {
            return Err(Error::WrongRole);
        }
        let expected = if address.index() == 0 {
            MAIN_PANEL_ENCODERS
        } else {
            SIDE_PANEL_ENCODERS
        };
        if encoders.len() != expected {
            return Err(Error::EncoderCount(encoders.len()));
        }
        Ok(Self {
            address,
            encoders,
            sender,
            feedback,
            groups: [GroupState::DEFAULT; GROUPS],
        })
    }

    pub const fn address(&self) -> DeviceAddress {
        self.address
    }

    pub fn group(&self, group: usize) -> Option<&GroupState> {
        self.groups.get(group)
    }

    pub fn encoders_mut(&mut self) -> &mut [E] {
        &mut self.encoders
    }

    /// Poll every encoder once and publish whatever changed.
    pub async fn sample(&mut self) {
        for encoder in 0..self.encoders.len() {
            let delta = self.encoders[encoder].poll_delta();
            if delta != 0 {
                self.handle_delta(encoder, delta).await;
            }
            if let Some(action) = self.encoders[encoder].poll_action() {
                self.on_button(encoder, action).await;
            }
        }
    }

    /// Apply a rotation of `delta` detents on `encoder`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub async fn handle_delta(&mut self, encoder: usize, delta: i32) {
        let Some(state) = self.groups.get_mut(encoder / 2) else {
            return;
        };
        if encoder % 2 == 0 {
            let level = (i32::from(state.brightness_level) + delta).clamp(0, i32::from(MAX_LEVEL));
            state.brightness_level = level as u8;
            // a non-zero brightness switches the drivers on
            state.powered = level > 0;
            self.publish_brightness(encoder / 2).await;
        } else {
            let level = (i32::from(state.color_temperature_level) + delta)
                .clamp(1, i32::from(MAX_LEVEL));
            state.color_temperature_level = level as u8;
            self.publish_color_temperature(encoder / 2).await;
        }
    }

    /// Short press toggles the group, long press restores the default of
    /// the quantity the encoder controls.
    pub async fn on_button(&mut self, encoder: usize, action: ButtonAction) {
        let group = encoder / 2;
        let Some(state) = self.groups.get_mut(group) else {
            return;
        };
        match action {
            ButtonAction::ShortPress => {
                state.powered = !state.powered;
                self.publish_brightness(group).await;
            }
            ButtonAction::LongPress if encoder % 2 == 0 => {
                state.brightness_level = DEFAULT_BRIGHTNESS_LEVEL;
                self.publish_brightness(group).await;
            }
            ButtonAction::LongPress => {
                state.color_temperature_level = DEFAULT_COLOR_TEMPERATURE_LEVEL;
                self.publish_color_temperature(group).await;
            }
        }
    }

    /// Task body
    pub async fn run(&mut self) -> ! {
        let mut next = Instant::now();
        loop {
            self.sample().await;
            next += SAMPLING_PERIOD;
            Timer::at(next).await;
        }
    }

    /// Driver and strip a group is wired to
    #[allow(clippy::cast_possible_truncation)]
    pub fn target(&self, group: usize) -> (u8, StripSelector) {
        if self.address.index() == 0 {
            (1 + group as u8, StripSelector::Strip0)
        } else {
            (self.address.index(), StripSelector::Strip1)
        }
    }

    async fn publish_brightness(&self, group: usize) {
        let state = self.groups[group];
        let level = if state.powered {
            state.brightness_level
        } else {
            0
        };
        let (driver, strip) = self.target(group);
        self.sender
            .send(Command::Brightness(brightness_percent(level)), driver, strip)
            .await;
        self.show(FeedbackRequest::Brightness(level));
    }

    async fn publish_color_temperature(&self, group: usize) {
        let level = self.groups[group].color_temperature_level;
        let (driver, strip) = self.target(group);
        self.sender
            .send(
                Command::ColorTemperature(color_temperature_kelvin(level)),
                driver,
                strip,
            )
            .await;
        self.show(FeedbackRequest::ColorTemperature(level));
    }

    fn show(&self, request: FeedbackRequest) {
        if self.feedback.try_send(request).is_err() {
            #[cfg(feature = "esp32-log")]
            println!("[ControlPanel.show] feedback queue full, dropping {:?}", request);
        }
    }
}
