#![no_std]

pub mod address;
pub mod bus;
pub mod channel;
pub mod codec;
pub mod color;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod frame;
pub mod intent;
pub mod math8;
pub mod node;
pub mod panel;
pub mod pwm;
pub mod sender;
pub mod stream;
pub mod transition;

pub use address::{DeviceAddress, Role, acceptance_filters};
pub use bus::{BusInterface, BusReady, BusState, CanRx, CanTx, InterruptSlot, RxInterrupt, TxOutcome};
pub use codec::{Command, CommandKind, Decoded, StripSelector, decode_id, encode_id};
pub use config::{ColorCalibration, FadeTimings};
pub use dispatcher::{Dispatch, Dispatcher, IgnoreReason, Targets};
pub use error::{Error, FrameError, PayloadError, Result};
pub use frame::{CanFrame, FrameHeader};
pub use intent::{CommandProcessor, StripCommand, StripCommandChannel};
pub use node::{ControlPanelContext, LightDriverContext};
pub use panel::{ButtonAction, ControlPanel, FeedbackBar, FeedbackRequest, PanelEncoder};
pub use pwm::{GammaTable, LedStrip, StripConfig, StripTask};
pub use sender::FrameSender;
pub use stream::StreamBuffer;

pub use color::Rgb;
pub use embassy_time::{Duration, Instant};

/// PWM channel of a warm/cold white strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhiteChannel {
    Warm,
    Cold,
}

/// Timer compare outputs of one strip
///
/// Implement this trait for the board's timer peripheral.
pub trait PwmOutput {
    /// Set the compare value of `channel` (0..=1023)
    fn set_duty(&mut self, channel: WhiteChannel, duty: u16);
}

/// Addressable LED bar driver
///
/// Implement this trait to support different hardware platforms.
pub trait LedBarOutput {
    /// Write colors to the LED bar
    fn write(&mut self, colors: &[Rgb]);
}
