//! Strip command processing
//!
//! The dispatcher (and any local input) never touches strip state directly.
//! It queues [`StripCommand`]s that the owning strip task drains on its next
//! tick.

use embassy_time::Instant;

use crate::channel::{Channel, Receiver, Sender};
use crate::codec::Command;
use crate::pwm::LedStrip;

/// A change requested for one strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripCommand {
    /// Brightness in percent; 0 fades the strip off
    SetBrightness(u8),
    /// Color temperature in Kelvin
    SetColorTemperature(u16),
    /// Relative brightness change in local steps
    StepBrightness(i8),
    /// Relative color temperature change in local steps
    StepColorTemperature(i8),
    TogglePower,
    PowerOn { fade: bool },
    PowerOff { fade: bool },
}

impl StripCommand {
    /// Strip action for a bus command, if it has one.
    pub const fn from_command(command: Command) -> Option<Self> {
        match command {
            Command::Brightness(percent) => Some(Self::SetBrightness(percent)),
            Command::ColorTemperature(kelvin) => Some(Self::SetColorTemperature(kelvin)),
            Command::Status => None,
        }
    }
}

/// Type alias for the per-strip command queue
pub type StripCommandChannel<const SIZE: usize> = Channel<StripCommand, SIZE>;

/// Type alias for the producer side
pub type StripCommandSender<'a, const SIZE: usize> = Sender<'a, StripCommand, SIZE>;

/// Type alias for the consumer side
pub type StripCommandReceiver<'a, const SIZE: usize> = Receiver<'a, StripCommand, SIZE>;

/// Applies queued commands to the strip owned by the calling task
pub struct CommandProcessor<'a, const SIZE: usize> {
    commands: StripCommandReceiver<'a, SIZE>,
}

impl<'a, const SIZE: usize> CommandProcessor<'a, SIZE> {
    pub const fn new(commands: StripCommandReceiver<'a, SIZE>) -> Self {
        Self { commands }
    }

    /// Apply every queued command (non-blocking); returns how many ran.
    pub fn process_pending(&mut self, strip: &mut LedStrip, now: Instant) -> usize {
        self.commands
            .drain()
            .map(|command| strip.apply(command, now))
            .count()
    }
}
