//! Light-driver command dispatcher
//!
//! Reads frames from the RX stream, decodes them against the board address
//! and forwards the resulting strip commands to the strip tasks. Nothing here
//! touches strip state: each strip is owned by its own task.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::address::DeviceAddress;
use crate::codec::{self, Command, Decoded, StripSelector};
use crate::config::PAYLOAD_TIMEOUT;
use crate::error::{FrameError, PayloadError};
use crate::frame::{CanFrame, FrameHeader, HEADER_SIZE, MAX_FRAME_BYTES};
use crate::intent::{StripCommand, StripCommandSender};
use crate::stream::StreamBuffer;

/// Strips a command was forwarded to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Targets {
    One(StripSelector),
    Both,
}

/// Why a well-formed frame led to no strip change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Identifier is not for this board
    Unrecognized(u16),
    /// Recognized identifier with a bad payload
    Payload(PayloadError),
    /// Command has no strip action (status)
    NoStripAction,
    /// Every addressed strip queue was full; the command was lost
    QueueFull,
}

/// Outcome of one dispatcher step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// `targets` lists the strips that actually got the command. A global
    /// command reports a single strip when the other queue was full.
    Applied { command: Command, targets: Targets },
    Ignored(IgnoreReason),
    /// Torn or malformed frame; RX stream was reset
    Dropped(FrameError),
}

pub struct Dispatcher<'a, const SIZE: usize, const QUEUE: usize> {
    rx: &'a StreamBuffer<SIZE>,
    address: DeviceAddress,
    strips: [StripCommandSender<'a, QUEUE>; 2],
}

impl<'a, const SIZE: usize, const QUEUE: usize> Dispatcher<'a, SIZE, QUEUE> {
    pub const fn new(
        rx: &'a StreamBuffer<SIZE>,
        address: DeviceAddress,
        strips: [StripCommandSender<'a, QUEUE>; 2],
    ) -> Self {
        Self { rx, address, strips }
    }

    pub const fn address(&self) -> DeviceAddress {
        self.address
    }

    /// Wait for the next frame on the RX stream and dispatch it.
    ///
    /// The header read waits forever. The payload must follow within
    /// [`PAYLOAD_TIMEOUT`]; a short read means the frame was torn and the
    /// stream is reset so the next read starts on a header boundary.
    pub async fn process_next(&mut self) -> Dispatch {
        let mut header = [0; HEADER_SIZE];
        self.rx.receive(&mut header).await;
        let header = match FrameHeader::from_bytes(header) {
            Ok(header) => header,
            Err(err) => return self.drop_frame(err),
        };

        let mut payload = [0; MAX_FRAME_BYTES - HEADER_SIZE];
        let payload = &mut payload[..header.len()];
        let received = self.rx.receive_with_timeout(payload, PAYLOAD_TIMEOUT).await;
        if received != header.len() {
            return self.drop_frame(FrameError::LengthMismatch {
                expected: HEADER_SIZE + header.len(),
                received: HEADER_SIZE + received,
            });
        }

        match CanFrame::from_parts(header, payload) {
            Ok(frame) => self.dispatch(&frame),
            Err(err) => self.drop_frame(err),
        }
    }

    /// Decode one frame and queue its strip command.
    pub fn dispatch(&self, frame: &CanFrame) -> Dispatch {
        let (kind, targets) = match codec::decode_id(frame.identifier(), self.address) {
            Decoded::Strip { kind, strip } => (kind, Targets::One(strip)),
            Decoded::Global(kind) => (kind, Targets::Both),
            Decoded::Unrecognized => {
                return Dispatch::Ignored(IgnoreReason::Unrecognized(frame.identifier()));
            }
        };

        let command = match Command::decode(kind, frame.payload()) {
            Ok(command) => command,
            Err(err) => {
                #[cfg(feature = "esp32-log")]
                println!(
                    "[Dispatcher.dispatch] bad payload for {:#x}: {}",
                    frame.identifier(),
                    err
                );
                return Dispatch::Ignored(IgnoreReason::Payload(err));
            }
        };

        let Some(strip_command) = StripCommand::from_command(command) else {
            return Dispatch::Ignored(IgnoreReason::NoStripAction);
        };

        let targets = match targets {
            Targets::One(strip) => self.forward(strip, strip_command).then_some(targets),
            Targets::Both => {
                let first = self.forward(StripSelector::Strip0, strip_command);
                let second = self.forward(StripSelector::Strip1, strip_command);
                match (first, second) {
                    (true, true) => Some(Targets::Both),
                    (true, false) => Some(Targets::One(StripSelector::Strip0)),
                    (false, true) => Some(Targets::One(StripSelector::Strip1)),
                    (false, false) => None,
                }
            }
        };
        let Some(targets) = targets else {
            return Dispatch::Ignored(IgnoreReason::QueueFull);
        };

        #[cfg(feature = "esp32-log")]
        println!("[Dispatcher.dispatch] {:?} -> {:?}", command, targets);
        Dispatch::Applied { command, targets }
    }

    /// Task body
    pub async fn run(&mut self) -> ! {
        loop {
            self.process_next().await;
        }
    }

    fn forward(&self, strip: StripSelector, command: StripCommand) -> bool {
        self.strips[strip.index()].try_send(command).is_ok()
    }

    fn drop_frame(&self, err: FrameError) -> Dispatch {
        #[cfg(feature = "esp32-log")]
        println!("[Dispatcher.process_next] dropping frame: {}", err);
        self.rx.reset();
        Dispatch::Dropped(err)
    }
}
