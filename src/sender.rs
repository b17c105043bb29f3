//! Outbound frames
//!
//! Encodes commands and writes them into the TX stream, from where the bus
//! task hands them to the peripheral.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::codec::{Command, StripSelector};
use crate::frame::{CanFrame, MAX_FRAME_BYTES};
use crate::stream::StreamBuffer;

/// Producer side of the TX stream
#[derive(Clone, Copy)]
pub struct FrameSender<'a, const SIZE: usize> {
    tx: &'a StreamBuffer<SIZE>,
}

impl<'a, const SIZE: usize> FrameSender<'a, SIZE> {
    pub const fn new(tx: &'a StreamBuffer<SIZE>) -> Self {
        Self { tx }
    }

    /// Send `command` to one strip of a light driver.
    ///
    /// Waits for room in the TX stream. Returns `false` if the frame could not
    /// be built or can never fit.
    pub async fn send(&self, command: Command, driver_index: u8, strip: StripSelector) -> bool {
        match CanFrame::command(command, driver_index, strip) {
            Ok(frame) => self.send_frame(&frame).await,
            Err(_err) => {
                #[cfg(feature = "esp32-log")]
                println!("[FrameSender.send] cannot encode {:?}: {}", command, _err);
                false
            }
        }
    }

    /// Send `command` to both strips of every light driver.
    pub async fn broadcast(&self, command: Command) -> bool {
        self.send(command, 0, StripSelector::Strip0).await
    }

    /// Write header and payload of `frame` as one stream write.
    pub async fn send_frame(&self, frame: &CanFrame) -> bool {
        let mut bytes = [0; MAX_FRAME_BYTES];
        let len = frame.to_bytes(&mut bytes);
        self.tx.send(&bytes[..len]).await
    }
}
