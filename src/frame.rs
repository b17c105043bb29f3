//! CAN frames and their byte layout inside the RX/TX streams
//!
//! A frame travels through a stream as a fixed [`HEADER_SIZE`] header followed by
//! exactly `len` payload bytes. The header is encoded explicitly (identifier
//! little-endian, then the data length) and never aliased as a struct.

use crate::codec::{Command, MAX_PAYLOAD, StripSelector, encode_id};
use crate::error::FrameError;

/// Bytes of the encoded frame header.
pub const HEADER_SIZE: usize = 3;

/// Largest encoded frame.
pub const MAX_FRAME_BYTES: usize = HEADER_SIZE + MAX_PAYLOAD;

/// Highest standard (11-bit) identifier.
pub const MAX_IDENTIFIER: u16 = 0x7FF;

/// Frame header as it appears in a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    identifier: u16,
    len: u8,
}

impl FrameHeader {
    pub fn new(identifier: u16, len: u8) -> Result<Self, FrameError> {
        if identifier > MAX_IDENTIFIER {
            return Err(FrameError::IdentifierTooWide(identifier));
        }
        if usize::from(len) > MAX_PAYLOAD {
            return Err(FrameError::LengthTooLong(len));
        }
        Ok(Self { identifier, len })
    }

    pub const fn identifier(self) -> u16 {
        self.identifier
    }

    /// Payload bytes that follow the header
    pub const fn len(self) -> usize {
        self.len as usize
    }

    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    pub fn to_bytes(self) -> [u8; HEADER_SIZE] {
        let [low, high] = self.identifier.to_le_bytes();
        [low, high, self.len]
    }

    pub fn from_bytes(bytes: [u8; HEADER_SIZE]) -> Result<Self, FrameError> {
        let [low, high, len] = bytes;
        Self::new(u16::from_le_bytes([low, high]), len)
    }
}

/// A classic CAN data frame with a standard identifier.
///
/// The payload length always matches the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanFrame {
    header: FrameHeader,
    data: [u8; MAX_PAYLOAD],
}

impl CanFrame {
    pub fn new(identifier: u16, payload: &[u8]) -> Result<Self, FrameError> {
        let len = u8::try_from(payload.len())
            .map_err(|_| FrameError::LengthTooLong(u8::MAX))?;
        let header = FrameHeader::new(identifier, len)?;
        let mut data = [0; MAX_PAYLOAD];
        data[..payload.len()].copy_from_slice(payload);
        Ok(Self { header, data })
    }

    /// Frame carrying `command` to one strip of a driver (index 0 = global).
    pub fn command(command: Command, driver_index: u8, strip: StripSelector) -> Result<Self, FrameError> {
        let mut payload = [0; MAX_PAYLOAD];
        let len = command.encode(&mut payload);
        Self::new(
            encode_id(command.kind(), driver_index, strip),
            &payload[..len],
        )
    }

    /// Assemble a frame from a header and the bytes that followed it.
    pub fn from_parts(header: FrameHeader, payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() != header.len() {
            return Err(FrameError::LengthMismatch {
                expected: header.len(),
                received: payload.len(),
            });
        }
        Self::new(header.identifier, payload)
    }

    pub const fn header(&self) -> FrameHeader {
        self.header
    }

    pub const fn identifier(&self) -> u16 {
        self.header.identifier
    }

    pub fn payload(&self) -> &[u8] {
        &self.data[..self.header.len()]
    }

    /// Encode header and payload; returns the number of bytes written.
    pub fn to_bytes(&self, buf: &mut [u8; MAX_FRAME_BYTES]) -> usize {
        let len = HEADER_SIZE + self.header.len();
        buf[..HEADER_SIZE].copy_from_slice(&self.header.to_bytes());
        buf[HEADER_SIZE..len].copy_from_slice(self.payload());
        len
    }
}
