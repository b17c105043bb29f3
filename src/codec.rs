//! Identifier and payload codec
//!
//! Identifiers are composed as
//! `base(kind) + driver_index * DRIVER_OFFSET + strip * STRIP_OFFSET`.
//! Driver index 0 is reserved for global commands that reach both strips of
//! every light driver.
//!
//! Examples:
//! - brightness to driver 1, strip 0: `0x11 + 1 * 0x10 + 0 * 0x05 = 0x21`
//! - color temperature to driver 2, strip 1: `0x12 + 2 * 0x10 + 1 * 0x05 = 0x37`
//! - global brightness: `0x11`

use crate::address::DeviceAddress;
use crate::error::PayloadError;

/// Distance between the identifier blocks of two driver boards.
pub const DRIVER_OFFSET: u16 = 0x10;

/// Distance between the two strips of one driver board.
pub const STRIP_OFFSET: u16 = 0x05;

const BASE_STATUS: u16 = 0x10;
const BASE_BRIGHTNESS: u16 = 0x11;
const BASE_COLOR_TEMPERATURE: u16 = 0x12;
const BASE_RESERVED: u16 = 0x13;
const BASE_RESERVED2: u16 = 0x14;

/// Identifiers below this value belong to the global block.
const GLOBAL_LIMIT: u16 = BASE_STATUS + DRIVER_OFFSET;

/// Largest payload a classic CAN frame can carry.
pub const MAX_PAYLOAD: usize = 8;

/// Command carried by an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandKind {
    Status = BASE_STATUS as u8,
    Brightness = BASE_BRIGHTNESS as u8,
    ColorTemperature = BASE_COLOR_TEMPERATURE as u8,
    Reserved = BASE_RESERVED as u8,
    Reserved2 = BASE_RESERVED2 as u8,
}

impl CommandKind {
    pub const ALL: [Self; 5] = [
        Self::Status,
        Self::Brightness,
        Self::ColorTemperature,
        Self::Reserved,
        Self::Reserved2,
    ];

    /// Base identifier of this command
    pub const fn base(self) -> u16 {
        self as u16
    }

    /// Look up a command by its base identifier
    pub const fn from_base(value: u16) -> Option<Self> {
        Some(match value {
            BASE_STATUS => Self::Status,
            BASE_BRIGHTNESS => Self::Brightness,
            BASE_COLOR_TEMPERATURE => Self::ColorTemperature,
            BASE_RESERVED => Self::Reserved,
            BASE_RESERVED2 => Self::Reserved2,
            _ => return None,
        })
    }
}

/// One of the two strips owned by a light driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripSelector {
    /// Long side
    Strip0 = 0,
    /// Short side
    Strip1 = 1,
}

impl StripSelector {
    pub const BOTH: [Self; 2] = [Self::Strip0, Self::Strip1];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Result of decoding an identifier against the own address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// Command for one strip of this board
    Strip {
        kind: CommandKind,
        strip: StripSelector,
    },
    /// Command for both strips of every driver
    Global(CommandKind),
    /// Frame meant for somebody else, or garbage
    Unrecognized,
}

/// Compute the identifier for a command.
///
/// Callers supply in-range indices; nothing is validated here.
pub const fn encode_id(kind: CommandKind, driver_index: u8, strip: StripSelector) -> u16 {
    kind.base() + driver_index as u16 * DRIVER_OFFSET + strip as u16 * STRIP_OFFSET
}

/// Decode an identifier as seen by the board at `own`.
///
/// Inside the global block the identifier is the command base itself; there
/// is no strip offset, and global commands address both strips.
pub fn decode_id(identifier: u16, own: DeviceAddress) -> Decoded {
    if identifier < GLOBAL_LIMIT {
        return CommandKind::from_base(identifier).map_or(Decoded::Unrecognized, Decoded::Global);
    }

    let Some(residual) = identifier.checked_sub(u16::from(own.index()) * DRIVER_OFFSET) else {
        return Decoded::Unrecognized;
    };
    match split_strip(residual) {
        Some((kind, strip)) => Decoded::Strip { kind, strip },
        None => Decoded::Unrecognized,
    }
}

fn split_strip(residual: u16) -> Option<(CommandKind, StripSelector)> {
    let (residual, strip) = if residual > BASE_RESERVED2 {
        (residual.checked_sub(STRIP_OFFSET)?, StripSelector::Strip1)
    } else {
        (residual, StripSelector::Strip0)
    };
    CommandKind::from_base(residual).map(|kind| (kind, strip))
}

/// A command with its decoded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Status,
    /// Brightness in percent (0-100)
    Brightness(u8),
    /// Color temperature in Kelvin
    ColorTemperature(u16),
}

impl Command {
    pub const fn kind(self) -> CommandKind {
        match self {
            Self::Status => CommandKind::Status,
            Self::Brightness(_) => CommandKind::Brightness,
            Self::ColorTemperature(_) => CommandKind::ColorTemperature,
        }
    }

    /// Decode the payload of a recognized command.
    pub fn decode(kind: CommandKind, payload: &[u8]) -> Result<Self, PayloadError> {
        match (kind, payload) {
            (CommandKind::Status, []) => Ok(Self::Status),
            (CommandKind::Brightness, &[percent]) => Ok(Self::Brightness(percent)),
            (CommandKind::ColorTemperature, &[low, high]) => {
                Ok(Self::ColorTemperature(u16::from_le_bytes([low, high])))
            }
            (CommandKind::Reserved | CommandKind::Reserved2, _) => {
                Err(PayloadError::UnsupportedKind)
            }
            (_, payload) => Err(PayloadError::WrongLength(payload.len())),
        }
    }

    /// Write the payload into `buf` and return its length.
    pub fn encode(self, buf: &mut [u8; MAX_PAYLOAD]) -> usize {
        match self {
            Self::Status => 0,
            Self::Brightness(percent) => {
                buf[0] = percent;
                1
            }
            Self::ColorTemperature(kelvin) => {
                buf[..2].copy_from_slice(&kelvin.to_le_bytes());
                2
            }
        }
    }
}
