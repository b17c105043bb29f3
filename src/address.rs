//! Board addressing
//!
//! Every board reads three address pins once at boot. The resulting index
//! together with the board role decides which identifiers the board sends and
//! accepts.

use heapless::Vec;

use crate::codec::{CommandKind, StripSelector, encode_id};
use crate::error::{Error, Result};

/// Highest index the three address pins can express.
pub const MAX_INDEX: u8 = 7;

/// Maximum number of hardware acceptance filters a board configures.
pub const MAX_FILTERS: usize = 6;

/// Board role, fixed per firmware image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    ControlPanel,
    LightDriver,
}

/// Resolved board address. Immutable after boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceAddress {
    role: Role,
    index: u8,
}

impl DeviceAddress {
    /// Build an address from the state of the three address pins.
    pub fn from_pins(role: Role, pins: [bool; 3]) -> Self {
        let index = pins
            .iter()
            .enumerate()
            .fold(0, |acc, (bit, &set)| acc | (u8::from(set) << bit));
        Self { role, index }
    }

    /// Address of a light driver. Index 0 means the pins were never set.
    pub const fn light_driver(index: u8) -> Result<Self> {
        if index == 0 {
            return Err(Error::UnconfiguredAddress);
        }
        if index > MAX_INDEX {
            return Err(Error::AddressOutOfRange(index));
        }
        Ok(Self {
            role: Role::LightDriver,
            index,
        })
    }

    /// Address of a control panel. Index 0 is the main panel.
    pub const fn control_panel(index: u8) -> Result<Self> {
        if index > MAX_INDEX {
            return Err(Error::AddressOutOfRange(index));
        }
        Ok(Self {
            role: Role::ControlPanel,
            index,
        })
    }

    /// Check that the address may join the bus.
    pub const fn validate(self) -> Result<Self> {
        match self.role {
            Role::LightDriver => Self::light_driver(self.index),
            Role::ControlPanel => Self::control_panel(self.index),
        }
    }

    pub const fn role(self) -> Role {
        self.role
    }

    pub const fn index(self) -> u8 {
        self.index
    }
}

/// Identifiers the CAN acceptance filters must let through.
///
/// Derived from [`encode_id`] so that hardware filtering and
/// [`decode_id`](crate::codec::decode_id) never disagree.
pub fn acceptance_filters(address: DeviceAddress) -> Vec<u16, MAX_FILTERS> {
    let mut filters = Vec::new();
    if address.role != Role::LightDriver {
        return filters;
    }

    let commands = [CommandKind::Brightness, CommandKind::ColorTemperature];
    let targets = [
        (0, StripSelector::Strip0),
        (address.index, StripSelector::Strip0),
        (address.index, StripSelector::Strip1),
    ];
    for (driver_index, strip) in targets {
        for kind in commands {
            // capacity matches the loop bounds
            let _ = filters.push(encode_id(kind, driver_index, strip));
        }
    }
    filters
}
