//! Board contexts
//!
//! Each firmware image creates exactly one context, usually in a
//! `static`, and hands out references to its tasks. A context owns every
//! piece of shared state of its role, so tasks never reach for globals.

use heapless::Vec;

use crate::address::{DeviceAddress, MAX_FILTERS, Role, acceptance_filters};
use crate::bus::BusReady;
use crate::codec::StripSelector;
use crate::config::{STREAM_BUFFER_SIZE, STRIP_QUEUE_SIZE};
use crate::config::panel::FEEDBACK_QUEUE_SIZE;
use crate::dispatcher::Dispatcher;
use crate::error::{Error, Result};
use crate::intent::{CommandProcessor, StripCommandChannel, StripCommandSender};
use crate::panel::FeedbackChannel;
use crate::sender::FrameSender;
use crate::stream::StreamBuffer;

/// Shared state of a light driver board
pub struct LightDriverContext<const SIZE: usize, const QUEUE: usize> {
    address: DeviceAddress,
    rx: StreamBuffer<SIZE>,
    tx: StreamBuffer<SIZE>,
    bus_ready: BusReady,
    strips: [StripCommandChannel<QUEUE>; 2],
}

impl<const SIZE: usize, const QUEUE: usize> LightDriverContext<SIZE, QUEUE> {
    /// Fails for control panel addresses and for unconfigured pins.
    pub fn new(address: DeviceAddress) -> Result<Self> {
        if address.role() != Role::LightDriver {
            return Err(Error::WrongRole);
        }
        Ok(Self {
            address: address.validate()?,
            rx: StreamBuffer::new(),
            tx: StreamBuffer::new(),
            bus_ready: BusReady::new(),
            strips: [StripCommandChannel::new(), StripCommandChannel::new()],
        })
    }

    pub const fn address(&self) -> DeviceAddress {
        self.address
    }

    /// Stream filled by the receive interrupt
    pub const fn rx(&self) -> &StreamBuffer<SIZE> {
        &self.rx
    }

    /// Stream drained by the bus task
    pub const fn tx(&self) -> &StreamBuffer<SIZE> {
        &self.tx
    }

    pub const fn bus_ready(&self) -> &BusReady {
        &self.bus_ready
    }

    /// Call once filters are configured and the peripheral is started.
    pub fn mark_bus_ready(&self) {
        self.bus_ready.signal(());
    }

    pub fn acceptance_filters(&self) -> Vec<u16, MAX_FILTERS> {
        acceptance_filters(self.address)
    }

    pub fn dispatcher(&self) -> Dispatcher<'_, SIZE, QUEUE> {
        Dispatcher::new(
            &self.rx,
            self.address,
            [self.strip_sender(StripSelector::Strip0), self.strip_sender(StripSelector::Strip1)],
        )
    }

    pub const fn strip_sender(&self, strip: StripSelector) -> StripCommandSender<'_, QUEUE> {
        self.strips[strip.index()].sender()
    }

    /// Command queue consumer for the task that owns `strip`
    pub const fn command_processor(&self, strip: StripSelector) -> CommandProcessor<'_, QUEUE> {
        CommandProcessor::new(self.strips[strip.index()].receiver())
    }

    pub const fn sender(&self) -> FrameSender<'_, SIZE> {
        FrameSender::new(&self.tx)
    }
}

/// Shared state of a control panel board
pub struct ControlPanelContext<const SIZE: usize, const FEEDBACK: usize> {
    address: DeviceAddress,
    tx: StreamBuffer<SIZE>,
    bus_ready: BusReady,
    feedback: FeedbackChannel<FEEDBACK>,
}

impl<const SIZE: usize, const FEEDBACK: usize> ControlPanelContext<SIZE, FEEDBACK> {
    pub fn new(address: DeviceAddress) -> Result<Self> {
        if address.role() != Role::ControlPanel {
            return Err(Error::WrongRole);
        }
        Ok(Self {
            address: address.validate()?,
            tx: StreamBuffer::new(),
            bus_ready: BusReady::new(),
            feedback: FeedbackChannel::new(),
        })
    }

    pub const fn address(&self) -> DeviceAddress {
        self.address
    }

    pub const fn tx(&self) -> &StreamBuffer<SIZE> {
        &self.tx
    }

    pub const fn bus_ready(&self) -> &BusReady {
        &self.bus_ready
    }

    pub fn mark_bus_ready(&self) {
        self.bus_ready.signal(());
    }

    pub const fn feedback(&self) -> &FeedbackChannel<FEEDBACK> {
        &self.feedback
    }

    pub const fn sender(&self) -> FrameSender<'_, SIZE> {
        FrameSender::new(&self.tx)
    }
}

pub type DefaultLightDriverContext = LightDriverContext<STREAM_BUFFER_SIZE, STRIP_QUEUE_SIZE>;
pub type DefaultControlPanelContext = ControlPanelContext<STREAM_BUFFER_SIZE, FEEDBACK_QUEUE_SIZE>;
