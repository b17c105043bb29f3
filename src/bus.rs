//! CAN bus interface
//!
//! Two duties share the peripheral:
//! - the receive interrupt copies every frame from the hardware FIFO into the
//!   RX stream ([`RxInterrupt`])
//! - the bus task drains the TX stream and hands frames to the hardware
//!   ([`BusInterface`])
//!
//! The bus task stays idle until board address resolution and filter setup
//! have signalled [`BusReady`].

use core::cell::RefCell;
use core::fmt::Debug;

use critical_section::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::config::PAYLOAD_TIMEOUT;
use crate::error::{Error, FrameError, Result};
use crate::frame::{CanFrame, FrameHeader, HEADER_SIZE, MAX_FRAME_BYTES};
use crate::stream::StreamBuffer;

/// Receive half of a CAN peripheral, used from interrupt context.
pub trait CanRx {
    /// Pop the next frame from the hardware receive FIFO.
    fn read_frame(&mut self) -> Option<CanFrame>;
}

/// Transmit half of a CAN peripheral.
pub trait CanTx {
    type Error: Debug;

    /// Queue a frame for transmission.
    fn submit(&mut self, frame: &CanFrame) -> core::result::Result<(), Self::Error>;
}

/// Set once the bus is configured and started.
pub type BusReady = Signal<CriticalSectionRawMutex, ()>;

/// Receive-interrupt handler
pub struct RxInterrupt<'a, R: CanRx, const SIZE: usize> {
    rx: R,
    stream: &'a StreamBuffer<SIZE>,
    dropped: u32,
}

impl<'a, R: CanRx, const SIZE: usize> RxInterrupt<'a, R, SIZE> {
    pub fn new(rx: Option<R>, stream: &'a StreamBuffer<SIZE>) -> Result<Self> {
        let rx = rx.ok_or(Error::PeripheralMissing)?;
        Ok(Self {
            rx,
            stream,
            dropped: 0,
        })
    }

    /// Handle a "frame available" interrupt.
    ///
    /// Copies header and payload of every pending frame into the RX stream in
    /// a single write per frame. Returns `true` if a waiting task was given
    /// data, i.e. a context switch should be requested on exit.
    pub fn on_frame_available(&mut self) -> bool {
        let mut woken = false;
        let mut bytes = [0; MAX_FRAME_BYTES];
        while let Some(frame) = self.rx.read_frame() {
            let len = frame.to_bytes(&mut bytes);
            if self.stream.send_from_interrupt(&bytes[..len]) {
                woken = true;
            } else {
                self.dropped = self.dropped.wrapping_add(1);
            }
        }
        woken
    }

    /// Frames lost to a full RX stream since boot
    pub const fn dropped(&self) -> u32 {
        self.dropped
    }
}

/// Holder for the one receive-interrupt handler of the board.
///
/// Declared as a `static`, filled once during init and used by the
/// interrupt vector:
///
/// ```ignore
/// static CAN_RX: InterruptSlot<FdcanRx, STREAM_BUFFER_SIZE> = InterruptSlot::new();
///
/// #[interrupt]
/// fn FDCAN1_IT0() {
///     if CAN_RX.on_interrupt() {
///         cortex_m::peripheral::SCB::set_pendsv();
///     }
/// }
/// ```
pub struct InterruptSlot<R: CanRx + Send + 'static, const SIZE: usize> {
    handler: Mutex<RefCell<Option<RxInterrupt<'static, R, SIZE>>>>,
}

impl<R: CanRx + Send + 'static, const SIZE: usize> InterruptSlot<R, SIZE> {
    pub const fn new() -> Self {
        Self {
            handler: Mutex::new(RefCell::new(None)),
        }
    }

    /// Install the handler. Only the first call succeeds.
    pub fn install(&self, handler: RxInterrupt<'static, R, SIZE>) -> Result<()> {
        critical_section::with(|cs| {
            let mut slot = self.handler.borrow_ref_mut(cs);
            if slot.is_some() {
                return Err(Error::InterruptAlreadyInstalled);
            }
            *slot = Some(handler);
            Ok(())
        })
    }

    /// Interrupt entry point. Does nothing before [`install`](Self::install).
    pub fn on_interrupt(&self) -> bool {
        critical_section::with(|cs| {
            self.handler
                .borrow_ref_mut(cs)
                .as_mut()
                .is_some_and(RxInterrupt::on_frame_available)
        })
    }

    /// Frames dropped by the installed handler
    pub fn dropped(&self) -> u32 {
        critical_section::with(|cs| {
            self.handler
                .borrow_ref(cs)
                .as_ref()
                .map_or(0, RxInterrupt::dropped)
        })
    }
}

impl<R: CanRx + Send + 'static, const SIZE: usize> Default for InterruptSlot<R, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle of the bus task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusState {
    Uninitialized,
    WaitingForBusReady,
    Running,
}

/// What happened to one message taken from the TX stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxOutcome {
    /// Handed to the hardware
    Sent(u16),
    /// Torn or malformed message, dropped without retry
    Discarded(FrameError),
    /// Hardware refused the frame
    Rejected(u16),
}

/// Bus task: moves frames from the TX stream to the peripheral.
pub struct BusInterface<'a, T: CanTx, const SIZE: usize> {
    tx: T,
    stream: &'a StreamBuffer<SIZE>,
    ready: &'a BusReady,
    state: BusState,
}

impl<'a, T: CanTx, const SIZE: usize> BusInterface<'a, T, SIZE> {
    /// A missing peripheral is a configuration error and must halt the board.
    pub fn new(tx: Option<T>, stream: &'a StreamBuffer<SIZE>, ready: &'a BusReady) -> Result<Self> {
        let tx = tx.ok_or(Error::PeripheralMissing)?;
        Ok(Self {
            tx,
            stream,
            ready,
            state: BusState::Uninitialized,
        })
    }

    pub const fn state(&self) -> BusState {
        self.state
    }

    /// Block until the bus has been configured.
    pub async fn wait_until_ready(&mut self) {
        if self.state == BusState::Running {
            return;
        }
        self.state = BusState::WaitingForBusReady;
        self.ready.wait().await;
        self.state = BusState::Running;
        #[cfg(feature = "esp32-log")]
        println!("[BusInterface.wait_until_ready] bus running");
    }

    /// Wait for the next message and submit it.
    ///
    /// The message is accepted only if exactly `HEADER_SIZE + header.len()`
    /// bytes arrive; anything else resets the TX stream.
    pub async fn transmit_next(&mut self) -> TxOutcome {
        let mut header = [0; HEADER_SIZE];
        self.stream.receive(&mut header).await;
        let header = match FrameHeader::from_bytes(header) {
            Ok(header) => header,
            Err(err) => return self.discard(err),
        };

        let mut payload = [0; MAX_FRAME_BYTES - HEADER_SIZE];
        let payload = &mut payload[..header.len()];
        let received = HEADER_SIZE
            + self
                .stream
                .receive_with_timeout(payload, PAYLOAD_TIMEOUT)
                .await;
        let expected = HEADER_SIZE + header.len();
        if received != expected {
            return self.discard(FrameError::LengthMismatch { expected, received });
        }

        let frame = match CanFrame::from_parts(header, payload) {
            Ok(frame) => frame,
            Err(err) => return self.discard(err),
        };
        match self.tx.submit(&frame) {
            Ok(()) => TxOutcome::Sent(frame.identifier()),
            Err(_err) => {
                #[cfg(feature = "esp32-log")]
                println!(
                    "[BusInterface.transmit_next] hardware rejected {:#x}: {:?}",
                    frame.identifier(),
                    _err
                );
                TxOutcome::Rejected(frame.identifier())
            }
        }
    }

    /// Task body
    pub async fn run(&mut self) -> ! {
        self.wait_until_ready().await;
        loop {
            self.transmit_next().await;
        }
    }

    fn discard(&self, err: FrameError) -> TxOutcome {
        #[cfg(feature = "esp32-log")]
        println!("[BusInterface.transmit_next] discarding message: {}", err);
        self.stream.reset();
        TxOutcome::Discarded(err)
    }
}
