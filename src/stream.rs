//! Interrupt-safe byte stream
//!
//! Carries encoded frames between interrupt context and tasks, once for CAN RX
//! (ISR to dispatcher) and once for CAN TX (sender to bus task).
//!
//! Writes are all-or-nothing: a write that does not fit is dropped as a whole
//! and reported with `false`, so the interrupt never waits. Readers block
//! cooperatively on a [`Signal`] until their buffer is full or a deadline
//! passes. A reader that detects a torn frame calls [`StreamBuffer::reset`] to
//! resynchronize on the next header.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, with_deadline};
use heapless::Deque;

/// Bounded byte stream with one reader and ISR-safe writers
pub struct StreamBuffer<const SIZE: usize> {
    bytes: Mutex<RefCell<Deque<u8, SIZE>>>,
    data_available: Signal<CriticalSectionRawMutex, ()>,
    space_available: Signal<CriticalSectionRawMutex, ()>,
}

impl<const SIZE: usize> StreamBuffer<SIZE> {
    pub const fn new() -> Self {
        Self {
            bytes: Mutex::new(RefCell::new(Deque::new())),
            data_available: Signal::new(),
            space_available: Signal::new(),
        }
    }

    /// Write `bytes` without blocking.
    ///
    /// Safe to call from an interrupt handler. Returns `false` and drops the
    /// whole write if it does not fit.
    pub fn send_from_interrupt(&self, bytes: &[u8]) -> bool {
        let written = critical_section::with(|cs| {
            let mut queue = self.bytes.borrow_ref_mut(cs);
            if SIZE - queue.len() < bytes.len() {
                return false;
            }
            for &byte in bytes {
                // room was checked above
                let _ = queue.push_back(byte);
            }
            true
        });
        if written && !bytes.is_empty() {
            self.data_available.signal(());
        }
        written
    }

    /// Write `bytes` from a task, waiting until there is room.
    ///
    /// Returns `false` only if `bytes` can never fit.
    pub async fn send(&self, bytes: &[u8]) -> bool {
        if bytes.len() > SIZE {
            return false;
        }
        loop {
            if self.send_from_interrupt(bytes) {
                return true;
            }
            self.space_available.wait().await;
        }
    }

    /// Fill `buf` completely, waiting as long as it takes.
    pub async fn receive(&self, buf: &mut [u8]) -> usize {
        let mut filled = 0;
        loop {
            filled += self.take(&mut buf[filled..]);
            if filled == buf.len() {
                return filled;
            }
            self.data_available.wait().await;
        }
    }

    /// Fill `buf`, giving up once `timeout` has elapsed.
    ///
    /// Returns the number of bytes copied: `buf.len()` on success, less
    /// (usually 0) on timeout.
    pub async fn receive_with_timeout(&self, buf: &mut [u8], timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        let mut filled = 0;
        loop {
            filled += self.take(&mut buf[filled..]);
            if filled == buf.len() {
                return filled;
            }
            if with_deadline(deadline, self.data_available.wait())
                .await
                .is_err()
            {
                return filled + self.take(&mut buf[filled..]);
            }
        }
    }

    /// Discard everything buffered, including half-written frames.
    pub fn reset(&self) {
        critical_section::with(|cs| self.bytes.borrow_ref_mut(cs).clear());
        self.data_available.reset();
        self.space_available.signal(());
    }

    /// Bytes currently buffered
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.bytes.borrow_ref(cs).len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move as many buffered bytes as fit into `buf`.
    fn take(&self, buf: &mut [u8]) -> usize {
        if buf.is_empty() {
            return 0;
        }
        let taken = critical_section::with(|cs| {
            let mut queue = self.bytes.borrow_ref_mut(cs);
            buf.iter_mut()
                .map_while(|slot| queue.pop_front().map(|byte| *slot = byte))
                .count()
        });
        if taken > 0 {
            self.space_available.signal(());
        }
        taken
    }
}

impl<const SIZE: usize> Default for StreamBuffer<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}
