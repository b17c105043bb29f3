//! Time-based crossfade between two values

use embassy_time::{Duration, Instant};

use crate::color::{Rgb, blend_colors};
use crate::math8::progress8;

/// Blends two values of type `T` using a progress value (0-255)
pub type ValueBlender<T> = fn(T, T, u8) -> T;

#[derive(Debug, Clone, Copy)]
struct Run<T> {
    from: T,
    to: T,
    started: Instant,
    duration: Duration,
}

/// A value that glides towards its target over a fixed duration
#[derive(Debug, Clone)]
pub struct ValueTransition<T: Copy> {
    blend: ValueBlender<T>,
    current: T,
    run: Option<Run<T>>,
}

impl<T: Copy> ValueTransition<T> {
    pub const fn new(initial: T, blend: ValueBlender<T>) -> Self {
        Self {
            blend,
            current: initial,
            run: None,
        }
    }

    pub const fn current(&self) -> T {
        self.current
    }

    /// Final value of the running transition, or the current value
    pub fn target(&self) -> T {
        self.run.map_or(self.current, |run| run.to)
    }

    pub const fn is_transitioning(&self) -> bool {
        self.run.is_some()
    }

    /// Start gliding from the current value to `value`.
    ///
    /// A zero duration jumps immediately.
    pub fn set(&mut self, value: T, duration: Duration, now: Instant) {
        if duration.as_ticks() == 0 {
            self.current = value;
            self.run = None;
            return;
        }
        self.run = Some(Run {
            from: self.current,
            to: value,
            started: now,
            duration,
        });
    }

    /// Advance to `now`
    pub fn tick(&mut self, now: Instant) {
        let Some(run) = self.run else {
            return;
        };
        let elapsed = now.checked_duration_since(run.started).unwrap_or_default();
        if elapsed >= run.duration {
            self.current = run.to;
            self.run = None;
            return;
        }
        self.current = (self.blend)(run.from, run.to, progress8(elapsed, run.duration));
    }
}

impl ValueTransition<Rgb> {
    pub const fn new_rgb(initial: Rgb) -> Self {
        Self::new(initial, blend_colors)
    }
}
