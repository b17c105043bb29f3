//! Stepped fades of a single PWM channel
//!
//! A fade moves the linear level one unit per step, spread evenly over the
//! fade duration. When that would need delays shorter than one scheduler
//! tick, steps are widened to `ceil(distance / max_steps)` units and the
//! distance is trimmed to a multiple of the step size, so the last step lands
//! exactly on the target. The trimmed remainder (less than one step) is
//! applied when the fade starts.

use embassy_time::{Duration, Instant};

use crate::config::FadeTimings;

/// Whether the channel is moving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeMode {
    Steady,
    Fading,
}

/// Step schedule computed once when a fade starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadePlan {
    /// Level the fade starts from, aligned to the step size
    pub start: u16,
    /// Level units per step
    pub step_size: u16,
    /// Delay between two steps
    pub step_delay: Duration,
    /// Number of steps until the target is reached
    pub steps: u16,
}

/// Plan a fade from `current` to `target`.
#[allow(clippy::cast_possible_truncation)]
pub fn plan_fade(current: u16, target: u16, timings: &FadeTimings) -> FadePlan {
    let distance = current.abs_diff(target);
    if distance == 0 {
        return FadePlan {
            start: target,
            step_size: 1,
            step_delay: Duration::from_ticks(0),
            steps: 0,
        };
    }

    let duration = timings.duration.as_ticks();
    let max_steps = timings.max_steps();
    let distance_ticks = u64::from(distance);

    if distance_ticks <= max_steps {
        return FadePlan {
            start: current,
            step_size: 1,
            step_delay: Duration::from_ticks(duration / distance_ticks),
            steps: distance,
        };
    }

    // one step per tick is not fine enough: widen the steps
    let step_size = distance_ticks.div_ceil(max_steps);
    let step_delay = duration * step_size / distance_ticks;
    let aligned = (distance_ticks - distance_ticks % step_size) as u16;
    let start = if current < target {
        target - aligned
    } else {
        target + aligned
    };

    FadePlan {
        start,
        step_size: step_size as u16,
        step_delay: Duration::from_ticks(step_delay.max(timings.tick.as_ticks())),
        steps: (distance_ticks / step_size) as u16,
    }
}

/// Level and fade progress of one white channel.
///
/// `remaining_steps == 0` always means `Steady` with `current == target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelState {
    current: u16,
    target: u16,
    step_size: u16,
    step_delay: Duration,
    remaining_steps: u16,
    mode: FadeMode,
    next_step_at: Instant,
}

impl ChannelState {
    pub const fn new(level: u16) -> Self {
        Self {
            current: level,
            target: level,
            step_size: 1,
            step_delay: Duration::from_ticks(0),
            remaining_steps: 0,
            mode: FadeMode::Steady,
            next_step_at: Instant::from_ticks(0),
        }
    }

    /// Jump to `level`, cancelling any fade.
    pub fn set_immediate(&mut self, level: u16) {
        *self = Self::new(level);
    }

    /// Start fading from wherever the channel is now towards `target`.
    pub fn fade_to(&mut self, target: u16, timings: &FadeTimings, now: Instant) {
        let plan = plan_fade(self.current, target, timings);
        if plan.steps == 0 {
            self.set_immediate(target);
            return;
        }

        self.current = plan.start;
        self.target = target;
        self.step_size = plan.step_size;
        self.step_delay = plan.step_delay;
        self.remaining_steps = plan.steps;
        self.mode = FadeMode::Fading;
        self.next_step_at = now + plan.step_delay;
    }

    /// Perform every step that is due at `now`. Returns whether the level changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        while self.mode == FadeMode::Fading && now >= self.next_step_at {
            self.step();
            self.next_step_at += self.step_delay;
            changed = true;
        }
        changed
    }

    fn step(&mut self) {
        self.current = if self.current < self.target {
            self.current.saturating_add(self.step_size).min(self.target)
        } else {
            self.current.saturating_sub(self.step_size).max(self.target)
        };
        self.remaining_steps = self.remaining_steps.saturating_sub(1);

        if self.remaining_steps == 0 || self.current == self.target {
            self.current = self.target;
            self.remaining_steps = 0;
            self.mode = FadeMode::Steady;
        }
    }

    pub const fn level(&self) -> u16 {
        self.current
    }

    pub const fn target(&self) -> u16 {
        self.target
    }

    pub const fn step_size(&self) -> u16 {
        self.step_size
    }

    pub const fn step_delay(&self) -> Duration {
        self.step_delay
    }

    pub const fn remaining_steps(&self) -> u16 {
        self.remaining_steps
    }

    pub const fn mode(&self) -> FadeMode {
        self.mode
    }

    pub fn is_fading(&self) -> bool {
        self.mode == FadeMode::Fading
    }

    /// When the next step is due, if a fade is running
    pub fn next_step_at(&self) -> Option<Instant> {
        self.is_fading().then_some(self.next_step_at)
    }
}

impl Default for ChannelState {
    fn default() -> Self {
        Self::new(0)
    }
}
