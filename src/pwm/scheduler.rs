//! Strip task pacing
//!
//! Each tick drains the strip's command queue, advances its fades and writes
//! gamma-corrected duty values to both PWM channels. The caller sleeps until
//! the returned deadline: the next fade step while fading, one refresh period
//! otherwise.

use embassy_time::{Duration, Instant, Timer};

use super::gamma::GammaTable;
use super::mix::ChannelLevels;
use super::strip::LedStrip;
use crate::intent::CommandProcessor;
use crate::{PwmOutput, WhiteChannel};

/// Result of a strip tick.
#[derive(Debug, Clone, Copy)]
pub struct TickResult {
    /// Linear levels that were written (before gamma)
    pub levels: ChannelLevels,
    /// When to tick again
    pub next_deadline: Instant,
    /// How long to wait until then (zero if behind schedule)
    pub sleep_duration: Duration,
}

/// Owner of one strip and its PWM outputs.
pub struct StripTask<'a, P: PwmOutput, const QUEUE: usize> {
    strip: LedStrip,
    commands: CommandProcessor<'a, QUEUE>,
    gamma: &'a GammaTable,
    output: P,
    next_refresh: Instant,
    refresh: Duration,
}

impl<'a, P: PwmOutput, const QUEUE: usize> StripTask<'a, P, QUEUE> {
    pub fn new(
        strip: LedStrip,
        commands: CommandProcessor<'a, QUEUE>,
        gamma: &'a GammaTable,
        output: P,
        refresh: Duration,
    ) -> Self {
        Self {
            strip,
            commands,
            gamma,
            output,
            next_refresh: Instant::from_ticks(0),
            refresh,
        }
    }

    /// Process one tick at `now`.
    pub fn tick(&mut self, now: Instant) -> TickResult {
        self.commands.process_pending(&mut self.strip, now);
        let levels = self.strip.tick(now);

        self.output
            .set_duty(WhiteChannel::Warm, self.gamma.duty(levels.warm));
        self.output
            .set_duty(WhiteChannel::Cold, self.gamma.duty(levels.cold));

        // Drift correction: after a long stall, restart pacing from now
        // instead of bursting through the backlog
        if now > self.next_refresh + self.refresh * 2 {
            self.next_refresh = now;
        }
        self.next_refresh += self.refresh;

        let next_deadline = self
            .strip
            .next_step_at()
            .map_or(self.next_refresh, |step| step.min(self.next_refresh));
        let sleep_duration = next_deadline
            .checked_duration_since(now)
            .unwrap_or_default();

        TickResult {
            levels,
            next_deadline,
            sleep_duration,
        }
    }

    /// Task body
    pub async fn run(&mut self) -> ! {
        loop {
            let result = self.tick(Instant::now());
            Timer::at(result.next_deadline).await;
        }
    }

    pub const fn strip(&self) -> &LedStrip {
        &self.strip
    }

    pub fn strip_mut(&mut self) -> &mut LedStrip {
        &mut self.strip
    }

    pub const fn output(&self) -> &P {
        &self.output
    }
}
