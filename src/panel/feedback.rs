//! Feedback LED bar
//!
//! Twelve addressable LEDs above the encoders. At boot the bar runs a color
//! sweep as a self-test, afterwards it shows the last changed setting and goes
//! dark after a few seconds without input.
//!
//! Animations are stored in an enum so the bar needs no allocation.

use embassy_time::{Duration, Instant, Timer};

use super::FeedbackRequest;
use crate::LedBarOutput;
use crate::channel::Receiver;
use crate::color::{BLUE, GREEN, OFF, RED, Rgb, WHITE, dim};
use crate::config::panel::{
    FEEDBACK_FADE, FEEDBACK_LEDS, FEEDBACK_OFF_FADE, FEEDBACK_REFRESH, FEEDBACK_TIMEOUT, MAX_LEVEL,
    SWEEP_PHASE,
};
use crate::transition::ValueTransition;

const fn rgb(r: u8, g: u8, b: u8) -> Rgb {
    Rgb { r, g, b }
}

/// Reference colors from warmest (left) to coldest (right)
pub const COLOR_TEMPERATURE_TEMPLATE: [Rgb; FEEDBACK_LEDS] = [
    rgb(255, 100, 0),
    rgb(255, 190, 0),
    rgb(255, 190, 50),
    rgb(255, 200, 100),
    rgb(255, 255, 100),
    rgb(255, 255, 255),
    rgb(230, 250, 255),
    rgb(150, 150, 255),
    rgb(100, 150, 255),
    rgb(100, 100, 255),
    rgb(50, 100, 255),
    rgb(0, 50, 255),
];

/// Lit part of the brightness view (50 %)
const BRIGHTNESS_ON: Rgb = dim(WHITE, 128);
/// Unlit part of the brightness view (5 %)
const BRIGHTNESS_BACKGROUND: Rgb = dim(BLUE, 13);
/// Template scale for unselected color temperatures (20 %)
const TEMPLATE_DIM: u8 = 51;
/// Template scale for the selected color temperature (80 %)
const TEMPLATE_SELECTED: u8 = 204;

pub trait BarAnimation {
    /// Render the frame for `now`
    fn render(&mut self, now: Instant, leds: &mut [Rgb]);

    /// Whether the animation has nothing left to show
    fn is_finished(&self) -> bool {
        false
    }
}

/// Startup self-test: every LED red, green, blue, then white.
#[derive(Debug, Clone, Default)]
pub struct ColorSweep {
    started: Option<Instant>,
    finished: bool,
}

impl ColorSweep {
    const PHASES: [Rgb; 4] = [RED, GREEN, BLUE, WHITE];

    pub const fn new() -> Self {
        Self {
            started: None,
            finished: false,
        }
    }
}

impl BarAnimation for ColorSweep {
    #[allow(clippy::cast_possible_truncation)]
    fn render(&mut self, now: Instant, leds: &mut [Rgb]) {
        let started = *self.started.get_or_insert(now);
        let elapsed = now.checked_duration_since(started).unwrap_or_default();
        let phase = (elapsed.as_ticks() / SWEEP_PHASE.as_ticks()) as usize;
        let color = match Self::PHASES.get(phase) {
            Some(&color) => color,
            None => {
                self.finished = true;
                OFF
            }
        };
        leds.fill(color);
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Brightness or color temperature view with per-LED crossfades
#[derive(Debug, Clone)]
pub struct StatusAnimation {
    leds: [ValueTransition<Rgb>; FEEDBACK_LEDS],
    timeout_at: Option<Instant>,
}

impl StatusAnimation {
    pub fn new() -> Self {
        Self {
            leds: core::array::from_fn(|_| ValueTransition::new_rgb(OFF)),
            timeout_at: None,
        }
    }

    /// Light the first `level` LEDs, dim the rest.
    pub fn show_brightness(&mut self, level: u8, now: Instant) {
        let lit = usize::from(level.min(MAX_LEVEL));
        self.show(
            |index| {
                if index < lit {
                    BRIGHTNESS_ON
                } else {
                    BRIGHTNESS_BACKGROUND
                }
            },
            now,
        );
    }

    /// Show the color template with the LED for `level` (1-based) highlighted.
    pub fn show_color_temperature(&mut self, level: u8, now: Instant) {
        let selected = usize::from(level.clamp(1, MAX_LEVEL)) - 1;
        self.show(
            |index| {
                let scale = if index == selected {
                    TEMPLATE_SELECTED
                } else {
                    TEMPLATE_DIM
                };
                dim(COLOR_TEMPERATURE_TEMPLATE[index], scale)
            },
            now,
        );
    }

    pub fn apply(&mut self, request: FeedbackRequest, now: Instant) {
        match request {
            FeedbackRequest::Brightness(level) => self.show_brightness(level, now),
            FeedbackRequest::ColorTemperature(level) => self.show_color_temperature(level, now),
        }
    }

    /// Fade every LED to black.
    pub fn turn_off(&mut self, now: Instant) {
        self.timeout_at = None;
        self.fade_all(|_| OFF, FEEDBACK_OFF_FADE, now);
    }

    pub fn is_transitioning(&self) -> bool {
        self.leds.iter().any(ValueTransition::is_transitioning)
    }

    /// When the bar will go dark, if a status is showing
    pub const fn timeout_at(&self) -> Option<Instant> {
        self.timeout_at
    }

    fn show(&mut self, color: impl Fn(usize) -> Rgb, now: Instant) {
        self.timeout_at = Some(now + FEEDBACK_TIMEOUT);
        self.fade_all(color, FEEDBACK_FADE, now);
    }

    fn fade_all(&mut self, color: impl Fn(usize) -> Rgb, duration: Duration, now: Instant) {
        for (index, led) in self.leds.iter_mut().enumerate() {
            led.set(color(index), duration, now);
        }
    }
}

impl Default for StatusAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl BarAnimation for StatusAnimation {
    fn render(&mut self, now: Instant, leds: &mut [Rgb]) {
        if self.timeout_at.is_some_and(|timeout| now >= timeout) {
            self.turn_off(now);
        }
        for (led, transition) in leds.iter_mut().zip(self.leds.iter_mut()) {
            transition.tick(now);
            *led = transition.current();
        }
    }
}

/// Animation slot of the bar
#[derive(Debug, Clone)]
pub enum Animation {
    ColorSweep(ColorSweep),
    Status(StatusAnimation),
}

impl Animation {
    pub fn render(&mut self, now: Instant, leds: &mut [Rgb]) {
        match self {
            Self::ColorSweep(animation) => animation.render(now, leds),
            Self::Status(animation) => animation.render(now, leds),
        }
    }

    pub fn is_finished(&self) -> bool {
        match self {
            Self::ColorSweep(animation) => animation.is_finished(),
            Self::Status(animation) => animation.is_finished(),
        }
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::ColorSweep(ColorSweep::new())
    }
}

/// Drives the feedback bar from queued [`FeedbackRequest`]s.
pub struct FeedbackBar<'a, O: LedBarOutput, const SIZE: usize> {
    requests: Receiver<'a, FeedbackRequest, SIZE>,
    animation: Animation,
    output: O,
    frame: [Rgb; FEEDBACK_LEDS],
}

impl<'a, O: LedBarOutput, const SIZE: usize> FeedbackBar<'a, O, SIZE> {
    /// Starts with the color sweep.
    pub fn new(requests: Receiver<'a, FeedbackRequest, SIZE>, output: O) -> Self {
        Self {
            requests,
            animation: Animation::default(),
            output,
            frame: [OFF; FEEDBACK_LEDS],
        }
    }

    pub const fn animation(&self) -> &Animation {
        &self.animation
    }

    pub const fn output(&self) -> &O {
        &self.output
    }

    /// Colors written on the last tick
    pub const fn frame(&self) -> &[Rgb; FEEDBACK_LEDS] {
        &self.frame
    }

    /// Render one frame and return when to render the next.
    ///
    /// A request arriving during the sweep ends it early.
    pub fn tick(&mut self, now: Instant) -> Instant {
        let requests = self.requests;
        for request in requests.drain() {
            self.enter_status();
            if let Animation::Status(status) = &mut self.animation {
                status.apply(request, now);
            }
        }

        self.animation.render(now, &mut self.frame);
        if self.animation.is_finished() {
            self.enter_status();
        }
        self.output.write(&self.frame);

        now + FEEDBACK_REFRESH
    }

    /// Task body
    pub async fn run(&mut self) -> ! {
        loop {
            let next = self.tick(Instant::now());
            Timer::at(next).await;
        }
    }

    fn enter_status(&mut self) {
        if let Animation::ColorSweep(_) = self.animation {
            self.animation = Animation::Status(StatusAnimation::new());
        }
    }
}
