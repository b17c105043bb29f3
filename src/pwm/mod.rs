//! Warm/cold white PWM engine
//!
//! Pipeline per strip: configuration → linear mix ([`mix`]) → stepped fade
//! ([`fade`]) → gamma lookup ([`gamma`]) → duty register ([`scheduler`]).

pub mod fade;
pub mod gamma;
pub mod mix;
pub mod scheduler;
pub mod strip;

pub use fade::{ChannelState, FadeMode, FadePlan, plan_fade};
pub use gamma::GammaTable;
pub use mix::{ChannelLevels, StripConfig};
pub use scheduler::{StripTask, TickResult};
pub use strip::{LedStrip, PowerState};
