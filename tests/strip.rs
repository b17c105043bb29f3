mod tests {
    use embassy_time::{Duration, Instant};
    use lightnet::config::{ColorCalibration, FULL_SCALE, FadeTimings};
    use lightnet::intent::StripCommand;
    use lightnet::pwm::mix::ChannelLevels;
    use lightnet::pwm::{LedStrip, PowerState, StripConfig};

    const SETTLED: Duration = Duration::from_millis(400);

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn settle(strip: &mut LedStrip, now: Instant) -> ChannelLevels {
        strip.tick(now + SETTLED)
    }

    #[test]
    fn test_new_strip_is_dark() {
        let strip = LedStrip::default();
        assert_eq!(strip.power(), PowerState::Off);
        assert_eq!(strip.levels(), ChannelLevels::OFF);
        assert!(!strip.is_enabled());
        assert_eq!(strip.next_step_at(), None);
    }

    #[test]
    fn test_brightness_fades_strip_on() {
        let mut strip = LedStrip::default();
        strip.set_brightness(100, at(0));
        assert_eq!(strip.power(), PowerState::FadingOn);
        assert!(strip.is_fading());
        assert!(strip.next_step_at().is_some());

        let levels = settle(&mut strip, at(0));
        assert_eq!(strip.power(), PowerState::On);
        assert_eq!(
            levels,
            ChannelLevels {
                warm: FULL_SCALE,
                cold: FULL_SCALE,
            }
        );
    }

    #[test]
    fn test_zero_brightness_fades_strip_off() {
        let mut strip = LedStrip::default();
        strip.turn_on(false, at(0));
        strip.set_brightness(0, at(10));
        assert_eq!(strip.power(), PowerState::FadingOff);

        assert_eq!(settle(&mut strip, at(10)), ChannelLevels::OFF);
        assert_eq!(strip.power(), PowerState::Off);
    }

    #[test]
    fn test_immediate_power() {
        let mut strip = LedStrip::default();
        strip.turn_on(false, at(0));
        assert_eq!(strip.power(), PowerState::On);
        assert_eq!(strip.levels(), ChannelLevels { warm: 511, cold: 511 });

        strip.turn_off(false, at(1));
        assert_eq!(strip.power(), PowerState::Off);
        assert_eq!(strip.levels(), ChannelLevels::OFF);
    }

    #[test]
    fn test_toggle_reverses_mid_fade() {
        let mut strip = LedStrip::default();
        strip.toggle(at(0));
        assert_eq!(strip.power(), PowerState::FadingOn);

        strip.tick(at(150));
        let midway = strip.levels();
        assert!(midway.warm > 0 && midway.warm < 511);

        strip.toggle(at(150));
        assert_eq!(strip.power(), PowerState::FadingOff);
        assert!(strip.levels().warm <= midway.warm);

        assert_eq!(settle(&mut strip, at(150)), ChannelLevels::OFF);
        assert_eq!(strip.power(), PowerState::Off);
    }

    #[test]
    fn test_color_temperature_is_clamped() {
        let mut strip = LedStrip::default();
        strip.set_color_temperature(10_000, at(0));
        assert_eq!(strip.config().color_temperature, 6000);
        strip.set_color_temperature(1_000, at(0));
        assert_eq!(strip.config().color_temperature, 2700);
    }

    #[test]
    fn test_color_temperature_keeps_dark_strip_dark() {
        let mut strip = LedStrip::default();
        strip.set_color_temperature(3000, at(0));
        assert_eq!(strip.power(), PowerState::Off);
        assert_eq!(settle(&mut strip, at(0)), ChannelLevels::OFF);
    }

    #[test]
    fn test_steps() {
        let mut strip = LedStrip::default();
        strip.turn_on(false, at(0));
        strip.step_brightness(1, at(0));
        assert_eq!(strip.config().brightness, 55);
        strip.step_brightness(-20, at(0));
        assert_eq!(strip.config().brightness, 0);
        assert_eq!(strip.power(), PowerState::FadingOff);

        strip.step_color_temperature(2, at(0));
        assert_eq!(strip.config().color_temperature, 4400);
        strip.step_color_temperature(-128, at(0));
        assert_eq!(strip.config().color_temperature, 2700);
    }

    #[test]
    fn test_apply_commands() {
        let mut strip = LedStrip::new(
            StripConfig::default(),
            ColorCalibration::DEFAULT,
            FadeTimings::DEFAULT,
        );
        strip.apply(StripCommand::PowerOn { fade: false }, at(0));
        strip.apply(StripCommand::SetColorTemperature(6000), at(0));
        strip.apply(StripCommand::SetBrightness(100), at(0));

        assert_eq!(
            settle(&mut strip, at(0)),
            ChannelLevels {
                warm: 0,
                cold: FULL_SCALE,
            }
        );

        strip.apply(StripCommand::PowerOff { fade: false }, at(500));
        assert_eq!(strip.levels(), ChannelLevels::OFF);
        strip.apply(StripCommand::TogglePower, at(500));
        assert_eq!(strip.power(), PowerState::FadingOn);
    }

    #[test]
    fn test_repeated_command_is_idempotent() {
        let mut strip = LedStrip::default();
        strip.set_brightness(70, at(0));
        let first = settle(&mut strip, at(0));

        strip.set_brightness(70, at(1000));
        assert!(!strip.is_fading());
        assert_eq!(strip.power(), PowerState::On);
        assert_eq!(strip.levels(), first);
    }
}
