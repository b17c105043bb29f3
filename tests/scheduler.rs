mod tests {
    use embassy_time::{Duration, Instant};
    use lightnet::config::{FULL_SCALE, GAMMA_EXPONENT};
    use lightnet::intent::{CommandProcessor, StripCommand, StripCommandChannel};
    use lightnet::pwm::{GammaTable, LedStrip, PowerState, StripTask};
    use lightnet::{PwmOutput, WhiteChannel};

    const REFRESH: Duration = Duration::from_millis(10);

    #[derive(Default)]
    struct FakePwm {
        warm: Option<u16>,
        cold: Option<u16>,
        writes: usize,
    }

    impl PwmOutput for FakePwm {
        fn set_duty(&mut self, channel: WhiteChannel, duty: u16) {
            match channel {
                WhiteChannel::Warm => self.warm = Some(duty),
                WhiteChannel::Cold => self.cold = Some(duty),
            }
            self.writes += 1;
        }
    }

    fn strip_task<'a>(
        channel: &'a StripCommandChannel<4>,
        gamma: &'a GammaTable,
    ) -> StripTask<'a, FakePwm, 4> {
        StripTask::new(
            LedStrip::default(),
            CommandProcessor::new(channel.receiver()),
            gamma,
            FakePwm::default(),
            REFRESH,
        )
    }

    #[test]
    fn test_idle_tick_writes_and_paces_by_refresh() {
        let channel: StripCommandChannel<4> = StripCommandChannel::new();
        let gamma = GammaTable::new(GAMMA_EXPONENT);
        let mut task = strip_task(&channel, &gamma);

        let now = Instant::from_millis(0);
        let result = task.tick(now);
        assert_eq!(task.output().warm, Some(0));
        assert_eq!(task.output().cold, Some(0));
        assert_eq!(result.next_deadline, now + REFRESH);
        assert_eq!(result.sleep_duration, REFRESH);
    }

    #[test]
    fn test_commands_are_applied_on_tick() {
        let channel: StripCommandChannel<4> = StripCommandChannel::new();
        let gamma = GammaTable::new(0.0);
        let mut task = strip_task(&channel, &gamma);

        channel.try_send(StripCommand::PowerOn { fade: false }).unwrap();
        let result = task.tick(Instant::from_millis(0));

        assert!(channel.is_empty());
        assert_eq!(task.strip().power(), PowerState::On);
        assert_eq!(result.levels.warm, 511);
        assert_eq!(task.output().warm, Some(511));
        assert_eq!(task.output().cold, Some(511));
    }

    #[test]
    fn test_fading_tick_wakes_for_next_step() {
        let channel: StripCommandChannel<4> = StripCommandChannel::new();
        let gamma = GammaTable::new(GAMMA_EXPONENT);
        let mut task = strip_task(&channel, &gamma);

        channel.try_send(StripCommand::SetBrightness(100)).unwrap();
        let now = Instant::from_millis(0);
        let result = task.tick(now);

        assert!(task.strip().is_fading());
        assert!(result.next_deadline < now + REFRESH);
        assert_eq!(Some(result.next_deadline), task.strip().next_step_at());
        assert_eq!(result.sleep_duration, result.next_deadline - now);
    }

    #[test]
    fn test_fade_completes_through_ticks() {
        let channel: StripCommandChannel<4> = StripCommandChannel::new();
        let gamma = GammaTable::new(GAMMA_EXPONENT);
        let mut task = strip_task(&channel, &gamma);

        channel.try_send(StripCommand::SetBrightness(100)).unwrap();
        let mut now = Instant::from_millis(0);
        for _ in 0..1000 {
            let result = task.tick(now);
            if !task.strip().is_fading() {
                break;
            }
            now = result.next_deadline;
        }

        assert_eq!(task.strip().power(), PowerState::On);
        assert_eq!(task.output().warm, Some(FULL_SCALE));
        assert_eq!(task.output().cold, Some(FULL_SCALE));
        assert!(now <= Instant::from_millis(300));
    }

    #[test]
    fn test_drift_correction_after_stall() {
        let channel: StripCommandChannel<4> = StripCommandChannel::new();
        let gamma = GammaTable::new(GAMMA_EXPONENT);
        let mut task = strip_task(&channel, &gamma);

        task.tick(Instant::from_millis(0));
        let late = Instant::from_millis(1000);
        let result = task.tick(late);
        assert_eq!(result.next_deadline, late + REFRESH);
    }

    #[test]
    fn test_direct_strip_access() {
        let channel: StripCommandChannel<4> = StripCommandChannel::new();
        let gamma = GammaTable::new(0.0);
        let mut task = strip_task(&channel, &gamma);

        task.strip_mut().turn_on(false, Instant::from_millis(0));
        task.tick(Instant::from_millis(0));
        assert_eq!(task.output().writes, 2);
        assert_eq!(task.output().warm, Some(511));
    }
}
