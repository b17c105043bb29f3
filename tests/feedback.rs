mod tests {
    use embassy_time::{Duration, Instant};
    use lightnet::LedBarOutput;
    use lightnet::color::{self, Rgb, dim};
    use lightnet::panel::feedback::{Animation, COLOR_TEMPERATURE_TEMPLATE, FeedbackBar};
    use lightnet::panel::{FeedbackChannel, FeedbackRequest};

    #[derive(Default)]
    struct FakeBar {
        frames: Vec<Vec<Rgb>>,
    }

    impl LedBarOutput for FakeBar {
        fn write(&mut self, colors: &[Rgb]) {
            self.frames.push(colors.to_vec());
        }
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_startup_sweep() {
        let channel: FeedbackChannel<4> = FeedbackChannel::new();
        let mut bar = FeedbackBar::new(channel.receiver(), FakeBar::default());

        let next = bar.tick(at(0));
        assert_eq!(next, at(0) + Duration::from_millis(20));
        assert!(bar.frame().iter().all(|&led| led == color::RED));
        bar.tick(at(260));
        assert!(bar.frame().iter().all(|&led| led == color::GREEN));
        bar.tick(at(510));
        assert!(bar.frame().iter().all(|&led| led == color::BLUE));
        bar.tick(at(760));
        assert!(bar.frame().iter().all(|&led| led == color::WHITE));
        assert!(matches!(bar.animation(), Animation::ColorSweep(_)));

        bar.tick(at(1010));
        assert!(matches!(bar.animation(), Animation::Status(_)));
        assert!(bar.frame().iter().all(|&led| led == color::OFF));
        assert_eq!(bar.output().frames.len(), 5);
    }

    #[test]
    fn test_request_ends_sweep_early() {
        let channel: FeedbackChannel<4> = FeedbackChannel::new();
        let mut bar = FeedbackBar::new(channel.receiver(), FakeBar::default());
        bar.tick(at(0));

        channel.try_send(FeedbackRequest::Brightness(3)).unwrap();
        bar.tick(at(100));
        assert!(matches!(bar.animation(), Animation::Status(_)));

        bar.tick(at(250));
        let frame = bar.frame();
        assert!(frame[..3].iter().all(|&led| led == dim(color::WHITE, 128)));
        assert!(frame[3..].iter().all(|&led| led == dim(color::BLUE, 13)));
    }

    #[test]
    fn test_color_temperature_view() {
        let channel: FeedbackChannel<4> = FeedbackChannel::new();
        let mut bar = FeedbackBar::new(channel.receiver(), FakeBar::default());

        channel.try_send(FeedbackRequest::ColorTemperature(1)).unwrap();
        bar.tick(at(0));
        bar.tick(at(150));
        let frame = bar.frame();
        assert_eq!(frame[0], dim(COLOR_TEMPERATURE_TEMPLATE[0], 204));
        for index in 1..frame.len() {
            assert_eq!(frame[index], dim(COLOR_TEMPERATURE_TEMPLATE[index], 51));
        }
    }

    #[test]
    fn test_status_fades_in() {
        let channel: FeedbackChannel<4> = FeedbackChannel::new();
        let mut bar = FeedbackBar::new(channel.receiver(), FakeBar::default());

        channel.try_send(FeedbackRequest::Brightness(12)).unwrap();
        bar.tick(at(0));
        assert_eq!(bar.frame()[0], color::OFF);
        bar.tick(at(75));
        let halfway = bar.frame()[0];
        assert!(halfway.r > 0 && halfway.r < 128);
    }

    #[test]
    fn test_bar_goes_dark_after_timeout() {
        let channel: FeedbackChannel<4> = FeedbackChannel::new();
        let mut bar = FeedbackBar::new(channel.receiver(), FakeBar::default());

        channel.try_send(FeedbackRequest::Brightness(6)).unwrap();
        bar.tick(at(0));
        bar.tick(at(200));
        assert_ne!(bar.frame()[0], color::OFF);

        bar.tick(at(4_900));
        assert_ne!(bar.frame()[0], color::OFF);

        bar.tick(at(5_000));
        bar.tick(at(5_300));
        assert!(bar.frame().iter().all(|&led| led == color::OFF));
    }

    #[test]
    fn test_new_status_restarts_timeout() {
        let channel: FeedbackChannel<4> = FeedbackChannel::new();
        let mut bar = FeedbackBar::new(channel.receiver(), FakeBar::default());

        channel.try_send(FeedbackRequest::Brightness(6)).unwrap();
        bar.tick(at(0));
        channel.try_send(FeedbackRequest::Brightness(7)).unwrap();
        bar.tick(at(4_000));
        bar.tick(at(6_000));
        assert_eq!(bar.frame()[6], dim(color::WHITE, 128));
    }
}
