mod tests {
    use embassy_time::{Duration, Instant};
    use lightnet::color::Rgb;
    use lightnet::math8::blend8;
    use lightnet::transition::ValueTransition;

    #[test]
    fn test_value_transition_u8() {
        let mut transition = ValueTransition::new(0, blend8);
        assert_eq!(transition.current(), 0);
        assert_eq!(transition.is_transitioning(), false);
        transition.set(100, Duration::from_millis(100), Instant::from_millis(0));
        assert_eq!(transition.is_transitioning(), true);
        assert_eq!(transition.target(), 100);

        transition.tick(Instant::from_millis(50));
        assert_eq!(transition.current(), 50);

        transition.tick(Instant::from_millis(100));
        assert_eq!(transition.current(), 100);
        assert_eq!(transition.is_transitioning(), false);
    }

    #[test]
    fn test_value_transition_rgb() {
        let mut transition = ValueTransition::new_rgb(Rgb::new(0, 0, 0));
        assert_eq!(transition.current(), Rgb::new(0, 0, 0));
        assert_eq!(transition.is_transitioning(), false);
        transition.set(
            Rgb::new(255, 255, 255),
            Duration::from_millis(100),
            Instant::from_millis(0),
        );
        assert_eq!(transition.is_transitioning(), true);

        transition.tick(Instant::from_millis(50));
        assert_eq!(transition.current(), Rgb::new(127, 127, 127));
    }

    #[test]
    fn test_zero_duration_jumps() {
        let mut transition = ValueTransition::new(10, blend8);
        transition.set(200, Duration::from_ticks(0), Instant::from_millis(0));
        assert_eq!(transition.current(), 200);
        assert_eq!(transition.is_transitioning(), false);
    }

    #[test]
    fn test_retarget_starts_from_current_value() {
        let mut transition = ValueTransition::new(0, blend8);
        transition.set(200, Duration::from_millis(100), Instant::from_millis(0));
        transition.tick(Instant::from_millis(50));
        let midway = transition.current();

        transition.set(0, Duration::from_millis(100), Instant::from_millis(50));
        transition.tick(Instant::from_millis(50));
        assert_eq!(transition.current(), midway);
        transition.tick(Instant::from_millis(150));
        assert_eq!(transition.current(), 0);
    }
}
