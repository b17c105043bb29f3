mod tests {
    use embassy_futures::block_on;
    use embassy_time::Duration;
    use lightnet::stream::StreamBuffer;

    const SHORT: Duration = Duration::from_millis(10);

    #[test]
    fn test_send_and_receive() {
        let stream: StreamBuffer<16> = StreamBuffer::new();
        assert!(stream.send_from_interrupt(&[1, 2, 3, 4]));
        assert_eq!(stream.len(), 4);

        let mut buf = [0; 3];
        assert_eq!(block_on(stream.receive(&mut buf)), 3);
        assert_eq!(buf, [1, 2, 3]);
        assert_eq!(stream.len(), 1);
    }

    #[test]
    fn test_writes_are_all_or_nothing() {
        let stream: StreamBuffer<8> = StreamBuffer::new();
        assert!(stream.send_from_interrupt(&[0; 6]));
        assert!(!stream.send_from_interrupt(&[1, 2, 3]));
        assert_eq!(stream.len(), 6);
        assert!(stream.send_from_interrupt(&[7, 8]));
    }

    #[test]
    fn test_receive_with_timeout_on_empty_stream() {
        let stream: StreamBuffer<16> = StreamBuffer::new();
        let mut buf = [0; 4];
        assert_eq!(block_on(stream.receive_with_timeout(&mut buf, SHORT)), 0);
    }

    #[test]
    fn test_receive_with_timeout_reports_partial_read() {
        let stream: StreamBuffer<16> = StreamBuffer::new();
        stream.send_from_interrupt(&[9, 9]);
        let mut buf = [0; 4];
        assert_eq!(block_on(stream.receive_with_timeout(&mut buf, SHORT)), 2);
        assert_eq!(&buf[..2], &[9, 9]);
    }

    #[test]
    fn test_receive_with_timeout_completes_early() {
        let stream: StreamBuffer<16> = StreamBuffer::new();
        stream.send_from_interrupt(&[1, 2, 3]);
        let mut buf = [0; 3];
        assert_eq!(
            block_on(stream.receive_with_timeout(&mut buf, Duration::from_secs(10))),
            3
        );
    }

    #[test]
    fn test_reset_discards_everything() {
        let stream: StreamBuffer<16> = StreamBuffer::new();
        stream.send_from_interrupt(&[1, 2, 3]);
        stream.reset();
        assert!(stream.is_empty());

        let mut buf = [0; 1];
        assert_eq!(block_on(stream.receive_with_timeout(&mut buf, SHORT)), 0);
    }

    #[test]
    fn test_task_send_rejects_oversized_write() {
        let stream: StreamBuffer<4> = StreamBuffer::new();
        assert!(!block_on(stream.send(&[0; 5])));
        assert!(block_on(stream.send(&[0; 4])));
    }
}
