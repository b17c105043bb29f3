mod tests {
    use lightnet::channel::{Channel, TryReceiveError, TrySendError};

    #[test]
    fn test_fifo_order() {
        let channel: Channel<u8, 4> = Channel::new();
        let sender = channel.sender();
        sender.try_send(1).unwrap();
        sender.try_send(2).unwrap();
        sender.try_send(3).unwrap();

        let receiver = channel.receiver();
        assert_eq!(receiver.try_receive(), Ok(1));
        assert_eq!(receiver.drain().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(receiver.try_receive(), Err(TryReceiveError));
    }

    #[test]
    fn test_full_channel_returns_value() {
        let channel: Channel<u8, 2> = Channel::new();
        channel.try_send(1).unwrap();
        channel.try_send(2).unwrap();
        assert_eq!(channel.try_send(3), Err(TrySendError(3)));
        assert_eq!(channel.len(), 2);

        assert_eq!(channel.try_receive(), Ok(1));
        assert_eq!(channel.try_receive(), Ok(2));
        assert!(channel.is_empty());
    }
}
