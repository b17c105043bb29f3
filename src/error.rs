use derive_more::derive::{Display, Error};

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Configuration errors. A board that hits one of these must not join the bus.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[display("CAN peripheral handle is missing")]
    PeripheralMissing,

    #[display("light driver address is unconfigured (index 0)")]
    UnconfiguredAddress,

    #[display("board index {_0} does not fit the address pins")]
    AddressOutOfRange(#[error(not(source))] u8),

    #[display("address belongs to a different board role")]
    WrongRole,

    #[display("interrupt handler is already installed")]
    InterruptAlreadyInstalled,

    #[display("{_0} encoders supplied, board needs a different count")]
    EncoderCount(#[error(not(source))] usize),
}

/// Problems with the raw frame layout.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    #[display("identifier {_0:#x} exceeds 11 bits")]
    IdentifierTooWide(#[error(not(source))] u16),

    #[display("data length {_0} exceeds 8 bytes")]
    LengthTooLong(#[error(not(source))] u8),

    #[display("expected {expected} bytes, got {received}")]
    LengthMismatch { expected: usize, received: usize },
}

/// Problems with a payload whose identifier was recognized.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum PayloadError {
    #[display("payload has {_0} bytes")]
    WrongLength(#[error(not(source))] usize),

    #[display("command kind carries no payload definition")]
    UnsupportedKind,
}
