use core::fmt;

/// Represents an error while parsing a raw MIDI byte stream.
///
/// Every error is tied to the single byte that caused it, which is available through
/// [`Error::byte`].
/// Errors are always recoverable: the stream that produced the error is left in a consistent
/// state, and feeding it further well-formed bytes will parse them normally.
///
/// If the `std` feature is enabled, this type implements `std::error::Error`.
/// Otherwise, only `Display` and `Debug` are implemented.
///
/// For more information about each kind of error, see [`ErrorKind`](enum.ErrorKind.html).
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Error {
    kind: ErrorKind,
    byte: u8,
}
impl Error {
    /// Create a new error of the given kind, caused by the given byte.
    #[inline]
    pub const fn new(kind: ErrorKind, byte: u8) -> Error {
        Error { kind, byte }
    }

    /// More information about the error itself.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The offending byte.
    #[inline]
    pub fn byte(&self) -> u8 {
        self.byte
    }
}
impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (byte 0x{:02X})", self.kind, self.byte)
    }
}
impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}(0x{:02X})", self.kind, self.byte)
    }
}
#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// The type of error that occurred while parsing.
///
/// None of these errors are fatal.
/// The usual way of recovering is to keep feeding bytes: data bytes that arrive without a status
/// will keep producing `DataByteBeforeStatus` errors until the next status byte resynchronizes the
/// stream.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum ErrorKind {
    /// A data byte (top bit clear) arrived while no status byte was active.
    DataByteBeforeStatus,

    /// A new status byte arrived before the previous message received all of its data bytes.
    ///
    /// The stream drops the truncated message along with the new status byte, so the byte after
    /// the offending one starts fresh.
    StatusByteBeforeMessageComplete,

    /// A status byte that cannot start a message.
    ///
    /// The only such byte is the System Exclusive end marker `0xF7` arriving outside of a System
    /// Exclusive message.
    UnexpectedStatusByte,

    /// A System Exclusive message grew beyond the limit set through
    /// [`StreamConfig::max_sysex_len`](struct.StreamConfig.html#method.max_sysex_len).
    ///
    /// The message is dropped, and the rest of its data bytes are silently skipped.
    SysExTooLong,
}
impl ErrorKind {
    /// Get an informative message describing the error.
    #[inline]
    pub fn message(&self) -> &'static str {
        match *self {
            ErrorKind::DataByteBeforeStatus => "data byte before any status byte",
            ErrorKind::StatusByteBeforeMessageComplete => {
                "new status byte before the previous message was complete"
            }
            ErrorKind::UnexpectedStatusByte => "unexpected status byte",
            ErrorKind::SysExTooLong => "system exclusive message exceeds the maximum length",
        }
    }
}
impl fmt::Display for ErrorKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid midi stream: {}", self.message())
    }
}

macro_rules! err {
    ($kind:ident, $byte:expr) => {
        $crate::error::Error::new($crate::error::ErrorKind::$kind, $byte)
    };
}
macro_rules! bail {
    ($kind:ident, $byte:expr) => {
        return Err(err!($kind, $byte))
    };
}

/// The result type used by the MIDI stream parser.
pub type Result<T> = StdResult<T, Error>;
pub(crate) use core::result::Result as StdResult;
