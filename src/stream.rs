//! Parsing MIDI messages out of a raw, non-delimited byte stream.
//!
//! Bytes coming from a MIDI cable, a serial port or a packet-based transport have no message
//! boundaries: a message may be split across packets, status bytes may be omitted through running
//! status, and System Exclusive messages have an unbounded length.
//! A [`MidiStream`](struct.MidiStream.html) keeps track of the partial message between calls, so
//! bytes can be fed in chunks of any size.

use crate::{
    error::Result,
    kind::MessageKind,
    message::{MidiMessage, SystemRealtime, SYSEX_END},
    prelude::*,
    primitive::is_data_byte,
};
use tracing::{debug, trace, warn};

/// Runtime options for a [`MidiStream`](struct.MidiStream.html).
///
/// ```
/// use midly_wire::{MidiStream, StreamConfig};
///
/// let stream = MidiStream::with_config(
///     StreamConfig::new()
///         .realtime_passthrough(false)
///         .max_sysex_len(Some(4096)),
/// );
/// assert_eq!(stream.config().max_sysex_len, Some(4096));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StreamConfig {
    /// Whether System Realtime bytes (`0xF8..=0xFF`) are delivered as soon as they arrive without
    /// disturbing the message in progress.
    ///
    /// The MIDI standard allows these single-byte messages to appear anywhere, even between the
    /// data bytes of another message or inside a System Exclusive message.
    /// When disabled, realtime bytes are treated like any other status byte: they abandon an
    /// in-progress System Exclusive message, cancel running status, and are rejected in the
    /// middle of an incomplete message.
    ///
    /// Enabled by default.
    pub realtime_passthrough: bool,
    /// The maximum length of a System Exclusive message, `0xF0` and `0xF7` included.
    ///
    /// Longer messages are dropped with an `ErrorKind::SysExTooLong` error.
    /// By default there is no limit.
    pub max_sysex_len: Option<usize>,
}
impl StreamConfig {
    #[inline]
    pub const fn new() -> StreamConfig {
        StreamConfig {
            realtime_passthrough: true,
            max_sysex_len: None,
        }
    }

    #[inline]
    pub const fn realtime_passthrough(mut self, enabled: bool) -> StreamConfig {
        self.realtime_passthrough = enabled;
        self
    }

    #[inline]
    pub const fn max_sysex_len(mut self, max: Option<usize>) -> StreamConfig {
        self.max_sysex_len = max;
        self
    }
}
impl Default for StreamConfig {
    #[inline]
    fn default() -> StreamConfig {
        StreamConfig::new()
    }
}

/// A snapshot of what a [`MidiStream`](struct.MidiStream.html) is waiting for.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum ParseState {
    /// No status byte is active.
    /// The next byte must be a status byte.
    Idle,
    /// Waiting for the data bytes of a fixed-length message.
    AwaitingData {
        /// The kind of the message in progress.
        kind: MessageKind,
        /// The amount of data bytes already received for the message in progress.
        received: usize,
        /// The amount of messages completed under the current status byte (through running
        /// status).
        completed: usize,
    },
    /// Inside a System Exclusive message, waiting for the `0xF7` end marker.
    InSysEx {
        /// The amount of bytes buffered so far, the leading `0xF0` included.
        len: usize,
    },
    /// Skipping the rest of a System Exclusive message that was too long.
    SkippingSysEx,
}

#[derive(Copy, Clone, Debug)]
enum State {
    Idle,
    Awaiting { kind: MessageKind, completed: usize },
    SysEx,
    SysExOverflow,
}

/// A streaming raw MIDI parser, taking raw, undelimited MIDI bytes, presumably from a cable.
///
/// Each `MidiStream` holds the state of exactly one byte stream, so every MIDI input connection
/// should get its own instance.
/// Bytes can be fed in arbitrarily sized chunks: feeding many small slices is equivalent to
/// feeding their concatenation.
///
/// ```
/// use midly_wire::{MidiMessage, MidiStream};
///
/// let mut stream = MidiStream::new();
/// // A note-on message split across two packets, followed by a running status repeat.
/// assert!(stream.parse(&[0x91, 0x3C]).unwrap().is_empty());
/// assert_eq!(
///     stream.parse(&[0x40, 0x3D, 0x41]).unwrap(),
///     vec![
///         MidiMessage::note_on(1, 0x3C, 0x40),
///         MidiMessage::note_on(1, 0x3D, 0x41),
///     ]
/// );
/// assert!(!stream.has_incomplete_message());
/// ```
#[derive(Clone, Debug)]
pub struct MidiStream {
    state: State,
    /// The raw bytes of the message in progress, starting with its status byte.
    ///
    /// While a fixed-length message is active, index 0 always holds its status byte: after a
    /// channel message completes, only its data bytes are dropped.
    buf: Vec<u8>,
    config: StreamConfig,
}
impl Default for MidiStream {
    #[inline]
    fn default() -> MidiStream {
        MidiStream::new()
    }
}
impl MidiStream {
    /// Create a fresh midi stream parser with the default configuration.
    #[inline]
    pub fn new() -> MidiStream {
        MidiStream::with_config(StreamConfig::default())
    }

    /// Create a fresh midi stream parser with the given configuration.
    #[inline]
    pub fn with_config(config: StreamConfig) -> MidiStream {
        MidiStream {
            state: State::Idle,
            buf: Vec::new(),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Parse a chunk of bytes, returning all messages completed by them in arrival order.
    ///
    /// Parsing stops at the first offending byte, and its error is returned.
    /// In that case, messages completed earlier in the same chunk are dropped and the bytes
    /// following the offending byte are not consumed.
    /// The stream itself remains usable, and further calls parse normally.
    ///
    /// Use [`feed`](#method.feed) to keep parsing past errors instead.
    pub fn parse(&mut self, bytes: &[u8]) -> Result<Vec<MidiMessage>> {
        self.messages(bytes).collect()
    }

    /// Lazily parse a chunk of bytes, yielding messages as soon as they are complete.
    ///
    /// The iterator stops consuming bytes after it yields an error.
    /// Dropping the iterator early leaves the remaining bytes unconsumed.
    #[inline]
    pub fn messages<'s, 'b>(&'s mut self, bytes: &'b [u8]) -> Messages<'s, 'b> {
        Messages {
            stream: self,
            bytes: bytes.iter(),
            failed: false,
        }
    }

    /// Feed a chunk of bytes to the stream, calling `handle_ev` with every completed message and
    /// with every error.
    ///
    /// Unlike [`parse`](#method.parse), errors do not stop parsing: each error is reported once
    /// for its offending byte, and parsing resumes with the next byte.
    ///
    /// Note that some calls to `feed` might produce no events, and others may produce as many as
    /// the amount of bytes fed in.
    pub fn feed(&mut self, bytes: &[u8], mut handle_ev: impl FnMut(Result<MidiMessage>)) {
        for &byte in bytes {
            match self.parse_byte(byte) {
                Ok(Some(msg)) => handle_ev(Ok(msg)),
                Ok(None) => {}
                Err(err) => handle_ev(Err(err)),
            }
        }
    }

    /// Whether a message is in progress and cannot be considered complete.
    ///
    /// This is the case if a fixed-length message received its status byte but not all of its
    /// data bytes, or if a System Exclusive message has not received its `0xF7` end marker yet.
    /// A status byte left active by running status, with no data bytes received since the last
    /// completed message, does not count as incomplete.
    ///
    /// After a stream of well-formed messages has been fully parsed, this returns `false`.
    #[inline]
    pub fn has_incomplete_message(&self) -> bool {
        match self.state {
            State::Idle => false,
            State::Awaiting { .. } => self.fixed_incomplete(),
            State::SysEx | State::SysExOverflow => true,
        }
    }

    /// A snapshot of the parser state, for diagnostics.
    pub fn state(&self) -> ParseState {
        match self.state {
            State::Idle => ParseState::Idle,
            State::Awaiting { kind, completed } => ParseState::AwaitingData {
                kind,
                received: self.buf.len().saturating_sub(1),
                completed,
            },
            State::SysEx => ParseState::InSysEx {
                len: self.buf.len(),
            },
            State::SysExOverflow => ParseState::SkippingSysEx,
        }
    }

    /// Discard any partial message and running status, for example because the underlying
    /// connection was reset.
    ///
    /// Returns whether an incomplete message was dropped.
    pub fn reset(&mut self) -> bool {
        let dropped = self.has_incomplete_message();
        if dropped {
            debug!(state = ?self.state(), "dropping incomplete midi message on reset");
        }
        self.clear();
        dropped
    }

    /// Feed a single byte to the stream, returning the message it completes, if any.
    pub fn parse_byte(&mut self, byte: u8) -> Result<Option<MidiMessage>> {
        if is_data_byte(byte) {
            return self.data_byte(byte);
        }
        if self.config.realtime_passthrough {
            if let Some(realtime) = SystemRealtime::from_status(byte) {
                // System Realtime
                // These single-byte events are intended to transmit quick time-sensitive events,
                // and they should be invisible to other messages (that means, they don't alter
                // any decoder state).
                trace!(?realtime, "decoded realtime message");
                return Ok(Some(MidiMessage::Realtime(realtime)));
            }
        }
        match self.state {
            State::SysEx if byte == SYSEX_END => {
                self.buf.push(byte);
                let msg = MidiMessage::SysEx(mem::take(&mut self.buf));
                self.state = State::Idle;
                trace!(len = msg.size_in_bytes(), "decoded sysex message");
                return Ok(Some(msg));
            }
            State::SysExOverflow if byte == SYSEX_END => {
                // End of the dropped message, already reported
                self.clear();
                return Ok(None);
            }
            State::SysEx => {
                debug!(
                    len = self.buf.len(),
                    status = byte,
                    "abandoning unterminated sysex message"
                );
            }
            State::Awaiting { .. } if self.fixed_incomplete() => {
                debug!(
                    state = ?self.state(),
                    status = byte,
                    "status byte interrupted an incomplete message"
                );
                self.clear();
                bail!(StatusByteBeforeMessageComplete, byte);
            }
            _ => {}
        }
        self.clear();
        let kind = MessageKind::classify(byte).ok_or(err!(UnexpectedStatusByte, byte))?;
        self.buf.push(byte);
        if kind == MessageKind::SysEx {
            self.state = State::SysEx;
            self.check_sysex_len(byte)?;
            Ok(None)
        } else {
            self.state = State::Awaiting { kind, completed: 0 };
            Ok(self.try_complete(kind))
        }
    }

    fn data_byte(&mut self, byte: u8) -> Result<Option<MidiMessage>> {
        match self.state {
            State::Idle => bail!(DataByteBeforeStatus, byte),
            State::SysEx => {
                self.buf.push(byte);
                self.check_sysex_len(byte)?;
                Ok(None)
            }
            State::SysExOverflow => Ok(None),
            State::Awaiting { kind, .. } => {
                self.buf.push(byte);
                Ok(self.try_complete(kind))
            }
        }
    }

    /// Emit the message in the buffer if it has reached its full length.
    fn try_complete(&mut self, kind: MessageKind) -> Option<MidiMessage> {
        let len = kind.wire_len()?;
        debug_assert!(
            self.buf.len() <= len,
            "message buffer outgrew its message length"
        );
        if self.buf.len() < len {
            return None;
        }
        let msg = kind.decode(&self.buf);
        trace!(?msg, "decoded midi message");
        if kind.is_channel() {
            // Carry on running status
            self.buf.truncate(1);
            if let State::Awaiting { completed, .. } = &mut self.state {
                *completed += 1;
            }
        } else {
            self.clear();
        }
        Some(msg)
    }

    /// Whether the active fixed-length message is missing data bytes.
    ///
    /// The bare status byte is considered complete only if it is left over from a completed
    /// message (running status).
    #[inline]
    fn fixed_incomplete(&self) -> bool {
        match self.state {
            State::Awaiting { completed, .. } => self.buf.len() > 1 || completed == 0,
            _ => false,
        }
    }

    /// Drop the sysex in progress if the limit leaves no room for its `0xF7` end marker.
    fn check_sysex_len(&mut self, byte: u8) -> Result<()> {
        if let Some(max) = self.config.max_sysex_len {
            if self.buf.len() >= max {
                warn!(max, "dropping oversized sysex message");
                self.buf.clear();
                self.state = State::SysExOverflow;
                bail!(SysExTooLong, byte);
            }
        }
        Ok(())
    }

    #[inline]
    fn clear(&mut self) {
        self.state = State::Idle;
        self.buf.clear();
    }
}

/// Lazily parses messages out of a chunk of bytes.
///
/// Created by [`MidiStream::messages`](struct.MidiStream.html#method.messages).
pub struct Messages<'s, 'b> {
    stream: &'s mut MidiStream,
    bytes: core::slice::Iter<'b, u8>,
    failed: bool,
}
impl<'s, 'b> Messages<'s, 'b> {
    /// The bytes that have not been consumed yet.
    #[inline]
    pub fn remaining(&self) -> &'b [u8] {
        self.bytes.as_slice()
    }
}
impl Iterator for Messages<'_, '_> {
    type Item = Result<MidiMessage>;
    fn next(&mut self) -> Option<Result<MidiMessage>> {
        if self.failed {
            return None;
        }
        for &byte in &mut self.bytes {
            match self.stream.parse_byte(byte) {
                Ok(Some(msg)) => return Some(Ok(msg)),
                Ok(None) => {}
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
        None
    }
}
