//! Output sinks for MIDI bytes, and the serializer entry points that flatten message sequences
//! into them.
//!
//! Serialization is infallible except for running out of space: messages with out-of-range fields
//! are a bug in the caller and cause a panic, see
//! [`MidiMessage::write`](../struct.MidiMessage.html#method.write).

use crate::{message::MidiMessage, prelude::*};
use core::{convert::Infallible, fmt};

/// The result of writing to an output of type `W`.
pub type WriteResult<W> = StdResult<(), <W as Write>::Error>;

/// A sink for raw MIDI bytes.
///
/// Implemented for `Vec<u8>` (which never fails), for [`Cursor`](struct.Cursor.html) (which fails
/// when it runs out of space), and for any `std::io::Write` through [`IoWrap`](struct.IoWrap.html)
/// when the `std` feature is enabled.
pub trait Write {
    type Error;
    /// Write all of the given bytes.
    fn write(&mut self, buf: &[u8]) -> WriteResult<Self>;
}

impl Write for Vec<u8> {
    type Error = Infallible;
    #[inline]
    fn write(&mut self, buf: &[u8]) -> WriteResult<Self> {
        self.extend_from_slice(buf);
        Ok(())
    }
}

/// Writes bytes into a fixed slice, keeping track of how many bytes have been written.
pub struct Cursor<'a> {
    buf: &'a mut [u8],
    cur: usize,
}
impl<'a> Cursor<'a> {
    #[inline]
    pub fn new(slice: &'a mut [u8]) -> Cursor<'a> {
        Cursor { buf: slice, cur: 0 }
    }
    /// The written part of the slice.
    #[inline]
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.cur]
    }
    /// How many bytes have been written so far.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cur
    }
}
impl<'a> Write for Cursor<'a> {
    type Error = CursorError;
    fn write(&mut self, buf: &[u8]) -> WriteResult<Self> {
        //Cannot overflow because `cur <= buf.len()` is always true.
        let up_to = self.cur + buf.len();
        if up_to > self.buf.len() {
            Err(CursorError::OutOfSpace)
        } else {
            self.buf[self.cur..up_to].copy_from_slice(buf);
            self.cur = up_to;
            Ok(())
        }
    }
}

/// The error produced when writing to a [`Cursor`](struct.Cursor.html).
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum CursorError {
    /// The output slice is too small to hold all of the messages.
    /// Whole messages that did fit have been written.
    OutOfSpace,
}
impl fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CursorError::OutOfSpace => write!(f, "output buffer out of space"),
        }
    }
}
#[cfg(feature = "std")]
impl std::error::Error for CursorError {}

/// Adapts a `std::io::Write` into a MIDI byte sink.
///
/// Only available with the `std` feature enabled.
#[cfg(feature = "std")]
pub struct IoWrap<T>(pub T);
#[cfg(feature = "std")]
impl<T: io::Write> Write for IoWrap<T> {
    type Error = io::Error;
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<()> {
        io::Write::write_all(&mut self.0, buf)
    }
}

/// Flatten a sequence of messages into a tightly packed byte buffer, every message with its own
/// status byte.
///
/// The output can be fed back into a [`MidiStream`](struct.MidiStream.html) to recover the same
/// messages.
///
/// # Panics
///
/// Panics if any message has out-of-range fields, see
/// [`MidiMessage::write`](struct.MidiMessage.html#method.write).
pub fn serialize(messages: &[MidiMessage]) -> Vec<u8> {
    let mut out = Vec::with_capacity(crate::total_size_in_bytes(messages));
    for msg in messages {
        infallible(msg.write(&mut out));
    }
    out
}

/// Flatten a sequence of messages, omitting the status byte of channel messages that share the
/// status of the previous channel message.
///
/// Running status rules:
/// - Channel messages (`0x80..=0xEF`) set and use running status.
/// - System Exclusive and System Common messages cancel running status.
/// - System Realtime messages leave running status untouched.
///
/// Note that it's usually discouraged to feed messages with running status to OS APIs.
///
/// # Panics
///
/// Panics if any message has out-of-range fields.
pub fn serialize_with_running_status(messages: &[MidiMessage]) -> Vec<u8> {
    let mut out = Vec::with_capacity(crate::total_size_in_bytes(messages));
    let mut running_status = None;
    for msg in messages {
        match msg {
            MidiMessage::Channel { msg: chan, .. } => {
                let status = msg.status_byte();
                if Some(status) != running_status {
                    running_status = Some(status);
                    out.push(status);
                }
                infallible(chan.write(&mut out));
            }
            MidiMessage::SysEx(_) | MidiMessage::Common(_) => {
                running_status = None;
                infallible(msg.write(&mut out));
            }
            MidiMessage::Realtime(_) => infallible(msg.write(&mut out)),
        }
    }
    out
}

/// Pack a sequence of messages into the given slice, returning the amount of bytes written.
///
/// [`total_size_in_bytes`](fn.total_size_in_bytes.html) tells how large the slice must be.
/// If the slice is too small, `CursorError::OutOfSpace` is returned, and the slice holds all of
/// the messages that did fit.
///
/// # Panics
///
/// Panics if any message has out-of-range fields.
pub fn write_to_slice(messages: &[MidiMessage], out: &mut [u8]) -> StdResult<usize, CursorError> {
    let mut cursor = Cursor::new(out);
    for msg in messages {
        if cursor.cursor() + msg.size_in_bytes() > cursor.buf.len() {
            return Err(CursorError::OutOfSpace);
        }
        msg.write(&mut cursor)?;
    }
    Ok(cursor.cursor())
}

#[inline]
fn infallible(res: StdResult<(), Infallible>) {
    match res {
        Ok(()) => {}
        Err(never) => match never {},
    }
}
