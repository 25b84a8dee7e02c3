//! # Overview
//!
//! `midly_wire` is a MIDI 1.0 wire-format codec: it parses raw, undelimited MIDI bytes as they
//! come out of a cable, a serial port or a packet-based transport, and writes messages back into
//! transport-ready bytes.
//!
//! Parsing is done through a [`MidiStream`](struct.MidiStream.html), which holds the state of
//! one byte stream between calls:
//!
//! ```rust
//! use midly_wire::{MidiMessage, MidiStream};
//!
//! let mut stream = MidiStream::new();
//! let msgs = stream.parse(&[0xE1, 2, 3]).unwrap();
//! assert_eq!(msgs, vec![MidiMessage::pitch_bend(1, (3 << 7) + 2)]);
//! ```
//!
//! Bytes may be fed in chunks of any size, split at any position.
//! Running status (channel messages that omit a repeated status byte), System Exclusive messages
//! of any length and System Realtime bytes interleaved within other messages are all handled.
//!
//! # Writing MIDI bytes
//!
//! Sequences of messages are flattened with [`serialize`](fn.serialize.html):
//!
//! ```rust
//! use midly_wire::{serialize, MidiMessage, MidiStream};
//!
//! let msgs = vec![
//!     MidiMessage::note_on(0, 60, 100),
//!     MidiMessage::sysex(&[0x7E, 0x7F, 0x09, 0x01]),
//!     MidiMessage::note_off(0, 60, 0),
//! ];
//! let bytes = serialize(&msgs);
//! assert_eq!(bytes.len(), midly_wire::total_size_in_bytes(&msgs));
//!
//! let mut stream = MidiStream::new();
//! assert_eq!(stream.parse(&bytes).unwrap(), msgs);
//! ```
//!
//! Messages with out-of-range fields (for example a key above 127) are a bug in the code that
//! constructed them, and writing them panics.
//!
//! # About errors
//!
//! Malformed streams produce an [`Error`](struct.Error.html) for the offending byte.
//! Errors are never fatal: the stream stays usable, and the next well-formed bytes parse normally.
//!
//! # About features
//!
//! - The `std` feature
//!
//!   Enabled by default. Implements `std::error::Error` for the error types and provides the
//!   [`IoWrap`](io/struct.IoWrap.html) adapter to write into any `std::io::Write`.
//!   Disabling this feature with `default-features = false` will make the crate `no_std + alloc`.
//!
//! - The `serde` feature
//!
//!   Derives `Serialize` and `Deserialize` for the message types and for
//!   [`StreamConfig`](struct.StreamConfig.html).
//!
//! # Diagnostics
//!
//! The parser emits `tracing` events: decoded messages at `TRACE` level, abandoned or dropped
//! messages at `DEBUG` and `WARN` levels.
//! No subscriber is installed by this crate.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

/// All of the errors this crate produces.
#[macro_use]
mod error;

mod prelude {
    pub(crate) use crate::error::StdResult;
    pub(crate) use alloc::vec::Vec;
    pub(crate) use core::mem;
    #[cfg(feature = "std")]
    pub(crate) use std::io;
}

pub mod io;
mod kind;
mod message;
mod primitive;
mod stream;

pub use crate::{
    error::{Error, ErrorKind, Result},
    io::{serialize, serialize_with_running_status, write_to_slice},
    kind::MessageKind,
    message::{
        total_size_in_bytes, ChannelMessage, MidiMessage, MtcKind, SystemCommon, SystemRealtime,
    },
    stream::{Messages, MidiStream, ParseState, StreamConfig},
};
