//! MIDI message definitions, their wire sizes and their byte layout.

use crate::{
    io::{Write, WriteResult},
    prelude::*,
    primitive::{split_u14, u7},
};

/// A complete MIDI 1.0 message, as transmitted over a live MIDI connection.
///
/// MIDI messages are divided into three kinds:
///
/// - Channel messages: `NoteOn`, `NoteOff`, `PitchBend`, etc...
/// - System messages, sometimes subdivided into two sub-categories:
///     - System common messages: `SysEx`, `SongPosition`, etc...
///     - System realtime messages: `ActiveSensing`, `Reset`, etc...
///
/// System Exclusive messages get a variant of their own, since they are the only messages with an
/// unbounded length.
///
/// Every message has a known size on the wire, see [`size_in_bytes`](#method.size_in_bytes).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MidiMessage {
    /// A message associated to a channel, carrying note playback data.
    /// This is the most common MIDI message type.
    Channel {
        /// The channel that this message is associated to, in the range `0..=15`.
        channel: u8,
        /// The type of message sent and its associated data.
        msg: ChannelMessage,
    },
    /// A **sys**tem-**ex**clusive message, carrying arbitrary data bytes.
    ///
    /// The bytes include the leading `0xF0` and the trailing `0xF7` bytes, so they are exactly the
    /// bytes transmitted on the wire.
    SysEx(Vec<u8>),
    /// A System Common message other than System Exclusive.
    Common(SystemCommon),
    /// A one-byte System Realtime message.
    Realtime(SystemRealtime),
}
impl MidiMessage {
    /// Create a `NoteOff` channel message.
    #[inline]
    pub fn note_off(channel: u8, key: u8, vel: u8) -> MidiMessage {
        MidiMessage::Channel {
            channel,
            msg: ChannelMessage::NoteOff { key, vel },
        }
    }

    /// Create a `NoteOn` channel message.
    #[inline]
    pub fn note_on(channel: u8, key: u8, vel: u8) -> MidiMessage {
        MidiMessage::Channel {
            channel,
            msg: ChannelMessage::NoteOn { key, vel },
        }
    }

    /// Create a `PolyPressure` channel message.
    #[inline]
    pub fn poly_pressure(channel: u8, key: u8, pressure: u8) -> MidiMessage {
        MidiMessage::Channel {
            channel,
            msg: ChannelMessage::PolyPressure { key, pressure },
        }
    }

    /// Create a `Controller` channel message.
    #[inline]
    pub fn controller(channel: u8, controller: u8, value: u8) -> MidiMessage {
        MidiMessage::Channel {
            channel,
            msg: ChannelMessage::Controller { controller, value },
        }
    }

    /// Create a `ProgramChange` channel message.
    #[inline]
    pub fn program_change(channel: u8, program: u8) -> MidiMessage {
        MidiMessage::Channel {
            channel,
            msg: ChannelMessage::ProgramChange { program },
        }
    }

    /// Create a `ChannelPressure` channel message.
    #[inline]
    pub fn channel_pressure(channel: u8, pressure: u8) -> MidiMessage {
        MidiMessage::Channel {
            channel,
            msg: ChannelMessage::ChannelPressure { pressure },
        }
    }

    /// Create a `PitchBend` channel message from its raw 14-bit value.
    #[inline]
    pub fn pitch_bend(channel: u8, bend: u16) -> MidiMessage {
        MidiMessage::Channel {
            channel,
            msg: ChannelMessage::PitchBend { bend },
        }
    }

    /// Create a System Exclusive message from its data bytes, adding the `0xF0` and `0xF7`
    /// markers around them.
    pub fn sysex(data: &[u8]) -> MidiMessage {
        let mut raw = Vec::with_capacity(data.len() + 2);
        raw.push(SYSEX_START);
        raw.extend_from_slice(data);
        raw.push(SYSEX_END);
        MidiMessage::SysEx(raw)
    }

    /// The channel of this message, if it is a channel message.
    #[inline]
    pub fn channel(&self) -> Option<u8> {
        match self {
            MidiMessage::Channel { channel, .. } => Some(*channel),
            _ => None,
        }
    }

    #[inline]
    pub fn is_channel(&self) -> bool {
        matches!(self, MidiMessage::Channel { .. })
    }

    #[inline]
    pub fn is_sysex(&self) -> bool {
        matches!(self, MidiMessage::SysEx(_))
    }

    /// Whether this is a System Common message.
    /// Note that System Exclusive messages are System Common messages too.
    #[inline]
    pub fn is_system_common(&self) -> bool {
        matches!(self, MidiMessage::SysEx(_) | MidiMessage::Common(_))
    }

    #[inline]
    pub fn is_realtime(&self) -> bool {
        matches!(self, MidiMessage::Realtime(_))
    }

    /// The exact amount of bytes that this message takes up on the wire, including its status
    /// byte.
    #[inline]
    pub fn size_in_bytes(&self) -> usize {
        match self {
            MidiMessage::Channel { msg, .. } => 1 + msg.data_len(),
            MidiMessage::SysEx(raw) => raw.len(),
            MidiMessage::Common(common) => common.size_in_bytes(),
            MidiMessage::Realtime(_) => 1,
        }
    }

    /// The status byte that starts this message on the wire.
    ///
    /// # Panics
    ///
    /// Panics if this is a channel message with a channel outside the `0..=15` range.
    #[inline]
    #[track_caller]
    pub fn status_byte(&self) -> u8 {
        match self {
            MidiMessage::Channel { channel, msg } => {
                assert!(
                    *channel <= 0xF,
                    "midi channel {} is out of range",
                    channel
                );
                msg.status_nibble() << 4 | channel
            }
            MidiMessage::SysEx(_) => SYSEX_START,
            MidiMessage::Common(common) => common.status_byte(),
            MidiMessage::Realtime(realtime) => realtime.status_byte(),
        }
    }

    /// Write this message to the given output, status byte included.
    ///
    /// Writes exactly [`size_in_bytes`](#method.size_in_bytes) bytes on success.
    ///
    /// # Panics
    ///
    /// Panics if any field is out of range, or if a System Exclusive message does not start with
    /// `0xF0`, end with `0xF7` and carry only data bytes in between.
    /// Messages decoded by a [`MidiStream`](struct.MidiStream.html) always satisfy this.
    #[track_caller]
    pub fn write<W: Write>(&self, out: &mut W) -> WriteResult<W> {
        match self {
            MidiMessage::Channel { msg, .. } => {
                out.write(&[self.status_byte()])?;
                msg.write(out)
            }
            MidiMessage::SysEx(raw) => {
                check_sysex(raw);
                out.write(raw)
            }
            MidiMessage::Common(common) => common.write(out),
            MidiMessage::Realtime(realtime) => out.write(&[realtime.status_byte()]),
        }
    }
}
impl From<SystemCommon> for MidiMessage {
    #[inline]
    fn from(common: SystemCommon) -> MidiMessage {
        MidiMessage::Common(common)
    }
}
impl From<SystemRealtime> for MidiMessage {
    #[inline]
    fn from(realtime: SystemRealtime) -> MidiMessage {
        MidiMessage::Realtime(realtime)
    }
}

/// The sum of the wire sizes of all the given messages.
///
/// Useful to preallocate output buffers before serializing.
pub fn total_size_in_bytes<'a, I>(messages: I) -> usize
where
    I: IntoIterator<Item = &'a MidiMessage>,
{
    messages.into_iter().map(MidiMessage::size_in_bytes).sum()
}

pub(crate) const SYSEX_START: u8 = 0xF0;
pub(crate) const SYSEX_END: u8 = 0xF7;

#[track_caller]
fn check_sysex(raw: &[u8]) {
    assert!(
        raw.len() >= 2 && raw[0] == SYSEX_START && raw[raw.len() - 1] == SYSEX_END,
        "system exclusive message must be delimited by 0xF0 and 0xF7"
    );
    assert!(
        raw[1..raw.len() - 1]
            .iter()
            .all(|&byte| crate::primitive::is_data_byte(byte)),
        "system exclusive message contains a byte with its top bit set"
    );
}

/// A MIDI message associated to a channel.
///
/// All fields are 7-bit values in the range `0..=127`, except for the 14-bit pitch bend.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelMessage {
    /// Stop playing a note.
    NoteOff {
        /// The MIDI key to stop playing.
        key: u8,
        /// The velocity with which to stop playing it.
        vel: u8,
    },
    /// Start playing a note.
    NoteOn {
        /// The key to start playing.
        key: u8,
        /// The velocity (strength) with which to press it.
        ///
        /// Note that by convention a `NoteOn` message with a velocity of 0 is equivalent to a
        /// `NoteOff`.
        vel: u8,
    },
    /// Modify the pressure of a single key after it has been played.
    PolyPressure {
        /// The key for which to modify its pressure.
        key: u8,
        /// The new pressure for the key.
        pressure: u8,
    },
    /// Modify the value of a MIDI controller.
    Controller {
        /// The controller to modify.
        ///
        /// See the MIDI spec for the meaning of each index.
        controller: u8,
        /// The value to set it to.
        value: u8,
    },
    /// Change the program (also known as instrument) for a channel.
    ProgramChange {
        /// The new program (instrument) to use for the channel.
        program: u8,
    },
    /// Change the pressure of a whole channel at once, without starting new notes.
    ChannelPressure {
        /// The new pressure for all notes currently playing in the channel.
        pressure: u8,
    },
    /// Set the pitch bend value for the entire channel.
    PitchBend {
        /// The raw 14-bit bend value.
        ///
        /// A value of `0x0000` indicates full bend downwards, `0x2000` indicates no bend and
        /// `0x3FFF` indicates full bend upwards.
        bend: u16,
    },
}
impl ChannelMessage {
    /// Get the raw status nibble for this MIDI message type.
    #[inline]
    pub(crate) fn status_nibble(&self) -> u8 {
        match self {
            ChannelMessage::NoteOff { .. } => 0x8,
            ChannelMessage::NoteOn { .. } => 0x9,
            ChannelMessage::PolyPressure { .. } => 0xA,
            ChannelMessage::Controller { .. } => 0xB,
            ChannelMessage::ProgramChange { .. } => 0xC,
            ChannelMessage::ChannelPressure { .. } => 0xD,
            ChannelMessage::PitchBend { .. } => 0xE,
        }
    }

    /// Amount of data bytes following the status byte.
    #[inline]
    pub(crate) fn data_len(&self) -> usize {
        match self {
            ChannelMessage::ProgramChange { .. } | ChannelMessage::ChannelPressure { .. } => 1,
            _ => 2,
        }
    }

    /// Write the data part of this message, not including the status.
    #[track_caller]
    pub(crate) fn write<W: Write>(&self, out: &mut W) -> WriteResult<W> {
        match *self {
            ChannelMessage::NoteOff { key, vel } | ChannelMessage::NoteOn { key, vel } => {
                out.write(&[u7(key, "key"), u7(vel, "velocity")])
            }
            ChannelMessage::PolyPressure { key, pressure } => {
                out.write(&[u7(key, "key"), u7(pressure, "pressure")])
            }
            ChannelMessage::Controller { controller, value } => {
                out.write(&[u7(controller, "controller"), u7(value, "controller value")])
            }
            ChannelMessage::ProgramChange { program } => out.write(&[u7(program, "program")]),
            ChannelMessage::ChannelPressure { pressure } => {
                out.write(&[u7(pressure, "pressure")])
            }
            ChannelMessage::PitchBend { bend } => out.write(&split_u14(bend, "pitch bend")),
        }
    }
}

/// A "system common message", as defined by the MIDI spec, except for System Exclusive messages,
/// which are represented by [`MidiMessage::SysEx`](enum.MidiMessage.html#variant.SysEx).
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SystemCommon {
    /// A MIDI Time Code Quarter Frame message, carrying a tag type and a 4-bit tag value.
    MtcQuarterFrame(MtcKind, u8),
    /// The number of MIDI beats (6 x MIDI clocks) that have elapsed since the start of the
    /// sequence, as a 14-bit value.
    SongPosition(u16),
    /// Select a given song index.
    SongSelect(u8),
    /// The undefined `0xF4` message.
    Undefined1,
    /// The undefined `0xF5` message.
    Undefined2,
    /// Used with analog synthesizers to request that all oscillators be tuned.
    TuneRequest,
}
impl SystemCommon {
    #[inline]
    pub fn status_byte(&self) -> u8 {
        match self {
            SystemCommon::MtcQuarterFrame(..) => 0xF1,
            SystemCommon::SongPosition(_) => 0xF2,
            SystemCommon::SongSelect(_) => 0xF3,
            SystemCommon::Undefined1 => 0xF4,
            SystemCommon::Undefined2 => 0xF5,
            SystemCommon::TuneRequest => 0xF6,
        }
    }

    #[inline]
    pub fn size_in_bytes(&self) -> usize {
        match self {
            SystemCommon::MtcQuarterFrame(..) | SystemCommon::SongSelect(_) => 2,
            SystemCommon::SongPosition(_) => 3,
            SystemCommon::Undefined1 | SystemCommon::Undefined2 | SystemCommon::TuneRequest => 1,
        }
    }

    #[track_caller]
    fn write<W: Write>(&self, out: &mut W) -> WriteResult<W> {
        let status = self.status_byte();
        match *self {
            SystemCommon::MtcQuarterFrame(kind, value) => {
                assert!(
                    value <= 0xF,
                    "time code quarter frame value {} does not fit in 4 bits",
                    value
                );
                out.write(&[status, kind.as_code() << 4 | value])
            }
            SystemCommon::SongPosition(pos) => {
                let [lsb, msb] = split_u14(pos, "song position");
                out.write(&[status, lsb, msb])
            }
            SystemCommon::SongSelect(song) => out.write(&[status, u7(song, "song")]),
            SystemCommon::Undefined1 | SystemCommon::Undefined2 | SystemCommon::TuneRequest => {
                out.write(&[status])
            }
        }
    }
}

/// The different kinds of info a Midi Time Code Quarter Frame message can carry.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MtcKind {
    /// The low nibble of the frame count.
    FramesLow,
    /// The high nibble of the frame count.
    FramesHigh,
    /// The low nibble of the second count.
    SecondsLow,
    /// The high nibble of the second count.
    SecondsHigh,
    /// The low nibble of the minute count.
    MinutesLow,
    /// The high nibble of the minute count.
    MinutesHigh,
    /// The low nibble of the hour count.
    HoursLow,
    /// The high nibble of the hour count and the SMPTE rate.
    HoursHigh,
}
impl MtcKind {
    /// All quarter frame kinds, in code order.
    pub const ALL: [MtcKind; 8] = [
        MtcKind::FramesLow,
        MtcKind::FramesHigh,
        MtcKind::SecondsLow,
        MtcKind::SecondsHigh,
        MtcKind::MinutesLow,
        MtcKind::MinutesHigh,
        MtcKind::HoursLow,
        MtcKind::HoursHigh,
    ];

    /// The 3-bit code of this kind.
    #[inline]
    pub fn as_code(self) -> u8 {
        use MtcKind::*;
        match self {
            FramesLow => 0,
            FramesHigh => 1,
            SecondsLow => 2,
            SecondsHigh => 3,
            MinutesLow => 4,
            MinutesHigh => 5,
            HoursLow => 6,
            HoursHigh => 7,
        }
    }

    /// Get the kind from the bottom 3 bits of the given code.
    #[inline]
    pub fn from_code(code: u8) -> MtcKind {
        MtcKind::ALL[(code & 0b111) as usize]
    }
}

/// System Realtime messages are one-byte messages that only occur within live MIDI streams.
/// They are usually time-sensitive, get top priority and can even be transmitted in between other
/// messages.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SystemRealtime {
    /// If sent, they should be sent 24 times per quarter note.
    TimingClock,
    /// The undefined `0xF9` message.
    Undefined1,
    /// Request the device to start playing at position 0.
    Start,
    /// Request the device to continue playing without resetting the position.
    Continue,
    /// Request the device to stop playing, but keep track of the position where it stopped.
    Stop,
    /// The undefined `0xFD` message.
    Undefined2,
    /// Once one of these messages is transmitted, a message should arrive every 300ms or else the
    /// connection is considered broken.
    ActiveSensing,
    /// Request the device to reset itself, usually to the same state as it was after turning on.
    Reset,
}
impl SystemRealtime {
    /// All realtime messages, in status byte order.
    pub const ALL: [SystemRealtime; 8] = [
        SystemRealtime::TimingClock,
        SystemRealtime::Undefined1,
        SystemRealtime::Start,
        SystemRealtime::Continue,
        SystemRealtime::Stop,
        SystemRealtime::Undefined2,
        SystemRealtime::ActiveSensing,
        SystemRealtime::Reset,
    ];

    /// Get the realtime message identified by the given status byte, if it is in the
    /// `0xF8..=0xFF` range.
    #[inline]
    pub fn from_status(status: u8) -> Option<SystemRealtime> {
        if status >= 0xF8 {
            Some(SystemRealtime::ALL[(status - 0xF8) as usize])
        } else {
            None
        }
    }

    /// Get the status byte for this system realtime message.
    #[inline]
    pub fn status_byte(self) -> u8 {
        use SystemRealtime::*;
        match self {
            TimingClock => 0xF8,
            Undefined1 => 0xF9,
            Start => 0xFA,
            Continue => 0xFB,
            Stop => 0xFC,
            Undefined2 => 0xFD,
            ActiveSensing => 0xFE,
            Reset => 0xFF,
        }
    }
}
