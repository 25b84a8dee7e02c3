//! Classification of status bytes and decoding of complete raw messages.

use crate::{
    message::{ChannelMessage, MidiMessage, MtcKind, SystemCommon, SystemRealtime},
    primitive::join_u14,
};

/// The kind of message announced by a status byte, which determines how many data bytes follow
/// it.
///
/// Obtained through [`MessageKind::classify`](#method.classify).
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum MessageKind {
    NoteOff,
    NoteOn,
    PolyPressure,
    Controller,
    ProgramChange,
    ChannelPressure,
    PitchBend,
    /// The start of a System Exclusive message, terminated by an `0xF7` byte.
    SysEx,
    MtcQuarterFrame,
    SongPosition,
    SongSelect,
    CommonUndefined1,
    CommonUndefined2,
    TuneRequest,
    Realtime(SystemRealtime),
}
impl MessageKind {
    /// Classify a byte according to the MIDI status byte table.
    ///
    /// Returns `None` for data bytes (`0x00..=0x7F`) and for the System Exclusive end marker
    /// (`0xF7`), which terminates a message but cannot start one.
    /// Every other byte maps to a kind.
    pub fn classify(byte: u8) -> Option<MessageKind> {
        use self::MessageKind::*;
        Some(match byte {
            0x00..=0x7F => return None,
            0x80..=0xEF => match byte >> 4 {
                0x8 => NoteOff,
                0x9 => NoteOn,
                0xA => PolyPressure,
                0xB => Controller,
                0xC => ProgramChange,
                0xD => ChannelPressure,
                _ => PitchBend,
            },
            0xF0 => SysEx,
            0xF1 => MtcQuarterFrame,
            0xF2 => SongPosition,
            0xF3 => SongSelect,
            0xF4 => CommonUndefined1,
            0xF5 => CommonUndefined2,
            0xF6 => TuneRequest,
            0xF7 => return None,
            0xF8..=0xFF => Realtime(SystemRealtime::from_status(byte)?),
        })
    }

    /// The total length of messages of this kind on the wire, including the status byte.
    ///
    /// System Exclusive messages have no fixed length, in which case `None` is returned.
    #[inline]
    pub fn wire_len(self) -> Option<usize> {
        use self::MessageKind::*;
        Some(match self {
            NoteOff | NoteOn | PolyPressure | Controller | PitchBend | SongPosition => 3,
            ProgramChange | ChannelPressure | MtcQuarterFrame | SongSelect => 2,
            CommonUndefined1 | CommonUndefined2 | TuneRequest | Realtime(_) => 1,
            SysEx => return None,
        })
    }

    /// Whether this is a channel message kind.
    ///
    /// Only channel messages take part in running status.
    #[inline]
    pub fn is_channel(self) -> bool {
        use self::MessageKind::*;
        matches!(
            self,
            NoteOff | NoteOn | PolyPressure | Controller | ProgramChange | ChannelPressure | PitchBend
        )
    }

    /// Decode a complete raw message of this fixed-length kind.
    ///
    /// `raw` must start with the status byte that was classified as this kind, and hold exactly
    /// `wire_len` bytes.
    /// Data bytes are masked to 7 bits.
    ///
    /// # Panics
    ///
    /// Panics if `raw` is shorter than the length of this kind, or if this kind is `SysEx`, whose
    /// bytes are taken whole out of the stream buffer instead.
    pub(crate) fn decode(self, raw: &[u8]) -> MidiMessage {
        use self::MessageKind::*;
        debug_assert!(self.wire_len().map_or(true, |len| raw.len() == len));
        let channel = raw[0] & 0xF;
        let data = |idx: usize| raw[idx] & 0x7F;
        let chan = |msg| MidiMessage::Channel { channel, msg };
        match self {
            NoteOff => chan(ChannelMessage::NoteOff {
                key: data(1),
                vel: data(2),
            }),
            NoteOn => chan(ChannelMessage::NoteOn {
                key: data(1),
                vel: data(2),
            }),
            PolyPressure => chan(ChannelMessage::PolyPressure {
                key: data(1),
                pressure: data(2),
            }),
            Controller => chan(ChannelMessage::Controller {
                controller: data(1),
                value: data(2),
            }),
            ProgramChange => chan(ChannelMessage::ProgramChange { program: data(1) }),
            ChannelPressure => chan(ChannelMessage::ChannelPressure { pressure: data(1) }),
            PitchBend => chan(ChannelMessage::PitchBend {
                bend: join_u14(raw[1], raw[2]),
            }),
            SysEx => unreachable!("system exclusive messages have no fixed length"),
            MtcQuarterFrame => MidiMessage::Common(SystemCommon::MtcQuarterFrame(
                MtcKind::from_code(data(1) >> 4),
                data(1) & 0xF,
            )),
            SongPosition => {
                MidiMessage::Common(SystemCommon::SongPosition(join_u14(raw[1], raw[2])))
            }
            SongSelect => MidiMessage::Common(SystemCommon::SongSelect(data(1))),
            CommonUndefined1 => MidiMessage::Common(SystemCommon::Undefined1),
            CommonUndefined2 => MidiMessage::Common(SystemCommon::Undefined2),
            TuneRequest => MidiMessage::Common(SystemCommon::TuneRequest),
            Realtime(realtime) => MidiMessage::Realtime(realtime),
        }
    }
}
