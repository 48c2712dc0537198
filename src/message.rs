//! Classification of raw MIDI bytes and the message kinds understood by the parser.

use crate::prelude::*;

/// What a single byte means when it arrives on a raw MIDI stream.
///
/// Bytes are classified purely by their bit pattern, in priority order: realtime, system
/// common, channel voice status and finally data bytes.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum ByteClass {
    /// A one-byte System Realtime message (`0xF8 ..= 0xFF`).
    ///
    /// Carries the realtime slot, that is, the bottom 3 bits of the byte.
    Realtime(u8),
    /// A System Common status byte (`0xF0 ..= 0xF7`).
    SystemCommon,
    /// A channel voice status byte (`0x80 ..= 0xEF`).
    Voice {
        /// The kind of voice message, from the top nibble.
        kind: VoiceKind,
        /// The channel the message is addressed to, from the bottom nibble.
        channel: u8,
    },
    /// A data byte (`0x00 ..= 0x7F`).
    Data(u8),
}
impl ByteClass {
    /// Classify a raw byte.
    #[inline]
    pub fn of(byte: u8) -> ByteClass {
        match byte {
            0xF8..=0xFF => ByteClass::Realtime(byte & 0x07),
            0xF0..=0xF7 => ByteClass::SystemCommon,
            0x80..=0xEF => ByteClass::Voice {
                kind: VoiceKind::from_nibble(byte >> 4),
                channel: byte & 0x0F,
            },
            _ => ByteClass::Data(byte),
        }
    }
}

/// The seven channel voice messages.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum VoiceKind {
    /// Parameters: key, velocity.
    NoteOff,
    /// Parameters: key, velocity.
    NoteOn,
    /// Polyphonic key pressure. Parameters: key, pressure.
    AfterTouch,
    /// Parameters: controller, value.
    ControlChange,
    /// Parameters: program.
    ProgramChange,
    /// Parameters: pressure.
    ChannelPressure,
    /// Parameters: least significant 7 bits, most significant 7 bits.
    ///
    /// See [`PitchBend::from_raw`](struct.PitchBend.html#method.from_raw).
    PitchWheel,
}
impl VoiceKind {
    /// All voice kinds, in status order.
    pub const ALL: [VoiceKind; 7] = [
        VoiceKind::NoteOff,
        VoiceKind::NoteOn,
        VoiceKind::AfterTouch,
        VoiceKind::ControlChange,
        VoiceKind::ProgramChange,
        VoiceKind::ChannelPressure,
        VoiceKind::PitchWheel,
    ];

    /// Get the voice kind of a status byte, if it is a channel voice status byte.
    #[inline]
    pub fn from_status(status: u8) -> Option<VoiceKind> {
        match status {
            0x80..=0xEF => Some(VoiceKind::from_nibble(status >> 4)),
            _ => None,
        }
    }

    /// Only valid for nibbles in `0x8 ..= 0xE`.
    #[inline]
    fn from_nibble(nibble: u8) -> VoiceKind {
        VoiceKind::ALL[(nibble & 0x7) as usize]
    }

    /// The top nibble of the status byte for this kind of message.
    #[inline]
    pub fn status_nibble(self) -> u8 {
        0x8 | self.index() as u8
    }

    /// Build a full status byte, addressed to the given channel.
    #[inline]
    pub fn status(self, channel: u8) -> u8 {
        self.status_nibble() << 4 | (channel & 0x0F)
    }

    /// How many data bytes follow the status byte of this message.
    #[inline]
    pub fn arity(self) -> usize {
        match self {
            VoiceKind::ProgramChange | VoiceKind::ChannelPressure => 1,
            _ => 2,
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// The usable System Realtime messages.
///
/// Slot 5 (`0xFD`) is undefined by the MIDI standard and has no variant.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum RealtimeKind {
    /// `0xF8`. If sent, they should be sent 24 times per quarter note.
    TimingClock,
    /// `0xF9`. Sent every 10 milliseconds by some devices.
    Tick,
    /// `0xFA`. Start playing at position 0.
    Start,
    /// `0xFB`. Continue playing without resetting the position.
    Continue,
    /// `0xFC`. Stop playing, but keep track of the position where it stopped.
    Stop,
    /// `0xFE`. Once one of these messages is transmitted, a message should arrive every 300ms or
    /// else the connection is considered broken.
    ActiveSensing,
    /// `0xFF`. Reset to the power-up condition.
    Reset,
}
impl RealtimeKind {
    /// All usable realtime kinds, in status order.
    pub const ALL: [RealtimeKind; 7] = [
        RealtimeKind::TimingClock,
        RealtimeKind::Tick,
        RealtimeKind::Start,
        RealtimeKind::Continue,
        RealtimeKind::Stop,
        RealtimeKind::ActiveSensing,
        RealtimeKind::Reset,
    ];

    /// Get the realtime kind of a status byte.
    ///
    /// Returns `None` for non-realtime bytes and for the undefined `0xFD` byte.
    #[inline]
    pub fn from_status(status: u8) -> Option<RealtimeKind> {
        use RealtimeKind::*;
        Some(match status {
            0xF8 => TimingClock,
            0xF9 => Tick,
            0xFA => Start,
            0xFB => Continue,
            0xFC => Stop,
            0xFE => ActiveSensing,
            0xFF => Reset,
            _ => return None,
        })
    }

    /// Get the id byte for this system realtime message.
    #[inline]
    pub fn encode(self) -> u8 {
        0xF8 | self.slot() as u8
    }

    /// The handler slot of this message, which is the bottom 3 bits of its status byte.
    #[inline]
    pub(crate) fn slot(self) -> usize {
        use RealtimeKind::*;
        match self {
            TimingClock => 0,
            Tick => 1,
            Start => 2,
            Continue => 3,
            Stop => 4,
            ActiveSensing => 6,
            Reset => 7,
        }
    }
}

/// Which channels a parser accepts voice messages from.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum ChannelFilter {
    /// Accept voice messages on all 16 channels.
    Omni,
    /// Accept voice messages on a single, zero-based, channel.
    ///
    /// Only the bottom 4 bits are significant.
    Channel(u8),
}
impl ChannelFilter {
    /// The raw value conventionally used to mean "all channels".
    pub const OMNI_RAW: u8 = 16;

    /// Build a filter for a single channel, masking off any extra bits.
    #[inline]
    pub fn channel(channel: u8) -> ChannelFilter {
        ChannelFilter::Channel(channel & 0x0F)
    }

    /// Build a filter from a raw channel number: `0 ..= 15` for a specific channel or
    /// [`OMNI_RAW`](#associatedconstant.OMNI_RAW) for all channels.
    pub fn from_raw(raw: u8) -> Result<ChannelFilter> {
        ensure!(
            raw <= Self::OMNI_RAW,
            err_invalid!("channel must be in 0..=15, or 16 for omni")
        );
        Ok(if raw == Self::OMNI_RAW {
            ChannelFilter::Omni
        } else {
            ChannelFilter::Channel(raw)
        })
    }

    /// The inverse of `from_raw`.
    #[inline]
    pub fn as_raw(self) -> u8 {
        match self {
            ChannelFilter::Omni => Self::OMNI_RAW,
            ChannelFilter::Channel(ch) => ch & 0x0F,
        }
    }

    /// Whether voice messages on `channel` pass this filter.
    #[inline]
    pub fn accepts(self, channel: u8) -> bool {
        match self {
            ChannelFilter::Omni => true,
            ChannelFilter::Channel(ch) => ch & 0x0F == channel & 0x0F,
        }
    }
}
impl Default for ChannelFilter {
    #[inline]
    fn default() -> ChannelFilter {
        ChannelFilter::Omni
    }
}

/// A pitch-wheel position, stored as a signed value in the range
/// `PitchBend::MIN ..= PitchBend::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PitchBend(pub i16);
impl PitchBend {
    /// The minimum pitch-bend value, indicating full bend downwards.
    pub const MIN: i16 = -0x2000;
    /// The middle/zero pitch-bend value, indicating no bend.
    pub const MID: i16 = 0;
    /// The maximum pitch-bend value, indicating full bend upwards.
    pub const MAX: i16 = 0x1FFF;

    /// Combine the two data bytes of a pitch-wheel message, in arrival order.
    ///
    /// ```
    /// use monomidi::PitchBend;
    ///
    /// assert_eq!(PitchBend::from_raw(0x00, 0x00).as_i16(), PitchBend::MIN);
    /// assert_eq!(PitchBend::from_raw(0x00, 0x40).as_i16(), 0);
    /// assert_eq!(PitchBend::from_raw(0x7F, 0x7F).as_i16(), PitchBend::MAX);
    /// ```
    #[inline]
    pub const fn from_raw(lsb: u8, msb: u8) -> PitchBend {
        PitchBend::from_u16((lsb & 0x7F) as u16 | ((msb & 0x7F) as u16) << 7)
    }

    /// Convert from an unsigned integer in the range `0..=0x3FFF`, where `0x2000` is the middle
    /// value.
    #[inline]
    pub const fn from_u16(uint: u16) -> PitchBend {
        PitchBend((uint as i16).wrapping_add(Self::MIN))
    }

    /// Convert the pitchbend value as an unsigned integer in the range `0..=0x3FFF`, where `0x2000`
    /// is the middle value.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0.wrapping_sub(Self::MIN) as u16
    }

    /// Split back into the two data bytes, least significant first.
    #[inline]
    pub const fn as_raw(self) -> (u8, u8) {
        let uint = self.as_u16();
        ((uint & 0x7F) as u8, (uint >> 7) as u8 & 0x7F)
    }

    /// Cast the pitchbend value as a signed integer in the range `-0x2000..=0x1FFF`, where `0` is
    /// the middle value.
    #[inline]
    pub const fn as_i16(self) -> i16 {
        self.0
    }

    /// Cast the pitchbend value as a floating-point value in the range `-1.0 ..= 1.0`, where `0.0`
    /// is the middle value.
    #[inline]
    pub fn as_f32(self) -> f32 {
        self.as_i16() as f32 * (-1. / Self::MIN as f32)
    }
}

/// Convert the two data bytes received by a pitch-wheel handler into a value between -8192 and
/// 8191, where 0 means no pitch shift.
///
/// Shorthand for `PitchBend::from_raw(lsb, msb).as_i16()`.
#[inline]
pub const fn convert_pitch(lsb: u8, msb: u8) -> i16 {
    PitchBend::from_raw(lsb, msb).as_i16()
}
