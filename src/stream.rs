//! Provides a way to decode MIDI messages out of a raw, non-delimited byte-stream, one byte at a
//! time, as they arrive from a UART or similar transport.
//!
//! Decoding never allocates and never fails: every byte is absorbed into the parser state, and
//! at most one registered handler is invoked before [`MidiParser::ingest`] returns.
//!
//! [`MidiParser::ingest`]: struct.MidiParser.html#method.ingest

use crate::{
    handler::{PairFn, RealtimeFn, RealtimeHandlers, ValueFn, VoiceHandler, VoiceHandlers},
    message::{ByteClass, ChannelFilter, RealtimeKind, VoiceKind},
    prelude::*,
};

/// A streaming raw MIDI parser, taking undelimited MIDI bytes, presumably from a cable.
///
/// All channel voice messages and all System Realtime messages are decoded, with running status.
/// System Common messages are not supported: they are skipped, and they end running status.
///
/// Decoded messages are dispatched to handlers registered through the `set_*_handler` methods.
/// Not all handlers have to be registered; messages without a handler are dropped silently.
/// Each handler receives the context `C` passed to `ingest`, which is how handlers share state.
///
/// ```
/// use monomidi::MidiParser;
///
/// #[derive(Default)]
/// struct Keys {
///     down: Vec<u8>,
/// }
///
/// fn note_on(keys: &mut Keys, _channel: u8, key: u8, vel: u8) {
///     if vel > 0 {
///         keys.down.push(key);
///     }
/// }
///
/// let mut parser = MidiParser::<Keys>::new();
/// parser.set_note_on_handler(Some(note_on));
///
/// let mut keys = Keys::default();
/// // A note on with running status: the second message omits its status byte
/// parser.feed(&[0x90, 60, 100, 64, 90], &mut keys);
/// assert_eq!(keys.down, [60, 64]);
/// ```
pub struct MidiParser<C = ()> {
    filter: ChannelFilter,
    /// Kind and channel of the message being received, doubling as running status.
    status: Option<(VoiceKind, u8)>,
    /// Data bytes still missing before the current message is complete.
    pending: usize,
    /// Data bytes of the current message, in arrival order.
    data: [u8; 2],
    voice: VoiceHandlers<C>,
    realtime: RealtimeHandlers<C>,
}
impl<C> MidiParser<C> {
    /// Create a fresh parser accepting messages on all channels, with no handlers registered.
    #[inline]
    pub fn new() -> MidiParser<C> {
        MidiParser::with_channel(ChannelFilter::Omni)
    }

    /// Create a fresh parser restricted to the given channel filter.
    #[inline]
    pub fn with_channel(filter: ChannelFilter) -> MidiParser<C> {
        MidiParser {
            filter,
            status: None,
            pending: 0,
            data: [0; 2],
            voice: VoiceHandlers::new(),
            realtime: RealtimeHandlers::new(),
        }
    }

    /// Restrict parsing to the given channel filter.
    ///
    /// The partially received message and running status are discarded.
    pub fn set_channel(&mut self, filter: ChannelFilter) {
        debug!("channel filter set to {:?}", filter);
        self.filter = filter;
        self.reset();
    }

    /// The channel filter the parser is restricted to.
    #[inline]
    pub fn channel(&self) -> ChannelFilter {
        self.filter
    }

    /// The status byte currently used as running status, if any.
    #[inline]
    pub fn running_status(&self) -> Option<u8> {
        self.status.map(|(kind, channel)| kind.status(channel))
    }

    /// Discard the partially received message and running status.
    ///
    /// The channel filter and the registered handlers are kept.
    #[inline]
    pub fn reset(&mut self) {
        self.status = None;
        self.pending = 0;
    }

    /// Feed a single byte to the parser, invoking at most one handler.
    pub fn ingest(&mut self, byte: u8, ctx: &mut C) {
        match ByteClass::of(byte) {
            ByteClass::Realtime(slot) => {
                // Realtime messages can show up anywhere, even between the data bytes of another
                // message, and must not disturb it.
                match self.realtime.get(slot) {
                    Some(handler) => handler(ctx),
                    None => trace!("no handler for realtime byte {:#04x}", byte),
                }
                return;
            }
            ByteClass::SystemCommon => {
                trace!("system common byte {:#04x} ends running status", byte);
                self.reset();
            }
            ByteClass::Voice { kind, channel } => {
                if self.filter.accepts(channel) {
                    self.status = Some((kind, channel));
                    self.pending = kind.arity();
                } else {
                    trace!("status byte {:#04x} filtered out", byte);
                    self.reset();
                }
            }
            ByteClass::Data(byte) => match self.status {
                Some((kind, _)) => {
                    self.data[kind.arity() - self.pending] = byte;
                    self.pending -= 1;
                }
                None => trace!("stray data byte {:#04x}", byte),
            },
        }

        if let (Some((kind, channel)), 0) = (self.status, self.pending) {
            if let Some(handler) = self.voice.get(kind) {
                handler.call(ctx, channel, &self.data);
            }
            // Stay primed for the next message sharing this status (running status)
            self.pending = kind.arity();
        }
    }

    /// Feed a slice of bytes to the parser.
    ///
    /// Equivalent to calling [`ingest`](#method.ingest) on each byte in order, so calling `feed`
    /// with many small slices is the same as calling it once with their concatenation.
    pub fn feed(&mut self, bytes: &[u8], ctx: &mut C) {
        for &byte in bytes {
            self.ingest(byte, ctx);
        }
    }

    /// Register or clear the handler for the given System Realtime message.
    #[inline]
    pub fn set_realtime_handler(&mut self, kind: RealtimeKind, handler: Option<RealtimeFn<C>>) {
        self.realtime.set(kind, handler);
    }

    #[inline]
    fn set_pair_handler(&mut self, kind: VoiceKind, handler: Option<PairFn<C>>) {
        self.voice.set(kind, handler.map(VoiceHandler::Pair));
    }

    #[inline]
    fn set_value_handler(&mut self, kind: VoiceKind, handler: Option<ValueFn<C>>) {
        self.voice.set(kind, handler.map(VoiceHandler::Value));
    }

    /// Handler receiving `(ctx, channel, key, velocity)`.
    pub fn set_note_off_handler(&mut self, handler: Option<PairFn<C>>) {
        self.set_pair_handler(VoiceKind::NoteOff, handler);
    }

    /// Handler receiving `(ctx, channel, key, velocity)`.
    ///
    /// Note that many devices send note offs as note ons with zero velocity.
    pub fn set_note_on_handler(&mut self, handler: Option<PairFn<C>>) {
        self.set_pair_handler(VoiceKind::NoteOn, handler);
    }

    /// Handler receiving `(ctx, channel, key, pressure)`.
    pub fn set_after_touch_handler(&mut self, handler: Option<PairFn<C>>) {
        self.set_pair_handler(VoiceKind::AfterTouch, handler);
    }

    /// Handler receiving `(ctx, channel, controller, value)`.
    pub fn set_control_change_handler(&mut self, handler: Option<PairFn<C>>) {
        self.set_pair_handler(VoiceKind::ControlChange, handler);
    }

    /// Handler receiving `(ctx, channel, program)`.
    pub fn set_program_change_handler(&mut self, handler: Option<ValueFn<C>>) {
        self.set_value_handler(VoiceKind::ProgramChange, handler);
    }

    /// Handler receiving `(ctx, channel, pressure)`.
    pub fn set_channel_pressure_handler(&mut self, handler: Option<ValueFn<C>>) {
        self.set_value_handler(VoiceKind::ChannelPressure, handler);
    }

    /// Handler receiving `(ctx, channel, lsb, msb)`.
    ///
    /// Use [`convert_pitch`](fn.convert_pitch.html) to turn the raw bytes into a signed value.
    pub fn set_pitch_wheel_handler(&mut self, handler: Option<PairFn<C>>) {
        self.set_pair_handler(VoiceKind::PitchWheel, handler);
    }

    /// Handler for `0xF8` timing clock, sent 24 times per quarter note.
    pub fn set_clock_handler(&mut self, handler: Option<RealtimeFn<C>>) {
        self.set_realtime_handler(RealtimeKind::TimingClock, handler);
    }

    /// Handler for `0xF9` tick.
    pub fn set_tick_handler(&mut self, handler: Option<RealtimeFn<C>>) {
        self.set_realtime_handler(RealtimeKind::Tick, handler);
    }

    /// Handler for `0xFA` start.
    pub fn set_start_handler(&mut self, handler: Option<RealtimeFn<C>>) {
        self.set_realtime_handler(RealtimeKind::Start, handler);
    }

    /// Handler for `0xFB` continue.
    pub fn set_continue_handler(&mut self, handler: Option<RealtimeFn<C>>) {
        self.set_realtime_handler(RealtimeKind::Continue, handler);
    }

    /// Handler for `0xFC` stop.
    pub fn set_stop_handler(&mut self, handler: Option<RealtimeFn<C>>) {
        self.set_realtime_handler(RealtimeKind::Stop, handler);
    }

    /// Handler for `0xFE` active sensing.
    pub fn set_active_sense_handler(&mut self, handler: Option<RealtimeFn<C>>) {
        self.set_realtime_handler(RealtimeKind::ActiveSensing, handler);
    }

    /// Handler for `0xFF` system reset.
    ///
    /// Only invokes the handler: the parser state itself is left alone.
    pub fn set_reset_handler(&mut self, handler: Option<RealtimeFn<C>>) {
        self.set_realtime_handler(RealtimeKind::Reset, handler);
    }
}
impl<C> Default for MidiParser<C> {
    #[inline]
    fn default() -> MidiParser<C> {
        MidiParser::new()
    }
}
impl<C> fmt::Debug for MidiParser<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MidiParser")
            .field("filter", &self.filter)
            .field("status", &self.status)
            .field("pending", &self.pending)
            .field("voice_handlers", &self.voice.registered())
            .field("realtime_handlers", &self.realtime.registered())
            .finish()
    }
}
