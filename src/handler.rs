//! Handler types invoked by the parser and the note arbiter.
//!
//! Handlers are plain function pointers, so registering them never allocates.
//! Instead of capturing state, every handler receives a mutable reference to a caller-owned
//! context `C`, which is passed to [`MidiParser::ingest`](../struct.MidiParser.html#method.ingest)
//! along with each byte.

use crate::message::{RealtimeKind, VoiceKind};

/// Handler for System Realtime messages, which carry no data.
pub type RealtimeFn<C> = fn(&mut C);

/// Handler for voice messages with a single data byte: `(ctx, channel, value)`.
///
/// Used for program change and channel pressure.
pub type ValueFn<C> = fn(&mut C, u8, u8);

/// Handler for voice messages with two data bytes: `(ctx, channel, first, second)`, with the data
/// bytes in arrival order.
///
/// Used for note off, note on, after-touch, control change and pitch wheel.
pub type PairFn<C> = fn(&mut C, u8, u8, u8);

/// A registered voice message handler, tagged with the amount of data bytes it takes.
pub enum VoiceHandler<C> {
    /// Program change and channel pressure.
    Value(ValueFn<C>),
    /// All other voice messages.
    Pair(PairFn<C>),
}
impl<C> VoiceHandler<C> {
    /// Invoke the handler with the data bytes of a complete message, in arrival order.
    #[inline]
    pub(crate) fn call(self, ctx: &mut C, channel: u8, data: &[u8; 2]) {
        match self {
            VoiceHandler::Value(f) => f(ctx, channel, data[0]),
            VoiceHandler::Pair(f) => f(ctx, channel, data[0], data[1]),
        }
    }
}
impl<C> Clone for VoiceHandler<C> {
    #[inline]
    fn clone(&self) -> VoiceHandler<C> {
        *self
    }
}
impl<C> Copy for VoiceHandler<C> {}

/// Voice message handlers, keyed by message kind.
pub(crate) struct VoiceHandlers<C> {
    slots: [Option<VoiceHandler<C>>; 7],
}
impl<C> VoiceHandlers<C> {
    #[inline]
    pub(crate) fn new() -> VoiceHandlers<C> {
        VoiceHandlers { slots: [None; 7] }
    }

    #[inline]
    pub(crate) fn get(&self, kind: VoiceKind) -> Option<VoiceHandler<C>> {
        self.slots[kind.index()]
    }

    #[inline]
    pub(crate) fn set(&mut self, kind: VoiceKind, handler: Option<VoiceHandler<C>>) {
        self.slots[kind.index()] = handler;
    }

    pub(crate) fn registered(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

/// System Realtime handlers, addressed by the bottom 3 bits of the status byte.
///
/// Slot 5 is never populated.
pub(crate) struct RealtimeHandlers<C> {
    slots: [Option<RealtimeFn<C>>; 8],
}
impl<C> RealtimeHandlers<C> {
    #[inline]
    pub(crate) fn new() -> RealtimeHandlers<C> {
        RealtimeHandlers { slots: [None; 8] }
    }

    #[inline]
    pub(crate) fn get(&self, slot: u8) -> Option<RealtimeFn<C>> {
        self.slots[(slot & 0x07) as usize]
    }

    #[inline]
    pub(crate) fn set(&mut self, kind: RealtimeKind, handler: Option<RealtimeFn<C>>) {
        self.slots[kind.slot()] = handler;
    }

    pub(crate) fn registered(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}
