//! "Last note priority" arbitration, letting a monophonic instrument be played from a polyphonic
//! controller.
//!
//! The still-held note that was pressed last is the one that plays.
//! Releasing it falls back to the most recent note that is still held, like popping a stack.

use crate::prelude::*;

/// The note passed to the now-playing handler to request silence.
pub const SILENCE_NOTE: u8 = 1;

/// The default amount of notes an arbiter can hold at once.
pub const DEFAULT_CAPACITY: usize = 16;

/// Handler receiving `(ctx, note, velocity)` whenever the note that should play changes.
///
/// Silence is signalled as note [`SILENCE_NOTE`](constant.SILENCE_NOTE.html) with velocity 0.
pub type NowPlayingFn<C> = fn(&mut C, u8, u8);

/// A note currently held down.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Default)]
pub struct HeldNote {
    /// The key number.
    pub note: u8,
    /// The velocity of the note on that pressed it, never zero.
    pub vel: u8,
}

/// Decides which single note should sound out of an interleaved stream of note ons and note offs.
///
/// Register one handler through [`set_handler`](#method.set_handler); it is told which note
/// should play at what velocity.
/// Then pass every note on and note off to [`note_event`](#method.note_event).
///
/// At most `N` notes are held at once. While full, every note on is dropped, even one for a note
/// that is already held.
///
/// ```
/// use monomidi::NoteArbiter;
///
/// fn play(out: &mut Vec<(u8, u8)>, note: u8, vel: u8) {
///     out.push((note, vel));
/// }
///
/// let mut arbiter = NoteArbiter::<Vec<(u8, u8)>>::new();
/// arbiter.set_handler(Some(play));
///
/// let mut out = Vec::new();
/// arbiter.note_event(&mut out, 60, 100);
/// arbiter.note_event(&mut out, 64, 90);
/// arbiter.note_event(&mut out, 64, 0);
/// arbiter.note_event(&mut out, 60, 0);
/// assert_eq!(out, [(60, 100), (64, 90), (60, 100), (1, 0)]);
/// ```
pub struct NoteArbiter<C = (), const N: usize = DEFAULT_CAPACITY> {
    handler: Option<NowPlayingFn<C>>,
    /// Oldest first. Only the first `len` entries are meaningful.
    held: [HeldNote; N],
    len: usize,
}
impl<C> NoteArbiter<C> {
    /// Create an empty arbiter with the default capacity.
    #[inline]
    pub fn new() -> NoteArbiter<C> {
        NoteArbiter::with_capacity()
    }
}
impl<C, const N: usize> NoteArbiter<C, N> {
    /// Create an empty arbiter holding at most `N` notes.
    #[inline]
    pub fn with_capacity() -> NoteArbiter<C, N> {
        NoteArbiter {
            handler: None,
            held: [HeldNote::default(); N],
            len: 0,
        }
    }

    /// Register or clear the now-playing handler.
    #[inline]
    pub fn set_handler(&mut self, handler: Option<NowPlayingFn<C>>) {
        self.handler = handler;
    }

    /// Notify the arbiter of a note on (`vel > 0`) or a note off (`vel == 0`).
    ///
    /// Invokes the handler at most once, when the note that should play changes.
    pub fn note_event(&mut self, ctx: &mut C, note: u8, vel: u8) {
        if vel > 0 {
            self.note_on(ctx, note, vel);
        } else {
            self.note_off(ctx, note);
        }
    }

    fn note_on(&mut self, ctx: &mut C, note: u8, vel: u8) {
        if self.is_full() {
            trace!("note stack full, dropping note {}", note);
            return;
        }
        if let Some(idx) = self.position(note) {
            // Retriggering a held note moves it to the top
            self.remove(idx);
        }
        self.held[self.len] = HeldNote { note, vel };
        self.len += 1;
        self.notify(ctx, note, vel);
    }

    fn note_off(&mut self, ctx: &mut C, note: u8) {
        let idx = match self.position(note) {
            Some(idx) => idx,
            None => {
                trace!("note {} released but not held", note);
                return;
            }
        };
        self.remove(idx);
        match self.current() {
            None => self.notify(ctx, SILENCE_NOTE, 0),
            // Releasing any note but the top one changes nothing audible
            Some(top) if idx == self.len => self.notify(ctx, top.note, top.vel),
            Some(_) => {}
        }
    }

    /// Forget all held notes and request silence, whatever was playing before.
    pub fn reset(&mut self, ctx: &mut C) {
        self.len = 0;
        self.notify(ctx, SILENCE_NOTE, 0);
    }

    /// The note that should be playing right now, if any.
    #[inline]
    pub fn current(&self) -> Option<HeldNote> {
        self.held().last().copied()
    }

    /// All held notes, oldest first.
    #[inline]
    pub fn held(&self) -> &[HeldNote] {
        &self.held[..self.len]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len >= N
    }

    /// The maximum amount of notes held at once.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline]
    fn position(&self, note: u8) -> Option<usize> {
        self.held().iter().position(|held| held.note == note)
    }

    /// Remove the entry at `idx`, shifting later entries down to keep their order.
    #[inline]
    fn remove(&mut self, idx: usize) {
        self.held.copy_within(idx + 1..self.len, idx);
        self.len -= 1;
    }

    #[inline]
    fn notify(&self, ctx: &mut C, note: u8, vel: u8) {
        if let Some(handler) = self.handler {
            handler(ctx, note, vel);
        }
    }
}
impl<C> Default for NoteArbiter<C> {
    #[inline]
    fn default() -> NoteArbiter<C> {
        NoteArbiter::new()
    }
}
impl<C, const N: usize> fmt::Debug for NoteArbiter<C, N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NoteArbiter")
            .field("held", &self.held())
            .field("capacity", &N)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}
