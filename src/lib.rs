//! # Overview
//!
//! `monomidi` decodes raw MIDI byte-streams one byte at a time, and decides which single note a
//! monophonic instrument should play when driven from a polyphonic controller.
//!
//! Both pieces are meant to run inline with byte reception (a UART interrupt, a polling loop):
//! each byte or note event is handled in constant time, without allocating, blocking or failing.
//!
//! The crate has two independent parts:
//!
//! - [`MidiParser`](struct.MidiParser.html), a streaming parser with running status support
//!     and an optional channel filter, which dispatches complete messages to registered
//!     handlers.
//! - [`NoteArbiter`](struct.NoteArbiter.html), which keeps track of held notes and tells its
//!     handler which one should sound, giving priority to the last note pressed.
//!
//! # Handlers and context
//!
//! Handlers are plain function pointers.
//! To let handlers share state without allocating, every handler receives a mutable reference to
//! a context chosen by the caller, passed along with each byte or event.
//!
//! Wiring a parser to an arbiter is done through this context:
//!
//! ```rust
//! use monomidi::{ChannelFilter, MidiParser, NoteArbiter};
//!
//! #[derive(Default)]
//! struct Synth {
//!     arbiter: NoteArbiter<Voice>,
//!     voice: Voice,
//! }
//!
//! #[derive(Default)]
//! struct Voice {
//!     note: Option<u8>,
//! }
//!
//! fn play(voice: &mut Voice, note: u8, vel: u8) {
//!     voice.note = if vel > 0 { Some(note) } else { None };
//! }
//!
//! fn note_on(synth: &mut Synth, _ch: u8, note: u8, vel: u8) {
//!     synth.arbiter.note_event(&mut synth.voice, note, vel);
//! }
//!
//! fn note_off(synth: &mut Synth, _ch: u8, note: u8, _vel: u8) {
//!     synth.arbiter.note_event(&mut synth.voice, note, 0);
//! }
//!
//! let mut synth = Synth::default();
//! synth.arbiter.set_handler(Some(play));
//!
//! let mut parser = MidiParser::<Synth>::with_channel(ChannelFilter::channel(2));
//! parser.set_note_on_handler(Some(note_on));
//! parser.set_note_off_handler(Some(note_off));
//!
//! // Two keys pressed on channel 2, then the second one released
//! parser.feed(&[0x92, 60, 100, 0x92, 67, 100], &mut synth);
//! assert_eq!(synth.voice.note, Some(67));
//! parser.feed(&[0x82, 67, 0], &mut synth);
//! assert_eq!(synth.voice.note, Some(60));
//!
//! // Messages on other channels are ignored
//! parser.feed(&[0x93, 72, 100], &mut synth);
//! assert_eq!(synth.voice.note, Some(60));
//! ```
//!
//! # Decoding policy
//!
//! All channel voice messages and System Realtime messages are decoded.
//! System Common messages (including SysEx) are not supported: they are skipped and end running
//! status, without corrupting the parser state.
//!
//! Malformed input never produces an error.
//! Data bytes with no active status are dropped, as are note ons beyond the arbiter capacity and
//! note offs for notes that are not held.
//!
//! # About features
//!
//! - The `std` feature
//!
//!   Enabled by default. Only implements `std::error::Error` for [`Error`](struct.Error.html).
//!   Disable it with `default-features = false` to make the crate `no_std`.
//!
//! - The `tracing` feature
//!
//!   Emits [`tracing`](https://docs.rs/tracing) events whenever input is absorbed silently, which
//!   helps when debugging a noisy connection. Off by default.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

macro_rules! bail {
    ($err:expr) => {{
        return Err($err.into());
    }};
}
macro_rules! ensure {
    ($cond:expr, $err:expr) => {{
        if !$cond {
            bail!($err)
        }
    }};
}

macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        tracing::trace!($($arg)*);
    }};
}
macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        tracing::debug!($($arg)*);
    }};
}

/// All of the errors this crate produces.
#[macro_use]
mod error;

mod prelude {
    pub(crate) use crate::error::{ErrorKind, Result};
    pub(crate) use core::fmt;
}

pub mod handler;
mod message;
mod poly;
mod stream;

pub use crate::{
    error::{Error, ErrorKind, Result},
    message::{convert_pitch, ByteClass, ChannelFilter, PitchBend, RealtimeKind, VoiceKind},
    poly::{HeldNote, NoteArbiter, NowPlayingFn, DEFAULT_CAPACITY, SILENCE_NOTE},
    stream::MidiParser,
};
