//! `midicat` reads raw MIDI bytes written out as text and prints every message the parser decodes.
//!
//! Input files hold whitespace-separated byte values, either decimal (`144`) or hexadecimal with a
//! `0x` prefix (`0x90`). With `--mono`, notes are routed through last-note-priority arbitration
//! and the tool prints what a monophonic instrument would play instead.
//!
//! Set `RUST_LOG=monomidi=trace` to see the bytes the parser drops.

use anyhow::{bail, Context};
use clap::Parser;
use monomidi::{convert_pitch, ChannelFilter, MidiParser, NoteArbiter, SILENCE_NOTE};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Text files holding byte values (decimal, or hexadecimal with a `0x` prefix)
    #[clap(required = true)]
    input: Vec<PathBuf>,

    /// Only decode voice messages on this zero-based channel (16 decodes all channels)
    #[clap(short = 'c', long, default_value_t = ChannelFilter::OMNI_RAW, value_parser = parse_channel)]
    channel: u8,

    /// Print the note a monophonic instrument would play instead of raw note messages
    #[clap(short = 'm', long, value_parser)]
    mono: bool,
}

fn parse_channel(arg: &str) -> Result<u8, String> {
    let raw: u8 = arg.parse().map_err(|err| format!("{}", err))?;
    ChannelFilter::from_raw(raw)
        .map(ChannelFilter::as_raw)
        .map_err(|err| err.to_string())
}

/// Parse a single byte token.
fn parse_byte(token: &str) -> anyhow::Result<u8> {
    let value = match token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16)?,
        None => token.parse::<u8>()?,
    };
    Ok(value)
}

/// Parse a whole input text into bytes, reporting the position of the first bad token.
fn parse_bytes(text: &str) -> anyhow::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    for (line_idx, line) in text.lines().enumerate() {
        for (token_idx, token) in line.split_whitespace().enumerate() {
            let byte = parse_byte(token).with_context(|| {
                format!(
                    "line {}, token {}: {:?} is not a byte value",
                    line_idx + 1,
                    token_idx + 1,
                    token
                )
            })?;
            bytes.push(byte);
        }
    }
    Ok(bytes)
}

/// State shared by all handlers while decoding one input.
#[derive(Default)]
struct Session {
    lines: Vec<String>,
    arbiter: NoteArbiter<Vec<String>>,
}

fn note_off(s: &mut Session, ch: u8, note: u8, vel: u8) {
    s.lines
        .push(format!("Note off ch={} note={} vel={}", ch, note, vel));
}

fn note_on(s: &mut Session, ch: u8, note: u8, vel: u8) {
    s.lines
        .push(format!("Note on ch={} note={} vel={}", ch, note, vel));
}

fn after_touch(s: &mut Session, ch: u8, note: u8, pres: u8) {
    s.lines
        .push(format!("After touch ch={} note={} pres={}", ch, note, pres));
}

fn control_change(s: &mut Session, ch: u8, ctl: u8, val: u8) {
    s.lines
        .push(format!("Control change ch={} ctl={} val={}", ch, ctl, val));
}

fn program_change(s: &mut Session, ch: u8, prog: u8) {
    s.lines
        .push(format!("Program change ch={} prog={}", ch, prog));
}

fn channel_pressure(s: &mut Session, ch: u8, pres: u8) {
    s.lines
        .push(format!("Channel pressure ch={} pres={}", ch, pres));
}

fn pitch_wheel(s: &mut Session, ch: u8, lsb: u8, msb: u8) {
    s.lines
        .push(format!("Pitch wheel ch={} val={}", ch, convert_pitch(lsb, msb)));
}

fn mono_note_on(s: &mut Session, _ch: u8, note: u8, vel: u8) {
    s.arbiter.note_event(&mut s.lines, note, vel);
}

fn mono_note_off(s: &mut Session, _ch: u8, note: u8, _vel: u8) {
    s.arbiter.note_event(&mut s.lines, note, 0);
}

fn now_playing(lines: &mut Vec<String>, note: u8, vel: u8) {
    if note == SILENCE_NOTE && vel == 0 {
        lines.push("Silence".to_string());
    } else {
        lines.push(format!("Playing note={} vel={}", note, vel));
    }
}

macro_rules! realtime_printers {
    ($($name:ident => $label:literal,)*) => {$(
        fn $name(s: &mut Session) {
            s.lines.push(concat!("RT ", $label).to_string());
        }
    )*};
}

realtime_printers! {
    rt_clock => "Clock",
    rt_tick => "Tick",
    rt_start => "Start",
    rt_continue => "Continue",
    rt_stop => "Stop",
    rt_active_sense => "Active sense",
    rt_reset => "Reset",
}

fn build_parser(filter: ChannelFilter, mono: bool) -> MidiParser<Session> {
    let mut parser = MidiParser::with_channel(filter);
    if mono {
        parser.set_note_on_handler(Some(mono_note_on));
        parser.set_note_off_handler(Some(mono_note_off));
    } else {
        parser.set_note_on_handler(Some(note_on));
        parser.set_note_off_handler(Some(note_off));
    }
    parser.set_after_touch_handler(Some(after_touch));
    parser.set_control_change_handler(Some(control_change));
    parser.set_program_change_handler(Some(program_change));
    parser.set_channel_pressure_handler(Some(channel_pressure));
    parser.set_pitch_wheel_handler(Some(pitch_wheel));
    parser.set_clock_handler(Some(rt_clock));
    parser.set_tick_handler(Some(rt_tick));
    parser.set_start_handler(Some(rt_start));
    parser.set_continue_handler(Some(rt_continue));
    parser.set_stop_handler(Some(rt_stop));
    parser.set_active_sense_handler(Some(rt_active_sense));
    parser.set_reset_handler(Some(rt_reset));
    parser
}

/// Decode a byte stream from scratch, returning one line per handler call.
fn decode(bytes: &[u8], filter: ChannelFilter, mono: bool) -> Vec<String> {
    let mut parser = build_parser(filter, mono);
    let mut session = Session::default();
    session.arbiter.set_handler(Some(now_playing));
    parser.feed(bytes, &mut session);
    session.lines
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let filter = ChannelFilter::from_raw(args.channel)?;

    let mut failed = 0;
    for path in &args.input {
        let result = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))
            .and_then(|text| parse_bytes(&text));
        let bytes = match result {
            Ok(bytes) => bytes,
            Err(err) => {
                eprintln!("{}: {:#}", path.display(), err);
                failed += 1;
                continue;
            }
        };
        info!(path = %path.display(), bytes = bytes.len(), ?filter, "decoding");
        for line in decode(&bytes, filter, args.mono) {
            println!("{}", line);
        }
    }
    if failed > 0 {
        bail!("{} of {} inputs could not be read", failed, args.input.len());
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn byte_tokens() {
        assert_eq!(parse_byte("144").unwrap(), 144);
        assert_eq!(parse_byte("0x90").unwrap(), 0x90);
        assert_eq!(parse_byte("0XfE").unwrap(), 0xFE);
        assert!(parse_byte("256").is_err());
        assert!(parse_byte("0x").is_err());
        assert!(parse_byte("note").is_err());
    }

    #[test]
    fn bad_token_position() {
        assert_eq!(parse_bytes("0x90 60\n 100\n").unwrap(), [0x90, 60, 100]);
        let err = parse_bytes("0x90 60\n100 0x1G0").unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.starts_with("line 2, token 2: \"0x1G0\""), "{}", msg);
    }

    #[test]
    fn channel_argument() {
        assert_eq!(parse_channel("0"), Ok(0));
        assert_eq!(parse_channel("16"), Ok(16));
        assert!(parse_channel("17").is_err());
        assert!(parse_channel("-1").is_err());
    }

    #[test]
    fn dump() {
        let bytes = [
            0x90, 48, 80, 0xF8, 52, 90, 0x80, 48, 0, 0xB0, 7, 100, 0xE0, 0x00, 0x40, 0xD0, 12,
            0xFA,
        ];
        assert_eq!(
            decode(&bytes, ChannelFilter::Omni, false),
            [
                "Note on ch=0 note=48 vel=80",
                "RT Clock",
                "Note on ch=0 note=52 vel=90",
                "Note off ch=0 note=48 vel=0",
                "Control change ch=0 ctl=7 val=100",
                "Pitch wheel ch=0 val=0",
                "Channel pressure ch=0 pres=12",
                "RT Start",
            ]
        );
    }

    #[test]
    fn filtered_dump() {
        let bytes = [0x91, 60, 100, 0x90, 61, 100, 0xC1, 5];
        assert_eq!(
            decode(&bytes, ChannelFilter::channel(1), false),
            ["Note on ch=1 note=60 vel=100", "Program change ch=1 prog=5"]
        );
    }

    #[test]
    fn mono_dump() {
        let bytes = [0x90, 60, 100, 64, 90, 64, 0, 0x80, 60, 0];
        assert_eq!(
            decode(&bytes, ChannelFilter::Omni, true),
            [
                "Playing note=60 vel=100",
                "Playing note=64 vel=90",
                "Playing note=60 vel=100",
                "Silence",
            ]
        );
    }
}
