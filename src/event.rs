//! event.rs
//!
//! Decoding of single track events.
//!
//! A track chunk is a flat run of `<delta-time> <event>` pairs. The delta is a
//! variable-length quantity, the event starts with a status byte whose high
//! nibble says what kind of message it is:
//!
//! - `0x80..=0xEF` channel voice messages, low nibble is the channel
//! - `0xF0..=0xFE` system exclusive / common / real-time messages
//! - `0xFF` meta events, only found in files, never on the wire
//!
//! Channel messages may omit the status byte when it repeats the previous one
//! ("running status"). The decoder does not keep that state itself: callers
//! pass the previous event's status in and read the new one back out of the
//! returned [`Event`].

use std::fmt;

use crate::error::{DecodeError, Warning, warn};
use crate::reader::ByteReader;

pub const NOTE_OFF: u8 = 0x80;
pub const NOTE_ON: u8 = 0x90;
pub const AFTERTOUCH: u8 = 0xA0;
pub const CONTROL_CHANGE: u8 = 0xB0;
pub const PROGRAM_CHANGE: u8 = 0xC0;
pub const CHANNEL_PRESSURE: u8 = 0xD0;
pub const PITCH_BEND: u8 = 0xE0;
pub const SYSTEM: u8 = 0xF0;

pub const SYSEX_START: u8 = 0xF0;
pub const TIME_CODE_QUARTER_FRAME: u8 = 0xF1;
pub const SONG_POSITION: u8 = 0xF2;
pub const SONG_SELECT: u8 = 0xF3;
pub const TUNE_REQUEST: u8 = 0xF6;
pub const SYSEX_END: u8 = 0xF7;
pub const TIMING_CLOCK: u8 = 0xF8;
pub const START: u8 = 0xFA;
pub const CONTINUE: u8 = 0xFB;
pub const STOP: u8 = 0xFC;
pub const ACTIVE_SENSING: u8 = 0xFE;
pub const META: u8 = 0xFF;

pub const META_SEQUENCE_NUMBER: u8 = 0x00;
pub const META_TEXT: u8 = 0x01;
pub const META_COPYRIGHT: u8 = 0x02;
pub const META_SEQUENCE_NAME: u8 = 0x03;
pub const META_INSTRUMENT: u8 = 0x04;
pub const META_LYRIC: u8 = 0x05;
pub const META_MARKER: u8 = 0x06;
pub const META_CUE_POINT: u8 = 0x07;
pub const META_PROGRAM_NAME: u8 = 0x08;
pub const META_DEVICE_NAME: u8 = 0x09;
pub const META_END_OF_TRACK: u8 = 0x2F;
pub const META_TEMPO: u8 = 0x51;
pub const META_TIME_SIGNATURE: u8 = 0x58;
pub const META_KEY_SIGNATURE: u8 = 0x59;
pub const META_SEQUENCER_SPECIFIC: u8 = 0x7F;

/// Largest SysEx / text payload kept per event. Longer payloads are cut.
pub const MAX_PAYLOAD: usize = 255;

/// One decoded track event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Ticks since the previous event in the same track.
    pub delta: u32,
    /// Effective status byte, after running status has been applied.
    pub status: u8,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    NoteOff { channel: u8, key: u8, velocity: u8 },
    NoteOn { channel: u8, key: u8, velocity: u8 },
    Aftertouch { channel: u8, pressure: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    ProgramChange { channel: u8, program: u8 },
    ChannelPressure { channel: u8, pressure: u8 },
    /// Pitch wheel as stored by the note player: the first data byte masked to
    /// 7 bits, the second shifted right by one. This is not the MIDI 14-bit
    /// value `(msb << 7) | lsb`, and the bit layout must stay as it is.
    PitchBend { channel: u8, lsb: u8, msb: u8 },
    SysEx(Vec<u8>),
    TimeCodeQuarterFrame(u8),
    SongPosition { lsb: u8, msb: u8 },
    SongSelect(u8),
    TuneRequest,
    SysExEnd,
    TimingClock,
    Start,
    Continue,
    Stop,
    ActiveSensing,
    Meta(MetaEvent),
    /// Status byte we have no decode rule for. Nothing after it was consumed.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    Text,
    Copyright,
    SequenceName,
    Instrument,
    Lyric,
    Marker,
    CuePoint,
    ProgramName,
    DeviceName,
}

impl TextKind {
    fn from_meta(kind: u8) -> Option<Self> {
        Some(match kind {
            META_TEXT => TextKind::Text,
            META_COPYRIGHT => TextKind::Copyright,
            META_SEQUENCE_NAME => TextKind::SequenceName,
            META_INSTRUMENT => TextKind::Instrument,
            META_LYRIC => TextKind::Lyric,
            META_MARKER => TextKind::Marker,
            META_CUE_POINT => TextKind::CuePoint,
            META_PROGRAM_NAME => TextKind::ProgramName,
            META_DEVICE_NAME => TextKind::DeviceName,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaEvent {
    SequenceNumber(Option<u16>),
    Text { kind: TextKind, text: String },
    EndOfTrack,
    /// Microseconds per quarter note.
    Tempo(u32),
    /// numerator, denominator power of two, clocks per click, 32nds per quarter
    TimeSignature([u8; 4]),
    /// sharps/flats count (signed), major = 0 / minor = 1
    KeySignature([u8; 2]),
    /// Payload is left in the stream unparsed.
    SequencerSpecific,
    /// A meta kind we do not interpret. Nothing after the kind byte was consumed.
    Unknown(u8),
}

impl MetaEvent {
    pub fn kind(&self) -> u8 {
        match self {
            MetaEvent::SequenceNumber(_) => META_SEQUENCE_NUMBER,
            MetaEvent::Text { kind, .. } => match kind {
                TextKind::Text => META_TEXT,
                TextKind::Copyright => META_COPYRIGHT,
                TextKind::SequenceName => META_SEQUENCE_NAME,
                TextKind::Instrument => META_INSTRUMENT,
                TextKind::Lyric => META_LYRIC,
                TextKind::Marker => META_MARKER,
                TextKind::CuePoint => META_CUE_POINT,
                TextKind::ProgramName => META_PROGRAM_NAME,
                TextKind::DeviceName => META_DEVICE_NAME,
            },
            MetaEvent::EndOfTrack => META_END_OF_TRACK,
            MetaEvent::Tempo(_) => META_TEMPO,
            MetaEvent::TimeSignature(_) => META_TIME_SIGNATURE,
            MetaEvent::KeySignature(_) => META_KEY_SIGNATURE,
            MetaEvent::SequencerSpecific => META_SEQUENCER_SPECIFIC,
            MetaEvent::Unknown(kind) => *kind,
        }
    }
}

impl EventKind {
    pub fn channel(&self) -> Option<u8> {
        match *self {
            EventKind::NoteOff { channel, .. }
            | EventKind::NoteOn { channel, .. }
            | EventKind::Aftertouch { channel, .. }
            | EventKind::ControlChange { channel, .. }
            | EventKind::ProgramChange { channel, .. }
            | EventKind::ChannelPressure { channel, .. }
            | EventKind::PitchBend { channel, .. } => Some(channel),
            _ => None,
        }
    }
}

impl Event {
    pub fn is_end_of_track(&self) -> bool {
        matches!(self.kind, EventKind::Meta(MetaEvent::EndOfTrack))
    }

    pub fn tempo(&self) -> Option<u32> {
        match self.kind {
            EventKind::Meta(MetaEvent::Tempo(t)) => Some(t),
            _ => None,
        }
    }
}

/// Decode one event.
///
/// `previous_status` is the status of the event decoded just before this one
/// in the same track (0 at the start of a track).
pub fn decode_event(
    r: &mut ByteReader<'_>,
    previous_status: u8,
    warnings: &mut Vec<Warning>,
) -> Result<Event, DecodeError> {
    let delta = r.read_varlen()?;

    let status_at = r.position();
    let mut status = r.read_u8()?;
    if status & 0x80 == 0 {
        // Running status: that was a data byte.
        status = previous_status;
        r.unread();
    }

    let channel = status & 0x0F;
    let kind = match status & 0xF0 {
        NOTE_OFF => {
            let [key, velocity] = r.read_array::<2>()?;
            EventKind::NoteOff { channel, key, velocity }
        }
        NOTE_ON => {
            let [key, velocity] = r.read_array::<2>()?;
            EventKind::NoteOn { channel, key, velocity }
        }
        AFTERTOUCH => EventKind::Aftertouch {
            channel,
            pressure: r.read_u8()?,
        },
        CONTROL_CHANGE => {
            let [controller, value] = r.read_array::<2>()?;
            EventKind::ControlChange { channel, controller, value }
        }
        PROGRAM_CHANGE => EventKind::ProgramChange {
            channel,
            program: r.read_u8()?,
        },
        CHANNEL_PRESSURE => EventKind::ChannelPressure {
            channel,
            pressure: r.read_u8()?,
        },
        PITCH_BEND => {
            let [a, b] = r.read_array::<2>()?;
            EventKind::PitchBend {
                channel,
                lsb: a & 0x7F,
                msb: b >> 1,
            }
        }
        SYSTEM => decode_system(r, status, status_at, warnings)?,
        _ => {
            warn(warnings, Warning::UnknownStatus { position: status_at, status });
            EventKind::Unknown
        }
    };

    Ok(Event { delta, status, kind })
}

fn decode_system(
    r: &mut ByteReader<'_>,
    status: u8,
    status_at: usize,
    warnings: &mut Vec<Warning>,
) -> Result<EventKind, DecodeError> {
    Ok(match status {
        SYSEX_START => EventKind::SysEx(read_capped_payload(r, warnings)?),
        TIME_CODE_QUARTER_FRAME => EventKind::TimeCodeQuarterFrame(r.read_u8()?),
        SONG_POSITION => {
            let [lsb, msb] = r.read_array::<2>()?;
            EventKind::SongPosition { lsb, msb }
        }
        SONG_SELECT => EventKind::SongSelect(r.read_u8()?),
        TUNE_REQUEST => EventKind::TuneRequest,
        SYSEX_END => EventKind::SysExEnd,
        TIMING_CLOCK => EventKind::TimingClock,
        START => EventKind::Start,
        CONTINUE => EventKind::Continue,
        STOP => EventKind::Stop,
        ACTIVE_SENSING => EventKind::ActiveSensing,
        META => EventKind::Meta(decode_meta(r, warnings)?),
        _ => {
            warn(warnings, Warning::UnknownStatus { position: status_at, status });
            EventKind::Unknown
        }
    })
}

fn decode_meta(r: &mut ByteReader<'_>, warnings: &mut Vec<Warning>) -> Result<MetaEvent, DecodeError> {
    let kind_at = r.position();
    let kind = r.read_u8()?;

    if let Some(text_kind) = TextKind::from_meta(kind) {
        let bytes = read_capped_payload(r, warnings)?;
        return Ok(MetaEvent::Text {
            kind: text_kind,
            text: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }

    Ok(match kind {
        META_SEQUENCE_NUMBER => {
            let position = r.position();
            let found = r.read_u8()?;
            if found == 0 {
                MetaEvent::SequenceNumber(None)
            } else {
                if found != 2 {
                    warn(warnings, Warning::MetaLength { position, kind, expected: 2, found });
                }
                MetaEvent::SequenceNumber(Some(r.read_u16_be()?))
            }
        }
        META_END_OF_TRACK => {
            read_fixed(r, kind, 0, warnings)?;
            MetaEvent::EndOfTrack
        }
        META_TEMPO => {
            let b = read_fixed(r, kind, 3, warnings)?;
            MetaEvent::Tempo(u32::from_be_bytes([0, b[0], b[1], b[2]]))
        }
        META_TIME_SIGNATURE => {
            let b = read_fixed(r, kind, 4, warnings)?;
            MetaEvent::TimeSignature([b[0], b[1], b[2], b[3]])
        }
        META_KEY_SIGNATURE => {
            let b = read_fixed(r, kind, 2, warnings)?;
            MetaEvent::KeySignature([b[0], b[1]])
        }
        META_SEQUENCER_SPECIFIC => MetaEvent::SequencerSpecific,
        _ => {
            warn(warnings, Warning::UnknownMeta { position: kind_at, kind });
            MetaEvent::Unknown(kind)
        }
    })
}

/// Read the length byte and the `expected` payload bytes of a fixed-size meta.
///
/// A mismatching length is reported but the event is still decoded. When the
/// declared length is longer than expected the surplus is skipped, so the
/// stream after it stays framed.
fn read_fixed<'a>(
    r: &mut ByteReader<'a>,
    kind: u8,
    expected: u8,
    warnings: &mut Vec<Warning>,
) -> Result<&'a [u8], DecodeError> {
    let position = r.position();
    let found = r.read_u8()?;
    let payload = r.read_bytes(usize::from(expected))?;
    if found != expected {
        if found > expected {
            r.skip(usize::from(found - expected))?;
        }
        warn(warnings, Warning::MetaLength { position, kind, expected, found });
    }
    Ok(payload)
}

/// Read a varlen-prefixed payload, keeping at most [`MAX_PAYLOAD`] bytes.
fn read_capped_payload(r: &mut ByteReader<'_>, warnings: &mut Vec<Warning>) -> Result<Vec<u8>, DecodeError> {
    let position = r.position();
    let declared = r.read_varlen()?;
    let kept = (declared as usize).min(MAX_PAYLOAD);
    let payload = r.read_bytes(kept)?.to_vec();
    if kept < declared as usize {
        r.skip(declared as usize - kept)?;
        warn(warnings, Warning::PayloadTruncated { position, declared, kept });
    }
    Ok(payload)
}

/// Human readable name of a status byte, for event listings.
pub fn status_name(status: u8) -> &'static str {
    match status & 0xF0 {
        NOTE_OFF => "NOTE OFF",
        NOTE_ON => "NOTE ON",
        AFTERTOUCH => "AFTERTOUCH",
        CONTROL_CHANGE => "CONTROL CHANGE",
        PROGRAM_CHANGE => "PROGRAM CHANGE",
        CHANNEL_PRESSURE => "CHANNEL PRESSURE",
        PITCH_BEND => "PITCH BEND",
        SYSTEM => match status {
            SYSEX_START => "SYSEX START",
            TIME_CODE_QUARTER_FRAME => "TIME CODE QUARTER FRAME",
            SONG_POSITION => "SONG POSITION",
            SONG_SELECT => "SONG SELECT",
            TUNE_REQUEST => "TUNE REQUEST",
            SYSEX_END => "SYSEX END",
            TIMING_CLOCK => "TIMING CLOCK",
            START => "START",
            CONTINUE => "CONTINUE",
            STOP => "STOP",
            ACTIVE_SENSING => "ACTIVE SENSING",
            META => "META",
            _ => "UNDEFINED",
        },
        _ => "UNKNOWN",
    }
}

/// Human readable name of a meta event kind.
pub fn meta_name(kind: u8) -> &'static str {
    match kind {
        META_SEQUENCE_NUMBER => "SEQUENCE NUMBER",
        META_TEXT => "TEXT",
        META_COPYRIGHT => "COPYRIGHT",
        META_SEQUENCE_NAME => "SEQUENCE NAME",
        META_INSTRUMENT => "INSTRUMENT",
        META_LYRIC => "LYRIC",
        META_MARKER => "MARKER",
        META_CUE_POINT => "CUE POINT",
        META_PROGRAM_NAME => "PROGRAM NAME",
        META_DEVICE_NAME => "DEVICE NAME",
        META_END_OF_TRACK => "END OF TRACK",
        META_TEMPO => "TEMPO",
        META_TIME_SIGNATURE => "TIME SIGNATURE",
        META_KEY_SIGNATURE => "KEY SIGNATURE",
        META_SEQUENCER_SPECIFIC => "SEQUENCER SPECIFIC",
        _ => "UNKNOWN",
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dt: {}, event: {} ({:#04x})", self.delta, status_name(self.status), self.status)?;
        match &self.kind {
            EventKind::Meta(meta) => {
                write!(f, ", meta: {} ({:#04x})", meta_name(meta.kind()), meta.kind())?;
                match meta {
                    MetaEvent::Text { text, .. } => write!(f, ", text: '{text}'"),
                    MetaEvent::Tempo(t) => write!(f, ", tempo: {t}"),
                    MetaEvent::SequenceNumber(Some(n)) => write!(f, ", number: {n}"),
                    MetaEvent::TimeSignature(b) => write!(f, ", params: {b:02x?}"),
                    MetaEvent::KeySignature(b) => write!(f, ", params: {b:02x?}"),
                    _ => Ok(()),
                }
            }
            EventKind::SysEx(b) => write!(f, ", params: {b:02x?}"),
            kind => match kind.channel() {
                Some(ch) => write!(f, ", channel: {ch}, {kind:?}"),
                None => write!(f, ", {kind:?}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(bytes: &[u8]) -> (Vec<Event>, Vec<Warning>) {
        let mut r = ByteReader::new(bytes);
        let mut warnings = Vec::new();
        let mut events = Vec::new();
        let mut prev = 0;
        while !r.is_empty() {
            let ev = decode_event(&mut r, prev, &mut warnings).unwrap();
            prev = ev.status;
            events.push(ev);
        }
        (events, warnings)
    }

    fn decode_one(bytes: &[u8]) -> (Event, Vec<Warning>) {
        let mut r = ByteReader::new(bytes);
        let mut warnings = Vec::new();
        let ev = decode_event(&mut r, 0, &mut warnings).unwrap();
        assert!(r.is_empty(), "{} bytes left over", r.remaining());
        (ev, warnings)
    }

    #[test]
    fn running_status_reuses_previous_status() {
        // Two note-ons on channel 3, the second without a status byte.
        let (events, warnings) = decode_all(&[0x00, 0x93, 0x3C, 0x64, 0x10, 0x40, 0x64]);
        assert!(warnings.is_empty());
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].status, events[1].status);
        assert_eq!(events[1].delta, 0x10);
        assert_eq!(
            events[1].kind,
            EventKind::NoteOn { channel: 3, key: 0x40, velocity: 0x64 }
        );
    }

    #[test]
    fn running_status_with_single_byte_messages() {
        let (events, _) = decode_all(&[0x00, 0xC1, 0x05, 0x00, 0x07]);
        assert_eq!(events[1].kind, EventKind::ProgramChange { channel: 1, program: 7 });
    }

    #[test]
    fn channel_messages() {
        let (ev, _) = decode_one(&[0x00, 0x85, 0x3C, 0x00]);
        assert_eq!(ev.kind, EventKind::NoteOff { channel: 5, key: 0x3C, velocity: 0 });
        let (ev, _) = decode_one(&[0x00, 0xBF, 0x07, 0x7F]);
        assert_eq!(ev.kind, EventKind::ControlChange { channel: 15, controller: 7, value: 0x7F });
        let (ev, _) = decode_one(&[0x00, 0xD2, 0x40]);
        assert_eq!(ev.kind, EventKind::ChannelPressure { channel: 2, pressure: 0x40 });
        let (ev, _) = decode_one(&[0x00, 0xA0, 0x22]);
        assert_eq!(ev.kind, EventKind::Aftertouch { channel: 0, pressure: 0x22 });
        assert_eq!(ev.kind.channel(), Some(0));
    }

    #[test]
    fn aftertouch_takes_one_data_byte() {
        let mut r = ByteReader::new(&[0x00, 0xA0, 0x3C, 0x22]);
        let ev = decode_event(&mut r, 0, &mut Vec::new()).unwrap();
        assert_eq!(ev.kind, EventKind::Aftertouch { channel: 0, pressure: 0x3C });
        assert_eq!(r.position(), 3);
    }

    #[test]
    fn pitch_bend_keeps_player_bit_layout() {
        let (ev, _) = decode_one(&[0x00, 0xE4, 0xFF, 0x41]);
        assert_eq!(ev.kind, EventKind::PitchBend { channel: 4, lsb: 0x7F, msb: 0x20 });
    }

    #[test]
    fn sysex_payload() {
        let (ev, warnings) = decode_one(&[0x00, 0xF0, 0x03, 0x43, 0x12, 0xF7]);
        assert!(warnings.is_empty());
        assert_eq!(ev.kind, EventKind::SysEx(vec![0x43, 0x12, 0xF7]));
    }

    #[test]
    fn long_sysex_is_truncated_with_warning() {
        let mut bytes = vec![0x00, 0xF0, 0x82, 0x2C]; // 300 bytes
        bytes.extend(std::iter::repeat_n(0x11, 300));
        bytes.extend([0x00, 0x90, 0x3C, 0x40]);
        let (events, warnings) = decode_all(&bytes);
        match &events[0].kind {
            EventKind::SysEx(p) => assert_eq!(p.len(), MAX_PAYLOAD),
            other => panic!("expected sysex, got {other:?}"),
        }
        assert_eq!(
            warnings,
            vec![Warning::PayloadTruncated { position: 2, declared: 300, kept: 255 }]
        );
        // The rest of the stream is still framed.
        assert_eq!(events[1].kind, EventKind::NoteOn { channel: 0, key: 0x3C, velocity: 0x40 });
    }

    #[test]
    fn system_common_and_realtime() {
        let (events, warnings) = decode_all(&[
            0x00, 0xF1, 0x21, //
            0x00, 0xF2, 0x10, 0x20, //
            0x00, 0xF3, 0x02, //
            0x00, 0xF6, 0x00, 0xF8, 0x00, 0xFA, 0x00, 0xFB, 0x00, 0xFC, 0x00, 0xFE, 0x00, 0xF7,
        ]);
        assert!(warnings.is_empty());
        let kinds: Vec<_> = events.into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::TimeCodeQuarterFrame(0x21),
                EventKind::SongPosition { lsb: 0x10, msb: 0x20 },
                EventKind::SongSelect(2),
                EventKind::TuneRequest,
                EventKind::TimingClock,
                EventKind::Start,
                EventKind::Continue,
                EventKind::Stop,
                EventKind::ActiveSensing,
                EventKind::SysExEnd,
            ]
        );
    }

    #[test]
    fn undefined_system_status_is_zero_payload() {
        let (events, warnings) = decode_all(&[0x00, 0xF4, 0x00, 0x90, 0x3C, 0x40]);
        assert_eq!(events[0].kind, EventKind::Unknown);
        assert_eq!(warnings, vec![Warning::UnknownStatus { position: 1, status: 0xF4 }]);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn data_byte_without_any_status_is_unknown() {
        let mut r = ByteReader::new(&[0x00, 0x3C, 0x40]);
        let mut warnings = Vec::new();
        let ev = decode_event(&mut r, 0, &mut warnings).unwrap();
        assert_eq!(ev.kind, EventKind::Unknown);
        assert_eq!(r.position(), 1);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn data_bytes_under_unknown_status_keep_decoding() {
        // With no status established, each data byte re-enters as an unknown
        // event; the note on after it still decodes.
        let (events, warnings) = decode_all(&[0x00, 0x3C, 0x40, 0x00, 0x90, 0x3C, 0x40]);
        let kinds: Vec<_> = events.iter().map(|e| &e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                &EventKind::Unknown,
                &EventKind::Unknown,
                &EventKind::Unknown,
                &EventKind::NoteOn { channel: 0, key: 0x3C, velocity: 0x40 },
            ]
        );
        assert_eq!(events[1].delta, 0x3C);
        assert_eq!(events[2].delta, 0x40);
        assert_eq!(
            warnings,
            vec![
                Warning::UnknownStatus { position: 1, status: 0 },
                Warning::UnknownStatus { position: 2, status: 0 },
                Warning::UnknownStatus { position: 3, status: 0 },
            ]
        );
    }

    #[test]
    fn tempo_meta() {
        let (ev, _) = decode_one(&[0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]);
        assert_eq!(ev.tempo(), Some(500_000));
        assert_eq!(ev.status, META);
    }

    #[test]
    fn text_metas() {
        let (ev, _) = decode_one(b"\x00\xFF\x03\x05Piano");
        assert_eq!(
            ev.kind,
            EventKind::Meta(MetaEvent::Text { kind: TextKind::SequenceName, text: "Piano".into() })
        );
        let (ev, _) = decode_one(b"\x00\xFF\x09\x04Port");
        assert!(matches!(
            ev.kind,
            EventKind::Meta(MetaEvent::Text { kind: TextKind::DeviceName, .. })
        ));
    }

    #[test]
    fn fixed_length_metas() {
        let (ev, _) = decode_one(&[0x00, 0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x08]);
        assert_eq!(ev.kind, EventKind::Meta(MetaEvent::TimeSignature([4, 2, 0x18, 8])));
        let (ev, _) = decode_one(&[0x00, 0xFF, 0x59, 0x02, 0xFF, 0x01]);
        assert_eq!(ev.kind, EventKind::Meta(MetaEvent::KeySignature([0xFF, 1])));
        let (ev, _) = decode_one(&[0x00, 0xFF, 0x00, 0x02, 0x00, 0x07]);
        assert_eq!(ev.kind, EventKind::Meta(MetaEvent::SequenceNumber(Some(7))));
        let (ev, _) = decode_one(&[0x00, 0xFF, 0x00, 0x00]);
        assert_eq!(ev.kind, EventKind::Meta(MetaEvent::SequenceNumber(None)));
        // Any nonzero length reads the two number bytes.
        let (ev, warnings) = decode_one(&[0x00, 0xFF, 0x00, 0x01, 0x00, 0x09]);
        assert_eq!(ev.kind, EventKind::Meta(MetaEvent::SequenceNumber(Some(9))));
        assert_eq!(warnings.len(), 1);
        let (ev, _) = decode_one(&[0x05, 0xFF, 0x2F, 0x00]);
        assert!(ev.is_end_of_track());
        assert_eq!(ev.delta, 5);
    }

    #[test]
    fn wrong_meta_length_is_reported() {
        let (ev, warnings) = decode_one(&[0x00, 0xFF, 0x51, 0x02, 0x07, 0xA1, 0x20]);
        assert_eq!(ev.tempo(), Some(500_000));
        assert_eq!(
            warnings,
            vec![Warning::MetaLength { position: 3, kind: META_TEMPO, expected: 3, found: 2 }]
        );
    }

    #[test]
    fn end_of_track_with_nonzero_length_still_ends() {
        let (events, warnings) = decode_all(&[0x00, 0xFF, 0x2F, 0x01, 0x00]);
        assert_eq!(events.len(), 1);
        assert!(events[0].is_end_of_track());
        assert_eq!(
            warnings,
            vec![Warning::MetaLength { position: 3, kind: META_END_OF_TRACK, expected: 0, found: 1 }]
        );
    }

    #[test]
    fn unknown_meta_is_zero_payload() {
        // 0x21 (MIDI port) is not interpreted; nothing after the kind is read.
        let mut r = ByteReader::new(&[0x00, 0xFF, 0x21, 0x00, 0x90, 0x3C, 0x40]);
        let mut warnings = Vec::new();
        let ev = decode_event(&mut r, 0, &mut warnings).unwrap();
        assert_eq!(ev.kind, EventKind::Meta(MetaEvent::Unknown(0x21)));
        assert_eq!(r.position(), 3);
        assert_eq!(warnings, vec![Warning::UnknownMeta { position: 2, kind: 0x21 }]);
        let next = decode_event(&mut r, ev.status, &mut warnings).unwrap();
        assert_eq!(next.kind, EventKind::NoteOn { channel: 0, key: 0x3C, velocity: 0x40 });
    }

    #[test]
    fn sequencer_specific_payload_is_left_unread() {
        let mut r = ByteReader::new(&[0x00, 0xFF, 0x7F, 0x03, 0x00, 0x00, 0x41]);
        let ev = decode_event(&mut r, 0, &mut Vec::new()).unwrap();
        assert_eq!(ev.kind, EventKind::Meta(MetaEvent::SequencerSpecific));
        assert_eq!(r.position(), 3);
    }

    #[test]
    fn long_text_is_truncated_and_stream_stays_framed() {
        let mut bytes = vec![0x00, 0xFF, 0x01, 0x82, 0x2C]; // 300 bytes of text
        bytes.extend(std::iter::repeat_n(b'a', 300));
        bytes.extend([0x00, 0x90, 0x3C, 0x40, 0x10, 0x3C, 0x00]);
        let (events, warnings) = decode_all(&bytes);
        match &events[0].kind {
            EventKind::Meta(MetaEvent::Text { kind: TextKind::Text, text }) => {
                assert_eq!(text.len(), MAX_PAYLOAD)
            }
            other => panic!("expected text, got {other:?}"),
        }
        assert_eq!(
            warnings,
            vec![Warning::PayloadTruncated { position: 3, declared: 300, kept: 255 }]
        );
        assert_eq!(events.len(), 3);
        assert_eq!(events[1].kind, EventKind::NoteOn { channel: 0, key: 0x3C, velocity: 0x40 });
        assert_eq!(events[2].delta, 0x10);
        assert_eq!(events[2].kind, EventKind::NoteOn { channel: 0, key: 0x3C, velocity: 0 });
    }

    #[test]
    fn truncated_event_is_fatal() {
        let mut r = ByteReader::new(&[0x00, 0x90, 0x3C]);
        let err = decode_event(&mut r, 0, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, DecodeError::TruncatedInput { position: 2, wanted: 1 }));
    }

    #[test]
    fn names_for_listings() {
        assert_eq!(status_name(0x93), "NOTE ON");
        assert_eq!(status_name(0xFF), "META");
        assert_eq!(meta_name(0x51), "TEMPO");
        let (ev, _) = decode_one(&[0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]);
        assert_eq!(ev.to_string(), "dt: 0, event: META (0xff), meta: TEMPO (0x51), tempo: 500000");
    }
}
