//! track.rs
//!
//! Decoding of one `MTrk` chunk into an ordered list of events.
//!
//! Besides the events themselves a track carries a little running state that
//! the note converter needs afterwards:
//!  - `tempo`: microseconds per quarter note, 120 BPM until a tempo event says otherwise
//!  - `pulse_len`: whole milliseconds per tick at that tempo
//!  - `patch`: the last program change seen
//!
//! The chunk's declared size is recorded but not trusted; the event loop runs
//! until it has read the end-of-track meta event.

use crate::error::{DecodeError, Warning, warn};
use crate::event::{Event, EventKind, decode_event};
use crate::header::Header;
use crate::reader::ByteReader;

/// 500000 µs per quarter note, i.e. 120 BPM.
pub const DEFAULT_TEMPO: u32 = 500_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: [u8; 4],
    /// Size declared in the chunk header.
    pub size: u32,
    /// Events in file order, end-of-track included.
    pub events: Vec<Event>,
    pub tempo: u32,
    /// Milliseconds per tick, derived from `tempo` and the header's PPQN.
    /// Zero when the file uses SMPTE timing.
    pub pulse_len: u32,
    pub patch: u8,
    pub warnings: Vec<Warning>,
}

/// Milliseconds per tick for a tempo (µs per quarter note) and a PPQN.
///
/// Integer arithmetic all the way, as the player expects: the tempo is first
/// reduced to whole beats per minute.
pub fn pulse_len(tempo: u32, ppqn: u16) -> u32 {
    let bpm = 60_000_000 / u64::from(tempo.max(1));
    60_000u64
        .checked_div(bpm * u64::from(ppqn))
        .map_or(0, |ms| ms as u32)
}

impl Track {
    pub fn read(r: &mut ByteReader<'_>, header: &Header) -> Result<Self, DecodeError> {
        let id = r.read_array::<4>()?;
        let size = r.read_u32_be()?;

        let mut warnings = Vec::new();
        if &id != b"MTrk" {
            warn(&mut warnings, Warning::UnexpectedChunk(String::from_utf8_lossy(&id).into_owned()));
        }

        let ppqn = header.timing.ppqn();
        let mut tempo = DEFAULT_TEMPO;
        let mut pulse = ppqn.map_or(0, |p| pulse_len(tempo, p));
        let mut patch = 0;
        let mut events = Vec::new();
        let mut status = 0;

        loop {
            let ev = decode_event(r, status, &mut warnings)?;
            status = ev.status;

            if let Some(t) = ev.tempo() {
                tempo = t;
                pulse = ppqn.map_or(0, |p| pulse_len(tempo, p));
            }
            if let EventKind::ProgramChange { program, .. } = ev.kind {
                patch = program & 0x7F;
            }

            let done = ev.is_end_of_track();
            events.push(ev);
            if done {
                break;
            }
        }

        log::debug!(
            "track '{}': {} bytes declared, {} events, tempo {} ({} bpm), {} ms per pulse",
            String::from_utf8_lossy(&id),
            size,
            events.len(),
            tempo,
            60_000_000 / tempo.max(1),
            pulse
        );

        Ok(Self {
            id,
            size,
            events,
            tempo,
            pulse_len: pulse,
            patch,
            warnings,
        })
    }

    /// Beats per minute at the track's current tempo.
    pub fn bpm(&self) -> u32 {
        60_000_000 / self.tempo.max(1)
    }

    pub fn id_str(&self) -> String {
        String::from_utf8_lossy(&self.id).into_owned()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
