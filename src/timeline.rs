//! timeline.rs
//!
//! Turns one decoded track into the note stream the player consumes.
//!
//! The player is monophonic and knows nothing about MIDI. It wants, per note:
//!  - how long to wait before starting it (`delay_ms`)
//!  - what to play (`freq_hz`)
//!  - for how long (`duration_ms`, in units of 16 ms)
//!
//! We walk the events once, keeping an absolute tick clock and, per key, the
//! tick at which that key was pressed. A note is written when it is released,
//! so the stream is ordered by note end, not note start.
//!
//! Known approximations, kept for compatibility with existing note files:
//!  - the delay is measured from the start of the previously written note,
//!    not from its end, so overlapping notes are not gap-accurate
//!  - a single `pulse_len` is used for the whole track, so tempo changes in
//!    the middle of a track are not followed
//!  - a release with no matching press is treated as pressed at tick 0

use crate::error::{Warning, warn};
use crate::event::EventKind;
use crate::pitch::key_to_hz;
use crate::track::Track;

/// Delays above this are considered broken input and clamped.
pub const MAX_DELAY_MS: i64 = 1000;

/// Durations are stored divided by this.
pub const DURATION_SCALE: i64 = 16;

const NUM_KEYS: usize = 128;

/// One entry of the note stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub delay_ms: i16,
    pub freq_hz: i16,
    /// Milliseconds divided by [`DURATION_SCALE`].
    pub duration_ms: i16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    /// Notes in release order.
    pub notes: Vec<Note>,
    pub warnings: Vec<Warning>,
}

impl Timeline {
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// Convert a track's note events using a fixed `pulse_len` (ms per tick).
pub fn convert(track: &Track, pulse_len: u32) -> Timeline {
    let pulse = i64::from(pulse_len);
    let mut timeline = Timeline::default();

    let mut started: [Option<u64>; NUM_KEYS] = [None; NUM_KEYS];
    let mut clock: u64 = 0;
    let mut last_start: u64 = 0;

    for (i, ev) in track.events.iter().enumerate() {
        clock += u64::from(ev.delta);

        let key = match ev.kind {
            EventKind::NoteOn { key, velocity, .. } if velocity > 0 => {
                started[usize::from(key & 0x7F)] = Some(clock);
                continue;
            }
            // A note on with velocity 0 is a release.
            EventKind::NoteOn { key, .. } | EventKind::NoteOff { key, .. } => key & 0x7F,
            _ => continue,
        };

        let start = started[usize::from(key)].take().unwrap_or(0);
        let duration_ticks = (clock - start) as i64;
        let delay_ticks = start as i64 - last_start as i64;

        let mut delay_ms = delay_ticks.saturating_mul(pulse);
        if delay_ms > MAX_DELAY_MS {
            warn(
                &mut timeline.warnings,
                Warning::AbnormalDelay {
                    event: i,
                    pulses: delay_ticks,
                    delay_ms,
                    clamped: MAX_DELAY_MS as i16,
                },
            );
            delay_ms = MAX_DELAY_MS;
        }
        let duration_ms = duration_ticks.saturating_mul(pulse) / DURATION_SCALE;
        let freq_hz = key_to_hz(key) as i64;

        let note = Note {
            delay_ms: saturate(&mut timeline.warnings, i, "delay", delay_ms),
            freq_hz: saturate(&mut timeline.warnings, i, "frequency", freq_hz),
            duration_ms: saturate(&mut timeline.warnings, i, "duration", duration_ms),
        };
        log::trace!("event {i}: key {key} -> {note:?}");
        timeline.notes.push(note);
        last_start = start;
    }

    log::debug!(
        "converted {} notes at {} ms per pulse ({} warnings)",
        timeline.notes.len(),
        pulse_len,
        timeline.warnings.len()
    );
    timeline
}

fn saturate(warnings: &mut Vec<Warning>, event: usize, field: &'static str, value: i64) -> i16 {
    match i16::try_from(value) {
        Ok(v) => v,
        Err(_) => {
            warn(warnings, Warning::FieldOverflow { event, field, value });
            if value < 0 { i16::MIN } else { i16::MAX }
        }
    }
}
