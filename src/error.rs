use thiserror::Error;

/// Conditions that stop decoding of the current track (and therefore the file).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed variable-length quantity at offset {position} (more than 4 bytes)")]
    MalformedVarint { position: usize },
    #[error("unexpected end of input at offset {position} ({wanted} more bytes needed)")]
    TruncatedInput { position: usize, wanted: usize },
    #[error("not a standard MIDI file (header id {0:?})")]
    NotMidi(String),
    #[error("unsupported MIDI file format type {0}")]
    UnsupportedFormat(u16),
    #[error("track {index}: {source}")]
    Track {
        index: usize,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Strip any track wrapper and return the underlying cause.
    pub fn root(&self) -> &DecodeError {
        match self {
            DecodeError::Track { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Non-fatal conditions. Decoding carries on, the caller gets the list back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    #[error("offset {position}: unknown status byte {status:#04x}, decoded without payload")]
    UnknownStatus { position: usize, status: u8 },
    #[error("offset {position}: unknown meta event {kind:#04x}, decoded without payload")]
    UnknownMeta { position: usize, kind: u8 },
    #[error("offset {position}: payload of {declared} bytes truncated to {kept}")]
    PayloadTruncated {
        position: usize,
        declared: u32,
        kept: usize,
    },
    #[error("offset {position}: meta event {kind:#04x} declares length {found}, expected {expected}")]
    MetaLength {
        position: usize,
        kind: u8,
        expected: u8,
        found: u8,
    },
    #[error("track chunk id is {0:?}, expected \"MTrk\"")]
    UnexpectedChunk(String),
    #[error("event {event}: note on abnormal delay: {pulses} pulses ({delay_ms} ms), clamped to {clamped} ms")]
    AbnormalDelay {
        event: usize,
        pulses: i64,
        delay_ms: i64,
        clamped: i16,
    },
    #[error("event {event}: {field} of {value} does not fit in 16 bits, saturated")]
    FieldOverflow {
        event: usize,
        field: &'static str,
        value: i64,
    },
}

/// Record a warning and report it through the log facade.
pub(crate) fn warn(warnings: &mut Vec<Warning>, w: Warning) {
    log::warn!("{w}");
    warnings.push(w);
}
