use std::fmt;

use crate::error::DecodeError;
use crate::reader::ByteReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// One track holding everything.
    SingleTrack,
    /// Several tracks played together, sharing the tempo map of track 0.
    MultiTrackSync,
    /// Several independent sequences.
    MultiTrackAsync,
}

impl TryFrom<u16> for Format {
    type Error = DecodeError;

    fn try_from(v: u16) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Format::SingleTrack),
            1 => Ok(Format::MultiTrackSync),
            2 => Ok(Format::MultiTrackAsync),
            other => Err(DecodeError::UnsupportedFormat(other)),
        }
    }
}

/// The header's time division word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    /// Ticks (pulses) per quarter note.
    Metrical(u16),
    /// Frames per second and ticks per frame. Not usable for tempo conversion.
    Smpte { fps: u8, ticks_per_frame: u8 },
}

impl Timing {
    pub fn from_division(division: u16) -> Self {
        if division & 0x8000 != 0 {
            let [hi, lo] = division.to_be_bytes();
            // High byte is a negative frame rate in two's complement.
            Timing::Smpte {
                fps: (hi as i8).unsigned_abs(),
                ticks_per_frame: lo,
            }
        } else {
            Timing::Metrical(division)
        }
    }

    /// Pulses per quarter note, if the file uses metrical timing.
    pub fn ppqn(&self) -> Option<u16> {
        match *self {
            Timing::Metrical(ppqn) => Some(ppqn),
            Timing::Smpte { .. } => None,
        }
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timing::Metrical(ppqn) => write!(f, "{ppqn} ppq"),
            Timing::Smpte { fps, ticks_per_frame } => write!(f, "{fps} fps x {ticks_per_frame}"),
        }
    }
}

/// The `MThd` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Declared chunk size, normally 6.
    pub size: u32,
    pub format: Format,
    pub track_count: u16,
    pub timing: Timing,
}

impl Header {
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let id = r.read_array::<4>()?;
        if &id != b"MThd" {
            return Err(DecodeError::NotMidi(String::from_utf8_lossy(&id).into_owned()));
        }
        let size = r.read_u32_be()?;
        let format = Format::try_from(r.read_u16_be()?)?;
        let track_count = r.read_u16_be()?;
        let timing = Timing::from_division(r.read_u16_be()?);

        // Later revisions may grow the header; whatever follows the known fields is skipped.
        if size > 6 {
            r.skip((size - 6) as usize)?;
        }

        Ok(Self { size, format, track_count, timing })
    }
}
