use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::timeline::Note;

/// Bytes per note in the packed stream.
pub const NOTE_SIZE: usize = 6;

/// Write notes as consecutive `{delay, freq, duration}` little-endian i16 triples.
pub fn write_notes<W: Write>(mut w: W, notes: &[Note]) -> io::Result<()> {
    for n in notes {
        w.write_i16::<LittleEndian>(n.delay_ms)?;
        w.write_i16::<LittleEndian>(n.freq_hz)?;
        w.write_i16::<LittleEndian>(n.duration_ms)?;
    }
    w.flush()
}

pub fn notes_to_bytes(notes: &[Note]) -> Vec<u8> {
    let mut out = Vec::with_capacity(notes.len() * NOTE_SIZE);
    for n in notes {
        out.extend(n.delay_ms.to_le_bytes());
        out.extend(n.freq_hz.to_le_bytes());
        out.extend(n.duration_ms.to_le_bytes());
    }
    out
}
