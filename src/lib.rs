//! Standard MIDI File decoding and conversion to a packed note stream.
//!
//! ```text
//! bytes -> MidiFile::parse -> Track (events, tempo, pulse_len, patch)
//!       -> timeline::convert -> [Note { delay_ms, freq_hz, duration_ms }]
//!       -> emit::write_notes
//! ```
//!
//! Fatal problems come back as [`DecodeError`]. Everything recoverable is
//! collected as [`Warning`]s on the decoded [`Track`] or the produced
//! [`Timeline`], and also logged through `log`.

pub mod emit;
pub mod error;
pub mod event;
pub mod header;
pub mod pitch;
pub mod reader;
pub mod smf;
pub mod timeline;
pub mod track;

pub use emit::{notes_to_bytes, write_notes};
pub use error::{DecodeError, Warning};
pub use event::{Event, EventKind, MetaEvent, TextKind};
pub use header::{Format, Header, Timing};
pub use smf::MidiFile;
pub use timeline::{Note, Timeline, convert};
pub use track::Track;
