use crate::error::{DecodeError, Warning};
use crate::header::Header;
use crate::reader::ByteReader;
use crate::track::Track;

/// A fully decoded Standard MIDI File.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiFile {
    pub header: Header,
    pub tracks: Vec<Track>,
}

impl MidiFile {
    /// Decode the header and then `track_count` track chunks back to back.
    ///
    /// A fatal error inside any track aborts the whole parse; the tracks that
    /// follow it cannot be located once framing is lost.
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = ByteReader::new(bytes);
        let header = Header::read(&mut r)?;
        log::debug!(
            "header: size {}, format {:?}, {} tracks, timing {}",
            header.size,
            header.format,
            header.track_count,
            header.timing
        );

        let mut tracks = Vec::with_capacity(usize::from(header.track_count));
        for index in 0..usize::from(header.track_count) {
            let track = Track::read(&mut r, &header).map_err(|e| DecodeError::Track {
                index,
                source: Box::new(e),
            })?;
            tracks.push(track);
        }

        if !r.is_empty() {
            log::debug!("{} trailing bytes after the last track", r.remaining());
        }

        Ok(Self { header, tracks })
    }

    /// Every decode warning of every track, in track order.
    pub fn warnings(&self) -> impl Iterator<Item = (usize, &Warning)> {
        self.tracks
            .iter()
            .enumerate()
            .flat_map(|(i, t)| t.warnings.iter().map(move |w| (i, w)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{Format, Timing};

    fn file(tracks: &[&[u8]]) -> Vec<u8> {
        let mut out = b"MThd\x00\x00\x00\x06\x00\x01".to_vec();
        out.extend((tracks.len() as u16).to_be_bytes());
        out.extend(96u16.to_be_bytes());
        for body in tracks {
            out.extend(b"MTrk");
            out.extend((body.len() as u32).to_be_bytes());
            out.extend(*body);
        }
        out
    }

    const CONDUCTOR: &[u8] = &[0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, 0x00, 0xFF, 0x2F, 0x00];
    const MELODY: &[u8] = &[
        0x00, 0x90, 0x45, 0x64, //
        0x30, 0x80, 0x45, 0x00, //
        0x00, 0xFF, 0x2F, 0x00,
    ];

    #[test]
    fn parses_every_track() {
        let f = MidiFile::parse(&file(&[CONDUCTOR, MELODY])).unwrap();
        assert_eq!(f.header.format, Format::MultiTrackSync);
        assert_eq!(f.header.timing, Timing::Metrical(96));
        assert_eq!(f.tracks.len(), 2);
        assert_eq!(f.tracks[0].tempo, 500_000);
        assert_eq!(f.tracks[1].len(), 3);
        assert_eq!(f.warnings().count(), 0);
    }

    #[test]
    fn error_in_a_track_names_the_track() {
        let mut bytes = file(&[CONDUCTOR, MELODY]);
        bytes.truncate(bytes.len() - 6);
        let err = MidiFile::parse(&bytes).unwrap_err();
        assert!(matches!(err, DecodeError::Track { index: 1, .. }));
        assert!(matches!(err.root(), DecodeError::TruncatedInput { .. }));
        assert!(err.to_string().starts_with("track 1: unexpected end of input"));
    }

    #[test]
    fn collects_warnings_per_track() {
        let noisy: &[u8] = &[0x00, 0xFF, 0x21, 0x01, 0x00, 0x00, 0xFF, 0x2F, 0x00];
        let f = MidiFile::parse(&file(&[CONDUCTOR, noisy])).unwrap();
        let w: Vec<_> = f.warnings().collect();
        assert_eq!(w.len(), 1);
        assert_eq!(w[0].0, 1);
        assert!(matches!(w[0].1, Warning::UnknownMeta { kind: 0x21, .. }));
    }
}
