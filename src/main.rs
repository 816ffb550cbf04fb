use anyhow::{Context, Result, bail};
use clap::Parser;
use std::{fs, fs::File, io::BufWriter, path::PathBuf};

use smf2notes::{MidiFile, Timing, Warning, convert, event::EventKind, pitch::note_name, write_notes};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Opt {
    /// Standard MIDI file to convert
    midi: PathBuf,
    /// Index of the track to convert (track 0 is usually the conductor track)
    #[arg(short = 'c', long = "channel", visible_alias = "track", default_value_t = 1)]
    track: usize,
    /// Where to write the packed note stream
    #[arg(short, long, default_value = "notes.bin")]
    output: PathBuf,
    /// Milliseconds per tick to use instead of the track's own tempo
    #[arg(long)]
    pulse_len: Option<u32>,
    /// List every decoded event of every track
    #[arg(long)]
    dump: bool,
    /// Debug logging (RUST_LOG overrides this)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let opt = Opt::parse();
    let level = if opt.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let bytes = fs::read(&opt.midi).with_context(|| format!("reading {:?}", opt.midi))?;
    println!("file size = {} bytes", bytes.len());

    let smf = MidiFile::parse(&bytes).with_context(|| format!("decoding {:?}", opt.midi))?;
    let h = &smf.header;
    println!(
        "size: {}, format: {:?}, tracks: {}, timediv: {}",
        h.size, h.format, h.track_count, h.timing
    );

    for (i, t) in smf.tracks.iter().enumerate() {
        println!(
            "[track {}] id: '{}', size: {}, tempo: {} ({} bpm), patch: {}, events: {}",
            i,
            t.id_str(),
            t.size,
            t.tempo,
            t.bpm(),
            t.patch,
            t.len()
        );
        if opt.dump {
            for (j, ev) in t.events.iter().enumerate() {
                match ev.kind {
                    EventKind::NoteOn { key, .. } | EventKind::NoteOff { key, .. } => {
                        println!("    +[event {j}] {ev} ({})", note_name(key & 0x7F))
                    }
                    _ => println!("    +[event {j}] {ev}"),
                }
            }
        }
    }

    for (i, w) in smf.warnings() {
        println!("{}", warning_line(Some(i), w));
    }

    if let Timing::Smpte { .. } = h.timing {
        bail!("SMPTE time division is not supported for note conversion");
    }
    let Some(track) = smf.tracks.get(opt.track) else {
        bail!(
            "track {} does not exist (file has {} tracks)",
            opt.track,
            smf.tracks.len()
        );
    };

    let pulse_len = opt.pulse_len.unwrap_or(track.pulse_len);
    println!("using {pulse_len} ms per pulse");
    if pulse_len == 0 {
        log::warn!("pulse length is 0 ms; every delay and duration will be 0");
    }

    let timeline = convert(track, pulse_len);
    for w in &timeline.warnings {
        println!("{}", warning_line(None, w));
    }

    let out = File::create(&opt.output).with_context(|| format!("creating {:?}", opt.output))?;
    write_notes(BufWriter::new(out), &timeline.notes)
        .with_context(|| format!("writing {:?}", opt.output))?;

    println!(
        "wrote {} notes to {:?} ({} warnings)",
        timeline.len(),
        opt.output,
        timeline.warnings.len()
    );
    Ok(())
}

/// One report line per warning, prefixed with the track it came from.
fn warning_line(track: Option<usize>, w: &Warning) -> String {
    match track {
        Some(i) => format!("warning: [track {i}] {w}"),
        None => format!("warning: {w}"),
    }
}
