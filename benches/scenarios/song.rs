//! Benchmarks for rendering complete songs.
//!
//! Covers the whole pipeline: sequencer, every track, mixer, reverb and
//! sample conversion.

use criterion::{Criterion, Throughput};
use oidos::dsp::reverb::ReverbParams;
use oidos::sequencing::{Pattern, TrackSpec};
use oidos::{voices, Oidos, Song};

const ARRANGEMENT: &str = "
C-4 60 | C-2    | G-5 .. H23 | C-8 40
---    | ---    | ---        | C-8 20
---    | C-3    | D#5 .. G10 | C-8 40
---    | ---    | ---        | C-8 20
D#4 60 | G#1    | F-5 .. A01 | C-8 40
---    | ---    | ---        | C-8 20
---    | G#2    | D-5        | C-8 40
OFF    | OFF    | OFF        | C-8 20
";

fn song(reverb: bool) -> Song {
    let mut builder = Song::builder()
        .bpm(125.0)
        .instrument(voices::pad())
        .instrument(voices::bass())
        .instrument(voices::lead())
        .instrument(voices::hihat())
        .track_spec(TrackSpec::new("pad", 0).reverb(reverb))
        .track("bass", 1)
        .track_spec(TrackSpec::new("lead", 2).reverb(reverb))
        .track("hat", 3)
        .pattern(Pattern::parse(ARRANGEMENT).expect("valid pattern"))
        .order([0, 0, 0, 0]);
    if reverb {
        builder = builder.reverb(ReverbParams::default());
    }
    builder.build().expect("valid song")
}

pub fn bench_song(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/song");
    group.sample_size(10);

    for (name, reverb) in [("4_track_dry", false), ("4_track_reverb", true)] {
        let song = song(reverb);
        group.throughput(Throughput::Elements(song.frames() as u64));

        let mut oidos = Oidos::new(song).expect("valid song");
        oidos.fill_noise_table();
        group.bench_function(name, |b| b.iter(|| oidos.generate_music().samples.len()));
    }

    group.finish();
}
