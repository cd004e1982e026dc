use oidos::dsp::oscillator::Waveform;
use oidos::dsp::reverb::ReverbParams;
use oidos::sequencing::notes::*;
use oidos::sequencing::{Pattern, TrackSpec};
use oidos::synth::{AdditiveParams, EnvelopeShape};
use oidos::{pattern, voices, Instrument, Oidos, Sample, Song};

fn render(song: Song) -> (Vec<Sample>, usize) {
    let mut oidos = Oidos::new(song).expect("valid song");
    oidos.fill_noise_table();
    let music = oidos.generate_music();
    (music.samples.to_vec(), music.samples_per_tick)
}

fn sine(attack: f64, release: f64) -> Instrument {
    Instrument::wave("sine", Waveform::Sine)
        .envelope(EnvelopeShape::adsr(attack, 0.0, 1.0, release))
}

fn full_song() -> Song {
    Song::builder()
        .instrument(voices::pad())
        .instrument(voices::hihat())
        .instrument(voices::bell())
        .track_spec(TrackSpec::new("pad", 0).reverb(true))
        .track_spec(TrackSpec::new("hat", 1).pan(0.8))
        .track_spec(TrackSpec::new("bell", 2).pan(0.2).reverb(true))
        .pattern(
            Pattern::parse(
                "
                C-4    | C-8 40 | G-5
                ---    | C-8 20 | ---
                E-4 .. A01 | C-8 40 | C-6 .. H24
                OFF    | ---    | OFF
                ",
            )
            .expect("valid pattern"),
        )
        .order([0, 0])
        .ticks_per_row(2)
        .reverb(ReverbParams::default())
        .build()
        .expect("valid song")
}

fn peak(samples: &[Sample]) -> i32 {
    samples
        .iter()
        .map(|s| (s.left as i32).abs().max((s.right as i32).abs()))
        .max()
        .unwrap_or(0)
}

#[test]
fn separate_engines_render_identical_buffers() {
    let (a, _) = render(full_song());
    let (b, _) = render(full_song());
    assert_eq!(a.len(), b.len());
    assert!(a == b, "buffers differ");
    assert!(peak(&a) > 0, "song rendered silence");
}

#[test]
fn header_matches_buffer_length() {
    let song = full_song();
    let expected = song.music_length() * song.timing().samples_per_tick;

    let mut oidos = Oidos::new(song).unwrap();
    oidos.fill_noise_table();
    let music = oidos.generate_music();

    assert_eq!(music.samples.len(), expected);
    assert_eq!(music.samples.len() * 4, music.header.0[10] as usize);
    assert_eq!(music.length as usize, 16);
}

#[test]
fn maximum_gain_saturates_instead_of_wrapping() {
    let build = |master_volume: f64| {
        let loud = AdditiveParams {
            gain: 1.0,
            ..AdditiveParams::default()
        };
        Song::builder()
            .instrument(Instrument::additive("loud", loud))
            .instrument(sine(0.001, 0.01))
            .track("a", 0)
            .track("b", 1)
            .pattern(pattern![C3, E3])
            .order([0])
            .master_volume(master_volume)
            .build()
            .unwrap()
    };

    let (quiet, _) = render(build(1.0));
    let (loud, _) = render(build(100.0));
    assert!(loud.iter().any(|s| s.left == i16::MAX || s.left == i16::MIN));

    // a wrapped sample would come out with the wrong sign
    for (q, l) in quiet.iter().zip(&loud) {
        if q.left.abs() > 50 {
            assert_eq!(q.left.signum(), l.left.signum());
        }
    }
}

#[test]
fn single_row_song_stops_after_its_ticks() {
    let song = Song::builder()
        .instrument(sine(0.001, 0.5))
        .track("lead", 0)
        .pattern(pattern![A4])
        .order([0])
        .ticks_per_row(3)
        .build()
        .unwrap();
    let spt = song.timing().samples_per_tick;

    let (samples, _) = render(song);
    assert_eq!(samples.len(), 3 * spt);
    assert!(peak(&samples) > 10_000);
    // still sounding at the very end: the buffer cuts the note off
    assert!(peak(&samples[samples.len() - 100..]) > 1_000);
}

#[test]
fn arpeggio_ramps_in_and_decays_out() {
    let song = Song::builder()
        .instrument(sine(0.02, 0.05))
        .track("lead", 0)
        .pattern(pattern![C4, E4, G4, OFF])
        .order([0])
        .build()
        .unwrap();
    let ticks_per_row = song.ticks_per_row as usize;

    let (samples, spt) = render(song);
    let row = ticks_per_row * spt;
    assert_eq!(samples.len(), 4 * row);

    // attack: quiet at the start, full once the 20 ms ramp is over
    assert!(peak(&samples[..20]) < 1_000);
    assert!(peak(&samples[..row]) > 30_000);
    let early = peak(&samples[..200]);
    let later = peak(&samples[600..800]);
    assert!(early < later, "no attack ramp: {early} vs {later}");

    // release: the last row fades and ends in silence
    let last = &samples[3 * row..];
    assert!(peak(&last[..200]) > peak(&last[1_500..1_700]));
    assert!(last[2_300..].iter().all(|s| *s == Sample::SILENCE));
}

#[test]
fn note_off_has_no_clicks() {
    let song = Song::builder()
        .instrument(sine(0.01, 0.03))
        .track("lead", 0)
        .pattern(pattern![A4, OFF, C5, _])
        .order([0])
        .build()
        .unwrap();

    let (samples, _) = render(song);
    // a full-scale C-5 sine moves at most ~2450 per sample
    let max_jump = samples
        .windows(2)
        .map(|w| (w[0].left as i32 - w[1].left as i32).abs())
        .max()
        .unwrap_or(0);
    assert!(max_jump < 4_500, "jump of {max_jump}");
}

#[test]
fn overlapping_releases_have_no_clicks() {
    // each note's one second release spans the following rows
    let song = Song::builder()
        .instrument(sine(0.001, 1.0))
        .track("lead", 0)
        .pattern(pattern![C4, E4, G4, _])
        .order([0])
        .master_volume(0.5)
        .build()
        .unwrap();

    let (samples, spt) = render(song);
    let jump = |range: std::ops::Range<usize>| {
        samples[range]
            .windows(2)
            .map(|w| (w[0].left as i32 - w[1].left as i32).abs())
            .max()
            .unwrap_or(0)
    };

    // three half-scale sines below G-4 move at most ~2300 per sample together
    for row in 1..4 {
        let boundary = row * spt;
        let max_jump = jump(boundary - 4..boundary + 4);
        assert!(max_jump < 3_000, "jump of {max_jump} at row {row}");
    }
    assert!(jump(0..samples.len()) < 3_000);
}

#[test]
fn centre_pan_is_mono() {
    let song = Song::builder()
        .instrument(sine(0.01, 0.05))
        .track("lead", 0)
        .pattern(pattern![A4, _])
        .order([0])
        .build()
        .unwrap();

    let (samples, _) = render(song);
    assert!(samples.iter().all(|s| s.left == s.right));
}

#[test]
fn reverb_tail_outlasts_dry_signal() {
    let build = |reverb: bool| {
        let mut builder = Song::builder()
            .instrument(sine(0.005, 0.02))
            .track_spec(TrackSpec::new("lead", 0).reverb(reverb))
            .pattern(pattern![C4, OFF, _, _])
            .order([0]);
        if reverb {
            builder = builder.reverb(ReverbParams::default());
        }
        builder.build().unwrap()
    };

    let (dry, spt) = render(build(false));
    let (wet, _) = render(build(true));
    let third_row = 2 * spt..3 * spt;

    assert!(dry[third_row.clone()].iter().all(|s| *s == Sample::SILENCE));
    assert!(peak(&wet[third_row]) > 10, "reverb tail missing");
}

#[test]
fn empty_noise_table_gives_silent_additive_voice() {
    let song = Song::builder()
        .instrument(voices::pad())
        .track("pad", 0)
        .pattern(pattern![C4, _])
        .order([0])
        .build()
        .unwrap();

    // no fill_noise_table: additive partials all get zero amplitude
    let mut oidos = Oidos::new(song).unwrap();
    let music = oidos.generate_music();
    assert!(music.samples.iter().all(|s| *s == Sample::SILENCE));
}
