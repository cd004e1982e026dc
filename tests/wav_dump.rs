use std::io::Cursor;

use oidos::dsp::oscillator::Waveform;
use oidos::sequencing::notes::*;
use oidos::{pattern, voices, Instrument, Oidos, Song};

fn song() -> Song {
    Song::builder()
        .instrument(Instrument::wave("saw", Waveform::Saw))
        .instrument(voices::hihat())
        .track("saw", 0)
        .track("hat", 1)
        .pattern(pattern![C3, E3, G3, OFF])
        .order([0, 0])
        .build()
        .unwrap()
}

#[test]
fn wav_output_parses_with_hound() {
    let mut oidos = Oidos::new(song()).unwrap();
    oidos.fill_noise_table();
    let music = oidos.generate_music();

    let mut bytes = Vec::new();
    music.write_wav(&mut bytes).unwrap();

    let mut reader = hound::WavReader::new(Cursor::new(bytes)).expect("valid wav");
    let spec = reader.spec();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 44_100);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);
    assert_eq!(reader.duration() as usize, music.samples.len());

    let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(decoded.len(), music.samples.len() * 2);
    for (frame, sample) in decoded.chunks_exact(2).zip(music.samples) {
        assert_eq!(frame[0], sample.left);
        assert_eq!(frame[1], sample.right);
    }
}

#[test]
fn raw_output_is_the_wav_body() {
    let mut oidos = Oidos::new(song()).unwrap();
    oidos.fill_noise_table();
    let music = oidos.generate_music();

    let mut wav = Vec::new();
    let mut raw = Vec::new();
    music.write_wav(&mut wav).unwrap();
    music.write_raw(&mut raw).unwrap();

    assert_eq!(raw.len(), music.header.data_bytes() as usize);
    assert_eq!(&wav[44..], &raw[..]);
}

#[test]
fn wav_file_round_trip_through_disk() {
    let mut oidos = Oidos::new(song()).unwrap();
    oidos.fill_noise_table();
    let music = oidos.generate_music();

    let path = std::env::temp_dir().join(format!("oidos-wav-dump-{}.wav", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    music.write_wav(&mut file).unwrap();
    drop(file);

    let reader = hound::WavReader::open(&path).expect("valid wav file");
    assert_eq!(reader.len() as usize, music.samples.len() * 2);
    std::fs::remove_file(&path).unwrap();
}
