// Purpose - output sample format and file headers

pub mod sample;
pub mod wav;

pub use sample::Sample;
pub use wav::WavHeader;
