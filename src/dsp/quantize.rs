//! Parameter quantization.
//!
//! Instrument parameters are stored as 32-bit floats in the compiled song.
//! Rounding away low mantissa bits makes the parameter block compress better
//! at the cost of precision. `level` in [0, 1] selects how many of the 31
//! non-sign bits are rounded away: 0 keeps the value exact, 1 keeps only the
//! sign.

/// Round `value` to `floor(level * 31)` cleared low bits of its bit pattern.
pub fn quantize(value: f32, level: f32) -> f32 {
    let shift = (level.clamp(0.0, 1.0) * 31.0).floor() as u32;
    let bit = 1u32 << shift;
    let mask = bit.wrapping_neg();
    let add = bit >> 1;
    let mut bits = value.to_bits().wrapping_add(add) & mask;
    if bits == 0x8000_0000 {
        bits = 0;
    }
    f32::from_bits(bits)
}
