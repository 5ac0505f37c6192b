#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Full-scale value used when converting between `f32` and 16-bit PCM.
pub const PCM_SCALE: f32 = 32_767.0;

/// What happens to scaled samples that fall outside the `i16` range.
///
/// `Wrap` narrows with two's-complement wraparound, which is how the
/// reference renderer behaved. `Clamp` saturates at the rails instead.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Overflow {
    #[default]
    Wrap,
    Clamp,
}

/// Convert one sample to 16-bit PCM via `round(x * 32767)`.
#[inline]
pub fn quantize_sample(sample: f32, overflow: Overflow) -> i16 {
    let scaled = (sample * PCM_SCALE).round();
    match overflow {
        // f32 -> i64 saturates (NaN becomes 0), i64 -> i16 keeps the low bits.
        Overflow::Wrap => scaled as i64 as i16,
        Overflow::Clamp => scaled.clamp(i16::MIN as f32, i16::MAX as f32) as i16,
    }
}

/// Quantize a whole waveform. The output has the same length as the input.
pub fn quantize(samples: &[f32], overflow: Overflow) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| quantize_sample(s, overflow))
        .collect()
}

/// Map PCM back to floats on the same scale used by [`quantize`].
pub fn dequantize(pcm: &[i16]) -> Vec<f32> {
    pcm.iter().map(|&s| s as f32 / PCM_SCALE).collect()
}
