//! Spectrum widget
//!
//! FFT of the start of a rendered note, with the strongest partial marked so
//! the pitch can be checked against the target frequency.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, FftPlanner};

/// FFT size (~93 ms at 44.1 kHz, ~10.8 Hz per bin)
pub const FFT_LEN: usize = 4096;
/// Highest frequency shown
const MAX_DISPLAY_HZ: f64 = 2_000.0;

/// Magnitude spectrum of one note
pub struct Spectrum {
    /// (frequency_hz, magnitude_db) up to [`MAX_DISPLAY_HZ`]
    points: Vec<(f64, f64)>,
    /// Frequency of the loudest bin above DC
    peak_hz: f64,
}

impl Spectrum {
    /// Analyze the first [`FFT_LEN`] samples (zero-padded if shorter)
    pub fn analyze(samples: &[f32], sample_rate: f32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_LEN);

        // Hann window - reduces spectral leakage
        let denom = (FFT_LEN - 1) as f32;
        let mut buffer: Vec<Complex<f32>> = (0..FFT_LEN)
            .map(|i| {
                let window = 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos());
                let sample = samples.get(i).copied().unwrap_or(0.0);
                Complex::new(sample * window, 0.0)
            })
            .collect();

        fft.process(&mut buffer);

        let bin_hz = sample_rate as f64 / FFT_LEN as f64;
        let last_bin = ((MAX_DISPLAY_HZ / bin_hz) as usize).min(FFT_LEN / 2);

        let mut peak = (0.0f64, f32::MIN);
        let points = (1..=last_bin)
            .map(|bin| {
                let c = buffer[bin];
                let power = (c.re * c.re + c.im * c.im).max(1e-12);
                let freq = bin as f64 * bin_hz;
                if power > peak.1 {
                    peak = (freq, power);
                }
                (freq, 10.0 * (power as f64).log10())
            })
            .collect();

        Self {
            points,
            peak_hz: peak.0,
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn peak_hz(&self) -> f64 {
        self.peak_hz
    }
}

/// Render the spectrum widget
pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &Spectrum) {
    let block = Block::default()
        .title(format!(" Spectrum (peak {:.0} Hz) ", spectrum.peak_hz()))
        .borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum.data());

    let max_db = spectrum
        .data()
        .iter()
        .map(|(_, db)| *db)
        .fold(-100.0, f64::max);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, MAX_DISPLAY_HZ])
                .labels(vec!["0", "500", "1k", "1.5k", "2k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-60.0, max_db.max(0.0) + 10.0])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pluck_dsp::synth::PluckSynth;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn pure_tone_peaks_at_its_frequency() {
        let samples: Vec<f32> = (0..FFT_LEN)
            .map(|i| (2.0 * std::f32::consts::PI * 441.0 * i as f32 / 44_100.0).sin())
            .collect();
        let spectrum = Spectrum::analyze(&samples, 44_100.0);
        assert!((spectrum.peak_hz() - 441.0).abs() < 11.0);
    }

    #[test]
    fn pluck_peak_is_a_harmonic_of_the_string() {
        let synth = PluckSynth::new();
        let samples = synth.render(262.0, &mut StdRng::seed_from_u64(3)).unwrap();
        let spectrum = Spectrum::analyze(&samples[22_050..], 44_100.0);

        // 168 samples plus the half-sample delay of the averaging filter.
        let fundamental = 44_100.0 / 168.5;
        let harmonic = (spectrum.peak_hz() / fundamental).round().max(1.0);
        assert!(
            (spectrum.peak_hz() - harmonic * fundamental).abs() < 12.0,
            "peak {} Hz",
            spectrum.peak_hz()
        );
    }
}
