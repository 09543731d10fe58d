// Frequency sampler: one byte magnitude per FFT bin, refreshed once per frame.
//
// With an analysis source attached the sampler copies its magnitudes.
// Without one it synthesizes a waveform that is a pure function of the
// timestamp, so the visualizer still moves (and tests stay deterministic)
// when no audio is flowing.

use std::ops::Range;
use std::sync::{Arc, Mutex};

/// Default FFT size; the sampler exposes `fft_size / 2` bins.
pub const DEFAULT_FFT_SIZE: usize = 256;

/// Anything that can report the current frequency magnitudes.
pub trait AnalysisSource: Send {
    /// Copy the current magnitudes into `out`, one byte per bin.
    fn fill_magnitudes(&mut self, out: &mut [u8]);
}

/// One frame of frequency magnitudes in `0..=255`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencySample {
    bins: Vec<u8>,
}

impl FrequencySample {
    pub fn new(bin_count: usize) -> Self {
        Self {
            bins: vec![0; bin_count],
        }
    }

    pub fn from_bins(bins: Vec<u8>) -> Self {
        Self { bins }
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn bins(&self) -> &[u8] {
        &self.bins
    }

    pub fn fill(&mut self, value: u8) {
        self.bins.fill(value);
    }

    /// Raw magnitude at `index % len`.
    pub fn value(&self, index: usize) -> u8 {
        if self.bins.is_empty() {
            0
        } else {
            self.bins[index % self.bins.len()]
        }
    }

    /// Normalized magnitude in 0..1 at `index % len`.
    pub fn amplitude(&self, index: usize) -> f32 {
        self.value(index) as f32 / 255.0
    }

    /// Mean normalized magnitude over `range`, clamped to the available bins.
    pub fn band_average(&self, range: Range<usize>) -> f32 {
        let end = range.end.min(self.bins.len());
        let start = range.start.min(end);
        if start == end {
            return 0.0;
        }
        let sum: u32 = self.bins[start..end].iter().map(|&v| v as u32).sum();
        sum as f32 / ((end - start) as f32 * 255.0)
    }

    /// Lowest eighth of the spectrum.
    pub fn bass(&self) -> f32 {
        let n = self.bins.len();
        self.band_average(0..(n / 8).max(1))
    }

    pub fn mid(&self) -> f32 {
        let n = self.bins.len();
        self.band_average((n / 8).max(1)..n / 2)
    }

    pub fn treble(&self) -> f32 {
        let n = self.bins.len();
        self.band_average(n / 2..n)
    }
}

/// Produces one `FrequencySample` per frame.
pub struct FrequencySampler {
    source: Option<Box<dyn AnalysisSource>>,
    sample: FrequencySample,
}

impl FrequencySampler {
    pub fn new(fft_size: usize) -> Self {
        Self {
            source: None,
            sample: FrequencySample::new((fft_size / 2).max(1)),
        }
    }

    pub fn attach(&mut self, source: Box<dyn AnalysisSource>) {
        self.source = Some(source);
    }

    pub fn detach(&mut self) -> Option<Box<dyn AnalysisSource>> {
        self.source.take()
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    pub fn bin_count(&self) -> usize {
        self.sample.len()
    }

    /// The sample produced by the most recent `sample()` call.
    pub fn current(&self) -> &FrequencySample {
        &self.sample
    }

    /// Refresh and return the sample for the frame at `now_ms`. Never fails.
    pub fn sample(&mut self, now_ms: f64) -> &FrequencySample {
        match self.source.as_mut() {
            Some(source) => source.fill_magnitudes(&mut self.sample.bins),
            None => synthesize(now_ms, &mut self.sample.bins),
        }
        &self.sample
    }
}

/// Deterministic stand-in spectrum: phase-shifted sine, bounded jitter and a
/// slower secondary sine that favors the low bins.
pub fn synthesize(now_ms: f64, out: &mut [u8]) {
    let t = now_ms / 1000.0;
    let slot = (t * 30.0).floor() as i64;
    let n = out.len().max(1) as f64;
    for (i, value) in out.iter_mut().enumerate() {
        let fi = i as f64;
        let primary = 64.0 * (t * 2.0 + fi * 0.15).sin();
        let secondary = 32.0 * (t * 0.7 + fi * 0.05).sin() * (1.0 - fi / n);
        let v = 128.0 + primary + jitter(i, slot) * 24.0 + secondary;
        *value = v.round().clamp(0.0, 255.0) as u8;
    }
}

/// Hash-style pseudo-random in -1..1 keyed by bin and time slot.
fn jitter(bin: usize, slot: i64) -> f64 {
    let x = (bin as f64 * 12.9898 + slot as f64 * 78.233).sin() * 43758.5453;
    x.fract().abs() * 2.0 - 1.0
}

/// Analysis source fed from another thread (e.g. an audio callback).
#[derive(Debug, Clone, Default)]
pub struct SharedSpectrum {
    bins: Arc<Mutex<Vec<u8>>>,
}

impl SharedSpectrum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the published magnitudes.
    pub fn publish(&self, bins: &[u8]) {
        if let Ok(mut guard) = self.bins.lock() {
            guard.clear();
            guard.extend_from_slice(bins);
        }
    }
}

impl AnalysisSource for SharedSpectrum {
    fn fill_magnitudes(&mut self, out: &mut [u8]) {
        out.fill(0);
        if let Ok(guard) = self.bins.lock() {
            let n = guard.len().min(out.len());
            out[..n].copy_from_slice(&guard[..n]);
        }
    }
}
