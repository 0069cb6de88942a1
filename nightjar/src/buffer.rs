// The shared sample buffer: a fixed-length mono accumulator.
//
// Events accumulate, never overwrite, so overlapping waveforms sum into
// polyphony and the mix is independent of layer order. All boundary clamping
// lives here: writes past the end are truncated, writes starting at or past
// the end are dropped entirely.

/// Fixed-length buffer of mono f32 samples, indexed by
/// round(time * sample_rate).
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
}

impl SampleBuffer {
    pub fn new(len: usize) -> Self {
        SampleBuffer {
            samples: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Add a waveform into the buffer starting at a sample offset.
    ///
    /// An offset at or past the end drops the waveform; one that overlaps
    /// the end keeps only the part that fits. Existing content is summed
    /// with, never replaced.
    pub fn accumulate(&mut self, offset: usize, samples: &[f32]) {
        if offset >= self.samples.len() {
            return;
        }
        let end = (offset + samples.len()).min(self.samples.len());
        for (dst, src) in self.samples[offset..end].iter_mut().zip(samples) {
            *dst += src;
        }
    }

    /// Element-wise sum of another buffer of the same length.
    pub fn add(&mut self, other: &SampleBuffer) {
        debug_assert_eq!(self.samples.len(), other.samples.len());
        for (dst, src) in self.samples.iter_mut().zip(&other.samples) {
            *dst += src;
        }
    }

    /// Peak absolute amplitude, 0.0 for a silent buffer.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    /// Rescale so the peak absolute amplitude equals the target.
    ///
    /// A silent buffer is left untouched; a zero peak never divides.
    pub fn normalize(&mut self, target: f32) {
        let peak = self.peak();
        if peak == 0.0 {
            return;
        }
        let scale = target / peak;
        for s in &mut self.samples {
            *s *= scale;
        }
    }
}
