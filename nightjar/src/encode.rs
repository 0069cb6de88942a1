// The PCM boundary: 16-bit conversion and the pluggable encoder adapter.
//
// The core hands encoders signed 16-bit PCM and a handful of settings; any
// codec that can consume chunks and flush a trailer is substitutable. The
// default adapter wraps the samples in a WAV container via `hound`, entirely
// in memory; callers decide where the bytes go.
//
// Encoder failures are a separate error family from generation errors: they
// are fatal to the write, but the generated buffer stays valid and can be
// retried with a different adapter.

use std::io::Cursor;
use thiserror::Error;

use crate::buffer::SampleBuffer;

/// Convert normalized samples to signed 16-bit PCM.
///
/// Samples are scaled by 32767 and truncated toward zero. Inputs are
/// expected in [-1, 1]; anything outside saturates.
pub fn to_pcm16(buffer: &SampleBuffer) -> Vec<i16> {
    buffer.samples().iter().map(|s| (s * 32767.0) as i16).collect()
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("wav encoding failed: {0}")]
    Wav(#[from] hound::Error),
    #[error("encoder already finished")]
    Finished,
}

/// Stream parameters handed to an encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderSettings {
    /// Target bit rate for lossy codecs. Lossless adapters may ignore it.
    pub bit_rate_kbps: u32,
    pub sample_rate: u32,
    pub channels: u16,
}

impl EncoderSettings {
    /// Mono stream at the given sample rate, 192 kbps nominal.
    pub fn mono(sample_rate: u32) -> Self {
        EncoderSettings {
            bit_rate_kbps: 192,
            sample_rate,
            channels: 1,
        }
    }
}

/// A one-shot PCM encoder. Feed chunks, then flush; the encoded stream is
/// the concatenation of every `encode_chunk` output followed by the
/// `finish` output.
pub trait PcmEncoder {
    fn encode_chunk(&mut self, pcm: &[i16]) -> Result<Vec<u8>, EncodeError>;
    fn finish(&mut self) -> Result<Vec<u8>, EncodeError>;
}

/// WAV adapter: buffers PCM and emits the whole container at finish time
/// (the header carries a length, so nothing can be flushed early). Being an
/// uncompressed format it ignores `bit_rate_kbps`.
pub struct WavEncoder {
    spec: hound::WavSpec,
    pcm: Vec<i16>,
    finished: bool,
}

impl WavEncoder {
    pub fn new(settings: &EncoderSettings) -> Self {
        WavEncoder {
            spec: hound::WavSpec {
                channels: settings.channels,
                sample_rate: settings.sample_rate,
                bits_per_sample: 16,
                sample_format: hound::SampleFormat::Int,
            },
            pcm: Vec::new(),
            finished: false,
        }
    }
}

impl PcmEncoder for WavEncoder {
    fn encode_chunk(&mut self, pcm: &[i16]) -> Result<Vec<u8>, EncodeError> {
        if self.finished {
            return Err(EncodeError::Finished);
        }
        self.pcm.extend_from_slice(pcm);
        Ok(Vec::new())
    }

    fn finish(&mut self) -> Result<Vec<u8>, EncodeError> {
        if self.finished {
            return Err(EncodeError::Finished);
        }
        self.finished = true;

        let mut bytes = Vec::new();
        let mut writer = hound::WavWriter::new(Cursor::new(&mut bytes), self.spec)?;
        for &sample in &self.pcm {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(bytes)
    }
}

/// Encode an entire buffer in one call: convert to PCM, feed it, flush.
pub fn encode_buffer(
    buffer: &SampleBuffer,
    encoder: &mut dyn PcmEncoder,
) -> Result<Vec<u8>, EncodeError> {
    let pcm = to_pcm16(buffer);
    let mut out = encoder.encode_chunk(&pcm)?;
    out.extend(encoder.finish()?);
    Ok(out)
}
