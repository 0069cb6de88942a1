// Waveform synthesis: one event in, one sample array out.
//
// Two families: tonal (sine with an optional exponential decay envelope)
// and percussive (fixed per-kind formulas blending tone and noise under a
// decay). Sample counts truncate (n = floor(sample_rate * duration)) and
// sample times span [0, duration) without the endpoint, so an event that is
// too short to hold a single sample synthesizes to nothing.
//
// Symbol resolution is permissive end to end: a note name missing from the
// pitch table or an unrecognized percussion kind yields silence for that one
// event (logged, never fatal). Percussion noise is uniform in [0, 1); the
// DC offset is part of the sound.

use log::warn;
use rand::Rng;
use std::f64::consts::TAU;

use crate::theory;

/// How the mixer should voice a layer's events. Passed by value; carries
/// everything the synthesizer needs beyond the event itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerSound {
    /// Sine tone; decay = 0 sustains, decay > 0 shapes the envelope down to
    /// exp(-decay) at the event's end.
    Tone { decay: f64 },
    /// Event symbols name percussion kinds instead of pitches.
    Percussion,
}

/// Render a sine tone of the given duration.
pub fn sine_wave(freq: f64, duration: f64, decay: f64, sample_rate: u32) -> Vec<f32> {
    let n = (sample_rate as f64 * duration) as usize;
    let mut out = Vec::with_capacity(n);
    for k in 0..n {
        let t = duration * k as f64 / n as f64;
        let mut sample = (TAU * freq * t).sin();
        if decay > 0.0 {
            sample *= (-t / duration * decay).exp();
        }
        out.push(sample as f32);
    }
    out
}

/// Render one percussion hit. Unrecognized kinds yield silence of the same
/// length rather than an error.
pub fn percussion(kind: &str, duration: f64, sample_rate: u32, rng: &mut impl Rng) -> Vec<f32> {
    let n = (sample_rate as f64 * duration) as usize;
    let mut out = Vec::with_capacity(n);
    for k in 0..n {
        let t = duration * k as f64 / n as f64;
        let sample = match kind {
            "kick" => (TAU * 55.0 * t).sin() * (-30.0 * t).exp(),
            "snare" => (0.8 * (TAU * 180.0 * t).sin() + 0.2 * rng.random::<f64>())
                * (-20.0 * t).exp(),
            "hihat" => rng.random::<f64>() * (-60.0 * t).exp() * 0.4,
            "clap" => rng.random::<f64>() * (-40.0 * t).exp() * 0.6,
            _ => 0.0,
        };
        out.push(sample as f32);
    }
    out
}

/// Resolve an event symbol through the layer's sound and synthesize it.
///
/// Unknown tonal symbols synthesize to nothing; unknown percussion kinds to
/// zeros. Both are logged so a misconfigured catalog is visible without
/// aborting the run.
pub fn synthesize(
    sound: LayerSound,
    symbol: &str,
    duration: f64,
    sample_rate: u32,
    rng: &mut impl Rng,
) -> Vec<f32> {
    match sound {
        LayerSound::Tone { decay } => match theory::note_frequency(symbol) {
            Some(freq) => sine_wave(freq, duration, decay, sample_rate),
            None => {
                warn!("unknown note {symbol:?}, rendering silence");
                Vec::new()
            }
        },
        LayerSound::Percussion => {
            if !matches!(symbol, "kick" | "snare" | "hihat" | "clap") {
                warn!("unknown percussion kind {symbol:?}, rendering silence");
            }
            percussion(symbol, duration, sample_rate, rng)
        }
    }
}
