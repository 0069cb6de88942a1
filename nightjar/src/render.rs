// Mixing and the end-to-end generation pipeline.
//
// Each layer renders into its own private buffer (events → waveforms →
// volume-scaled accumulation), the five buffers are summed in fixed layer
// order, and the mix is normalized to a 0.9 peak. Because layers only read
// the shared plan and write their own buffer, rendering fans out across a
// thread pool with no locks; the fixed-order reduction keeps same-seed runs
// bit-exact.
//
// Event generation stays sequential on the caller's rng. Rendering draws one
// sub-seed per layer up front, so the percussion noise streams are stable no
// matter how the pool schedules the layers.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::buffer::SampleBuffer;
use crate::config::{ConfigError, SketchConfig};
use crate::layers::{self, Event};
use crate::plan::{self, SketchPlan};
use crate::synth::{self, LayerSound};

/// Envelope decay factors per tonal layer. Bass sustains; pads fade gently;
/// melody and arpeggio are plucked.
const MELODY_DECAY: f64 = 3.0;
const ARPEGGIO_DECAY: f64 = 3.0;
const BASS_DECAY: f64 = 0.0;
const PADS_DECAY: f64 = 0.5;

/// Peak amplitude after normalization, leaving headroom below full scale
/// for the 16-bit conversion.
const PEAK_TARGET: f32 = 0.9;

/// A finished generation run: the plan that was drawn and the mixed,
/// normalized buffer.
#[derive(Debug, Clone)]
pub struct Sketch {
    pub plan: SketchPlan,
    pub buffer: SampleBuffer,
}

/// Render one layer's events into a private buffer.
///
/// The sample offset is round(start * sample_rate); the buffer's
/// accumulation contract drops events starting at or past the end and
/// truncates waveforms overlapping it.
pub fn render_layer(
    events: &[Event],
    sound: LayerSound,
    volume: f32,
    sample_rate: u32,
    len: usize,
    rng: &mut impl Rng,
) -> SampleBuffer {
    let mut buf = SampleBuffer::new(len);
    for ev in events {
        let offset = (ev.start * sample_rate as f64).round() as usize;
        let mut wave = synth::synthesize(sound, &ev.symbol, ev.duration, sample_rate, rng);
        for s in &mut wave {
            *s *= volume;
        }
        buf.accumulate(offset, &wave);
    }
    buf
}

/// Compose and render one sketch.
///
/// Validates the config, draws a plan, generates the five event lists, and
/// mixes them into a normalized buffer. A run whose layers all synthesize to
/// silence returns the all-zero buffer unscaled.
pub fn generate(config: &SketchConfig, rng: &mut impl Rng) -> Result<Sketch, ConfigError> {
    config.validate()?;
    let plan = plan::choose_plan(config, rng);
    let total = config.duration_seconds;

    let melody = layers::melody(
        &plan.progression,
        plan.bpm,
        &plan.motif,
        &config.scale,
        total,
        rng,
    );
    let arpeggio = layers::arpeggio(&plan.progression, plan.bpm, total, rng);
    let bass = layers::bassline(&plan.progression, plan.bpm, total);
    let pads = layers::pads(&plan.progression, plan.bpm, total);
    let drums = layers::drums(plan.bpm, total, rng);
    debug!(
        "generated events at {} bpm: melody {}, arpeggio {}, bass {}, pads {}, drums {}",
        plan.bpm,
        melody.len(),
        arpeggio.len(),
        bass.len(),
        pads.len(),
        drums.len()
    );

    let v = config.volumes;
    let jobs: Vec<(Vec<Event>, LayerSound, f32, u64)> = vec![
        (melody, LayerSound::Tone { decay: MELODY_DECAY }, v.melody, rng.random::<u64>()),
        (arpeggio, LayerSound::Tone { decay: ARPEGGIO_DECAY }, v.arpeggio, rng.random::<u64>()),
        (bass, LayerSound::Tone { decay: BASS_DECAY }, v.bass, rng.random::<u64>()),
        (pads, LayerSound::Tone { decay: PADS_DECAY }, v.pads, rng.random::<u64>()),
        (drums, LayerSound::Percussion, v.drums, rng.random::<u64>()),
    ];

    let len = config.num_samples();
    let sample_rate = config.sample_rate;
    let rendered: Vec<SampleBuffer> = jobs
        .par_iter()
        .map(|(events, sound, volume, seed)| {
            let mut layer_rng = StdRng::seed_from_u64(*seed);
            render_layer(events, *sound, *volume, sample_rate, len, &mut layer_rng)
        })
        .collect();

    let mut buffer = SampleBuffer::new(len);
    for layer in &rendered {
        buffer.add(layer);
    }
    buffer.normalize(PEAK_TARGET);
    Ok(Sketch { plan, buffer })
}
