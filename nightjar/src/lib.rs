// Nightjar: procedural music sketch generator.
//
// Composes a short five-layer piece (melody, arpeggio, bassline, pads,
// drums) over a randomly drawn tempo and chord progression, renders every
// layer to waveforms, and mixes them into a single normalized mono sample
// buffer ready for 16-bit PCM encoding.
//
// Architecture:
// - theory.rs: static pitch table, chord triads, scale, progression catalog
// - config.rs: run configuration, validation, JSON loading
// - plan.rs: per-run draw of tempo, progression, and motif
// - layers.rs: the five event generators (the rule-dense core)
// - synth.rs: sine and percussion waveform synthesis with decay envelopes
// - buffer.rs: the fixed-length accumulating sample buffer + normalizer
// - render.rs: per-layer rendering, parallel mixing, the generate() pipeline
// - encode.rs: 16-bit PCM conversion and the pluggable encoder adapter (WAV)
//
// The generator is deterministic given a seed: every random decision draws
// from an rng threaded through the pipeline, so fixed-seed runs reproduce
// bit-exact buffers.

pub mod buffer;
pub mod config;
pub mod encode;
pub mod layers;
pub mod plan;
pub mod render;
pub mod synth;
pub mod theory;
