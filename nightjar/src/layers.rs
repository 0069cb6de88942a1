// Layer generators: timed event sequences for the five musical layers.
//
// Every generator shares the same beat unit (60 / bpm) and runs a local
// clock from 0 to the total duration, clamping the final event so nothing
// extends past the end. The layers are mutually independent: each one only
// reads the shared plan, which is what lets render.rs fan them out in
// parallel.
//
// Chord selection differs by layer and the difference is intentional:
// melody and arpeggio index the progression by elapsed time
// (floor(t / 4 beats) mod len), while bassline and pads index it by event
// count. For progressions whose length divides the piece evenly the two
// agree; bass/pads stay count-driven regardless.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::theory;

/// Length of one chord in beats, shared by every layer.
const CHORD_BEATS: f64 = 4.0;

/// One timed event produced by a generator and consumed once by the mixer.
///
/// The symbol is either a pitched-note name ("C4") or a percussion kind
/// ("kick"). Invariants: duration > 0, start >= 0, and events from one
/// generator call are emitted in non-decreasing start order (drums are
/// ordered by slot; a slot may emit several events).
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub symbol: String,
    pub duration: f64,
    pub start: f64,
}

impl Event {
    fn new(symbol: impl Into<String>, duration: f64, start: f64) -> Self {
        Event {
            symbol: symbol.into(),
            duration,
            start,
        }
    }
}

/// Draw one value from a weighted discrete set.
///
/// Weights need not be normalized. Falls back to the last value if the
/// cumulative walk runs off the end (possible only through float rounding).
fn weighted_choice(choices: &[(f64, f64)], rng: &mut impl Rng) -> f64 {
    let total: f64 = choices.iter().map(|(_, w)| w).sum();
    let r = rng.random::<f64>() * total;
    let mut cum = 0.0;
    for &(value, weight) in choices {
        cum += weight;
        if cum > r {
            return value;
        }
    }
    choices[choices.len() - 1].0
}

/// Chord root at elapsed time t, cycling the progression every four beats.
fn root_at<'a>(progression: &'a [String], t: f64, beat: f64) -> &'a str {
    let cycle = CHORD_BEATS * beat;
    &progression[(t / cycle) as usize % progression.len()]
}

/// Melody: probabilistic note choices over the chord cycle.
///
/// Each step draws from the current chord's triad with probability 0.7,
/// otherwise from the scale; with probability 0.2 the choice is overridden
/// by a motif note (the override is applied after the pool draw and takes
/// precedence). Durations come from a weighted set of half, whole, and
/// double beats.
pub fn melody(
    progression: &[String],
    bpm: u32,
    motif: &[String],
    scale: &[String],
    total: f64,
    rng: &mut impl Rng,
) -> Vec<Event> {
    const DURATIONS: [(f64, f64); 3] = [(0.5, 0.4), (1.0, 0.4), (2.0, 0.2)];

    let beat = 60.0 / bpm as f64;
    let mut t = 0.0;
    let mut out = Vec::new();

    while t < total {
        let root = root_at(progression, t, beat);
        // Unknown roots fall back to the scale pool rather than aborting.
        let triad = if rng.random_bool(0.7) {
            theory::chord_triad(root)
        } else {
            None
        };
        let mut note: &str = match triad {
            Some(tones) => tones[rng.random_range(0..tones.len())],
            None => scale[rng.random_range(0..scale.len())].as_str(),
        };
        if rng.random_bool(0.2) && !motif.is_empty() {
            note = motif[rng.random_range(0..motif.len())].as_str();
        }

        let dur = (weighted_choice(&DURATIONS, rng) * beat).min(total - t);
        if dur <= 0.0 {
            break;
        }
        out.push(Event::new(note, dur, t));
        t += dur;
    }
    out
}

/// Triad ordering for the arpeggio layer, fixed once per run.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ArpStyle {
    Ascending,
    Descending,
    Shuffled,
}

/// Arpeggio: broken-chord eighth notes over the chord cycle.
///
/// A style is drawn once per call. Sorted styles reorder the triad
/// identically at every lookup; the shuffled style draws a fresh order on
/// every step, even within one chord. A running index walks the ordered
/// triad and keeps advancing across chord changes.
pub fn arpeggio(
    progression: &[String],
    bpm: u32,
    total: f64,
    rng: &mut impl Rng,
) -> Vec<Event> {
    let beat = 60.0 / bpm as f64;
    let step = 0.5 * beat;
    let style = match rng.random_range(0..3) {
        0 => ArpStyle::Ascending,
        1 => ArpStyle::Descending,
        _ => ArpStyle::Shuffled,
    };

    let mut t = 0.0;
    let mut idx: usize = 0;
    let mut out = Vec::new();

    while t < total {
        let dur = step.min(total - t);
        if dur <= 0.0 {
            break;
        }
        if let Some(mut notes) = theory::chord_triad(root_at(progression, t, beat)) {
            match style {
                ArpStyle::Ascending => notes.sort_by(|a, b| {
                    theory::note_frequency(a)
                        .unwrap_or(0.0)
                        .total_cmp(&theory::note_frequency(b).unwrap_or(0.0))
                }),
                ArpStyle::Descending => notes.sort_by(|a, b| {
                    theory::note_frequency(b)
                        .unwrap_or(0.0)
                        .total_cmp(&theory::note_frequency(a).unwrap_or(0.0))
                }),
                ArpStyle::Shuffled => notes.shuffle(rng),
            }
            out.push(Event::new(notes[idx % notes.len()], dur, t));
        }
        t += dur;
        idx += 1;
    }
    out
}

/// Bassline: one root note per chord, whole-chord durations.
///
/// The pitch is the chord root's own name (the bass plays the root, not a
/// triad tone), and the progression index advances once per event rather
/// than being derived from the clock. Fully deterministic.
pub fn bassline(progression: &[String], bpm: u32, total: f64) -> Vec<Event> {
    let beat = 60.0 / bpm as f64;
    let mut t = 0.0;
    let mut idx: usize = 0;
    let mut out = Vec::new();

    while t < total {
        let dur = (CHORD_BEATS * beat).min(total - t);
        if dur <= 0.0 {
            break;
        }
        out.push(Event::new(progression[idx % progression.len()].as_str(), dur, t));
        t += dur;
        idx += 1;
    }
    out
}

/// Pads: the full triad held under each chord.
///
/// Emits three simultaneous-onset events per chord (one per triad tone)
/// sharing the same start and clamped duration. Progression indexing is
/// count-driven like the bassline. The clock advances by the full chord
/// length, so only the final group is shortened.
pub fn pads(progression: &[String], bpm: u32, total: f64) -> Vec<Event> {
    let beat = 60.0 / bpm as f64;
    let chord_dur = CHORD_BEATS * beat;
    let mut t = 0.0;
    let mut idx: usize = 0;
    let mut out = Vec::new();

    while t < total {
        let dur = chord_dur.min(total - t);
        if dur > 0.0 {
            if let Some(triad) = theory::chord_triad(&progression[idx % progression.len()]) {
                for note in triad {
                    out.push(Event::new(note, dur, t));
                }
            }
        }
        t += chord_dur;
        idx += 1;
    }
    out
}

/// Drums: a fixed groove over integer beat slots.
///
/// Slot phase cycles 1..4. Phases 1 and 3 carry the kick, 2 and 4 the
/// snare (plus a clap once past the halfway point). Every slot gets two
/// hi-hat hits, on the beat and a quarter-beat later. A slot sprouts a
/// four-hit snare roll with probability 0.1.
pub fn drums(bpm: u32, total: f64, rng: &mut impl Rng) -> Vec<Event> {
    let beat = 60.0 / bpm as f64;
    let mut out = Vec::new();

    for i in 0..(total / beat) as usize {
        let start = i as f64 * beat;
        let phase = i % 4 + 1;

        if phase == 1 || phase == 3 {
            out.push(Event::new("kick", 0.08, start));
        }
        if phase == 2 || phase == 4 {
            out.push(Event::new("snare", 0.08, start));
            if start > total / 2.0 {
                out.push(Event::new("clap", 0.08, start));
            }
        }
        out.push(Event::new("hihat", 0.06, start));
        out.push(Event::new("hihat", 0.04, start + 0.25 * beat));

        if rng.random_bool(0.1) {
            for j in 0..4 {
                out.push(Event::new("snare", 0.05, start + j as f64 * 0.05));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const EPS: f64 = 1e-9;

    fn prog(roots: &[&str]) -> Vec<String> {
        roots.iter().map(|s| s.to_string()).collect()
    }

    fn scale() -> Vec<String> {
        theory::SCALE.iter().map(|s| s.to_string()).collect()
    }

    /// Consecutive events must tile [0, total) with no gaps or overlaps.
    fn assert_gapless(events: &[Event], total: f64) {
        assert!(!events.is_empty());
        assert!(events[0].start.abs() < EPS);
        for pair in events.windows(2) {
            assert!(
                (pair[0].start + pair[0].duration - pair[1].start).abs() < EPS,
                "gap between {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
        let last = &events[events.len() - 1];
        assert!((last.start + last.duration - total).abs() < EPS);
    }

    #[test]
    fn test_melody_covers_duration() {
        let mut rng = StdRng::seed_from_u64(11);
        let progression = prog(&["C3", "G3", "A3", "F3"]);
        let motif = prog(&["C4", "E4", "G4"]);
        let events = melody(&progression, 120, &motif, &scale(), 15.0, &mut rng);
        assert_gapless(&events, 15.0);
    }

    #[test]
    fn test_melody_draws_from_known_material() {
        let mut rng = StdRng::seed_from_u64(3);
        let progression = prog(&["C3", "G3", "A3", "F3"]);
        let motif = prog(&["D4", "D4", "A4"]);
        let events = melody(&progression, 132, &motif, &scale(), 15.0, &mut rng);

        let mut pool: Vec<&str> = theory::SCALE.to_vec();
        for root in ["C3", "G3", "A3", "F3"] {
            pool.extend(theory::chord_triad(root).unwrap());
        }
        for ev in &events {
            assert!(
                pool.contains(&ev.symbol.as_str()),
                "melody emitted {} which is outside the material",
                ev.symbol
            );
        }
    }

    #[test]
    fn test_melody_durations_come_from_weighted_set() {
        let mut rng = StdRng::seed_from_u64(19);
        let progression = prog(&["C3"]);
        let beat = 60.0 / 120.0;
        let events = melody(&progression, 120, &[], &scale(), 60.0, &mut rng);
        for ev in &events[..events.len() - 1] {
            let in_set = [0.5, 1.0, 2.0]
                .iter()
                .any(|m| (ev.duration - m * beat).abs() < EPS);
            assert!(in_set, "unclamped duration {} not in the weighted set", ev.duration);
        }
    }

    #[test]
    fn test_arpeggio_quarter_second_grid() {
        // 120 bpm, half-beat steps: 0.25 s each, four events in one second.
        let mut rng = StdRng::seed_from_u64(5);
        let events = arpeggio(&prog(&["C3"]), 120, 1.0, &mut rng);
        assert_eq!(events.len(), 4);
        for (i, ev) in events.iter().enumerate() {
            assert!((ev.start - i as f64 * 0.25).abs() < EPS);
            assert!((ev.duration - 0.25).abs() < EPS);
            assert!(theory::chord_triad("C3").unwrap().contains(&ev.symbol.as_str()));
        }
    }

    #[test]
    fn test_arpeggio_covers_duration() {
        for seed in 0..3 {
            let mut rng = StdRng::seed_from_u64(seed);
            let events = arpeggio(&prog(&["C3", "G3", "A3", "F3"]), 110, 15.0, &mut rng);
            assert_gapless(&events, 15.0);
        }
    }

    #[test]
    fn test_bassline_single_clamped_event() {
        // Four beats at 120 bpm is 2 s; a 1 s piece clamps it to one event.
        let events = bassline(&prog(&["C3"]), 120, 1.0);
        assert_eq!(events, vec![Event::new("C3", 1.0, 0.0)]);
    }

    #[test]
    fn test_bassline_indexes_by_event_count() {
        let events = bassline(&prog(&["C3", "G3"]), 120, 8.0);
        let roots: Vec<&str> = events.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(roots, ["C3", "G3", "C3", "G3"]);
        assert_gapless(&events, 8.0);
    }

    #[test]
    fn test_pads_emit_triad_groups() {
        let events = pads(&prog(&["C3", "G3"]), 120, 8.0);
        assert_eq!(events.len(), 12); // 4 chords, 3 tones each
        for group in events.chunks(3) {
            assert_eq!(group[0].start, group[1].start);
            assert_eq!(group[0].start, group[2].start);
            assert_eq!(group[0].duration, group[1].duration);
            assert_eq!(group[0].duration, group[2].duration);
        }
        // Count-driven indexing: first group is the C triad, second the G triad.
        assert_eq!(events[0].symbol, "C4");
        assert_eq!(events[3].symbol, "G4");
    }

    #[test]
    fn test_pads_clamp_final_group() {
        let events = pads(&prog(&["C3"]), 120, 3.0);
        // 2 s chord, then a 1 s clamped remainder.
        assert_eq!(events.len(), 6);
        assert!((events[3].duration - 1.0).abs() < EPS);
        assert!((events[3].start - 2.0).abs() < EPS);
    }

    #[test]
    fn test_no_event_extends_past_total() {
        let progression = prog(&["C3", "G3", "A3", "F3"]);
        let motif = prog(&["C4", "F4", "A4"]);
        for (seed, bpm) in [(1u64, 110u32), (2, 125), (3, 140)] {
            let mut rng = StdRng::seed_from_u64(seed);
            let total = 15.0;
            let all = [
                melody(&progression, bpm, &motif, &scale(), total, &mut rng),
                arpeggio(&progression, bpm, total, &mut rng),
                bassline(&progression, bpm, total),
                pads(&progression, bpm, total),
                drums(bpm, total, &mut rng),
            ];
            for events in &all {
                for ev in events {
                    assert!(ev.duration > 0.0);
                    assert!(ev.start >= 0.0);
                    assert!(
                        ev.start + ev.duration <= total + EPS,
                        "event {:?} extends past {}",
                        ev,
                        total
                    );
                }
            }
        }
    }

    #[test]
    fn test_drum_skeleton_is_deterministic() {
        // 8 slots at 120 bpm over 4 s. Ignoring rolls (0.05 s snares) and
        // claps, the phase pattern is kick/snare/kick/snare with hi-hats
        // everywhere.
        let mut rng = StdRng::seed_from_u64(23);
        let events = drums(120, 4.0, &mut rng);
        let beat = 0.5;

        for slot in 0..8usize {
            let start = slot as f64 * beat;
            let at = |symbol: &str, dur: f64| {
                events
                    .iter()
                    .filter(|e| {
                        e.symbol == symbol
                            && (e.start - start).abs() < EPS
                            && (e.duration - dur).abs() < EPS
                    })
                    .count()
            };
            if slot % 4 == 0 || slot % 4 == 2 {
                assert_eq!(at("kick", 0.08), 1, "slot {} should carry a kick", slot);
                assert_eq!(at("snare", 0.08), 0);
            } else {
                assert_eq!(at("snare", 0.08), 1, "slot {} should carry a snare", slot);
                assert_eq!(at("kick", 0.08), 0);
            }
            assert_eq!(at("hihat", 0.06), 1);
            assert_eq!(
                events
                    .iter()
                    .filter(|e| e.symbol == "hihat"
                        && (e.start - (start + 0.25 * beat)).abs() < EPS)
                    .count(),
                1
            );
        }
    }

    #[test]
    fn test_claps_only_past_halfway() {
        let mut rng = StdRng::seed_from_u64(29);
        let events = drums(120, 4.0, &mut rng);
        let claps: Vec<&Event> = events.iter().filter(|e| e.symbol == "clap").collect();
        assert!(!claps.is_empty());
        for clap in &claps {
            assert!(clap.start > 2.0, "clap at {} before the halfway point", clap.start);
        }
    }

    #[test]
    fn test_drum_symbols_are_known_kinds() {
        let mut rng = StdRng::seed_from_u64(31);
        for ev in drums(140, 15.0, &mut rng) {
            assert!(["kick", "snare", "hihat", "clap"].contains(&ev.symbol.as_str()));
        }
    }

    #[test]
    fn test_short_piece_still_terminates() {
        let mut rng = StdRng::seed_from_u64(37);
        let progression = prog(&["C3"]);
        // Shorter than one beat at 110 bpm.
        let events = melody(&progression, 110, &[], &scale(), 0.1, &mut rng);
        assert_gapless(&events, 0.1);
        assert!(bassline(&progression, 110, 0.1).len() == 1);
        assert!(drums(110, 0.1, &mut rng).is_empty()); // no full slot fits
    }

    #[test]
    fn test_weighted_choice_respects_weights() {
        let mut rng = StdRng::seed_from_u64(41);
        let choices = [(0.5, 0.4), (1.0, 0.4), (2.0, 0.2)];
        let mut counts = [0usize; 3];
        for _ in 0..10_000 {
            let v = weighted_choice(&choices, &mut rng);
            let i = choices.iter().position(|(c, _)| *c == v).unwrap();
            counts[i] += 1;
        }
        // Loose bounds; this is a sanity check, not a chi-squared test.
        assert!(counts[0] > 3_000 && counts[0] < 5_000);
        assert!(counts[1] > 3_000 && counts[1] < 5_000);
        assert!(counts[2] > 1_200 && counts[2] < 2_800);
    }
}
