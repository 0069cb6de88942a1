// Static musical domain data: the pitch table, chord triads, the scale, and
// the progression catalog.
//
// Everything here is immutable and globally shared. Note identifiers are
// plain names ("C4", "G3"); resolution to a frequency goes through
// note_frequency(), and lookups return Option so that a symbol missing from
// the tables degrades to silence downstream instead of aborting a run.
//
// Used by plan.rs for progression/motif selection, layers.rs for note
// choices, and synth.rs for frequency resolution.

/// The diatonic pool for free (non-chord) melodic choices: one octave of
/// C major, C4 through C5.
pub const SCALE: [&str; 8] = ["C4", "D4", "E4", "F4", "G4", "A4", "B4", "C5"];

/// Candidate chord progressions, each a cyclic sequence of four chord roots.
pub const PROGRESSIONS: [[&str; 4]; 6] = [
    ["C3", "G3", "A3", "F3"],
    ["A3", "F3", "C3", "G3"],
    ["F3", "G3", "E3", "A3"],
    ["C3", "A3", "F3", "G3"],
    ["C3", "F3", "G3", "C3"],
    ["A3", "F3", "G3", "C3"],
];

/// Frequency in Hertz for a named pitch, A4 = 440 Hz tuning.
///
/// Covers C3 through E5, the union of the bass roots, the melodic scale,
/// and every triad tone. Unknown names return None.
pub fn note_frequency(name: &str) -> Option<f64> {
    match name {
        "C3" => Some(130.81),
        "D3" => Some(146.83),
        "E3" => Some(164.81),
        "F3" => Some(174.61),
        "G3" => Some(196.00),
        "A3" => Some(220.00),
        "B3" => Some(246.94),
        "C4" => Some(261.63),
        "D4" => Some(293.66),
        "E4" => Some(329.63),
        "F4" => Some(349.23),
        "G4" => Some(392.00),
        "A4" => Some(440.00),
        "B4" => Some(493.88),
        "C5" => Some(523.25),
        "D5" => Some(587.33),
        "E5" => Some(659.25),
        _ => None,
    }
}

/// The triad built on a chord root, as three note names.
///
/// Triads sit an octave above their root, except E3 which is voiced in the
/// lower octave (E minor). Unknown roots return None.
pub fn chord_triad(root: &str) -> Option<[&'static str; 3]> {
    match root {
        "C3" => Some(["C4", "E4", "G4"]),
        "G3" => Some(["G4", "B4", "D5"]),
        "A3" => Some(["A4", "C5", "E5"]),
        "F3" => Some(["F4", "A4", "C5"]),
        "E3" => Some(["E3", "G3", "B3"]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_frequencies() {
        assert_eq!(note_frequency("A4"), Some(440.00));
        assert_eq!(note_frequency("C4"), Some(261.63));
        assert_eq!(note_frequency("C3"), Some(130.81));
        assert_eq!(note_frequency("E5"), Some(659.25));
    }

    #[test]
    fn test_unknown_symbols_resolve_to_none() {
        assert_eq!(note_frequency("H9"), None);
        assert_eq!(note_frequency("kick"), None);
        assert_eq!(note_frequency(""), None);
        assert_eq!(chord_triad("B3"), None);
    }

    #[test]
    fn test_scale_notes_have_frequencies() {
        for note in SCALE {
            assert!(
                note_frequency(note).is_some(),
                "scale note {} missing from the pitch table",
                note
            );
        }
    }

    #[test]
    fn test_triads_are_fully_resolvable() {
        for prog in PROGRESSIONS {
            for root in prog {
                let triad = chord_triad(root)
                    .unwrap_or_else(|| panic!("progression root {} has no triad", root));
                assert!(note_frequency(root).is_some());
                for note in triad {
                    assert!(
                        note_frequency(note).is_some(),
                        "triad tone {} of {} missing from the pitch table",
                        note,
                        root
                    );
                }
            }
        }
    }

    #[test]
    fn test_triads_ascend_within_themselves() {
        // Each triad is stored root-position: tones in ascending frequency.
        for root in ["C3", "G3", "A3", "F3", "E3"] {
            let triad = chord_triad(root).unwrap();
            let freqs: Vec<f64> = triad.iter().map(|n| note_frequency(n).unwrap()).collect();
            assert!(freqs[0] < freqs[1] && freqs[1] < freqs[2]);
        }
    }
}
