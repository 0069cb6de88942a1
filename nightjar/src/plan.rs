// Plan selection: tempo, chord progression, and motif for one run.
//
// A plan is drawn once per generation and is immutable afterwards. All five
// layer generators read the same plan, which is the only coupling between
// them. Pure random draws, no error paths.

use rand::Rng;

use crate::config::SketchConfig;

/// Number of motif notes drawn per plan.
const MOTIF_LEN: usize = 3;

/// The harmonic/rhythmic skeleton shared by every layer generator.
#[derive(Debug, Clone, PartialEq)]
pub struct SketchPlan {
    /// Tempo in beats per minute.
    pub bpm: u32,
    /// Cyclic sequence of chord roots.
    pub progression: Vec<String>,
    /// Short note sequence the melody recurs to for coherence.
    pub motif: Vec<String>,
}

/// Draw a plan from the configured material.
///
/// The bpm is uniform over the inclusive range, the progression uniform over
/// the catalog, and the motif is three independent scale draws (repeats
/// allowed). Assumes the config has already been validated.
pub fn choose_plan(config: &SketchConfig, rng: &mut impl Rng) -> SketchPlan {
    let (min_bpm, max_bpm) = config.bpm_range;
    let bpm = rng.random_range(min_bpm..=max_bpm);

    let catalog = &config.progression_catalog;
    let progression = catalog[rng.random_range(0..catalog.len())].clone();

    let motif = (0..MOTIF_LEN)
        .map(|_| config.scale[rng.random_range(0..config.scale.len())].clone())
        .collect();

    SketchPlan {
        bpm,
        progression,
        motif,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_plan_stays_within_material() {
        let config = SketchConfig::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let plan = choose_plan(&config, &mut rng);
            assert!(plan.bpm >= 110 && plan.bpm <= 140);
            assert!(config.progression_catalog.contains(&plan.progression));
            assert_eq!(plan.motif.len(), 3);
            for note in &plan.motif {
                assert!(config.scale.contains(note), "motif note {} not in scale", note);
            }
        }
    }

    #[test]
    fn test_same_seed_same_plan() {
        let config = SketchConfig::default();
        let plan_a = choose_plan(&config, &mut StdRng::seed_from_u64(42));
        let plan_b = choose_plan(&config, &mut StdRng::seed_from_u64(42));
        assert_eq!(plan_a, plan_b);
    }

    #[test]
    fn test_degenerate_bpm_range() {
        let mut config = SketchConfig::default();
        config.bpm_range = (120, 120);
        let plan = choose_plan(&config, &mut StdRng::seed_from_u64(1));
        assert_eq!(plan.bpm, 120);
    }
}
