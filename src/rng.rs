use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
enum Source {
    Seeded(StdRng),
    Scripted { outcomes: Vec<f64>, index: usize },
}

/// The single random source of a game session.
///
/// Seeded once at startup and handed by `&mut` to whatever needs a draw
/// (enemy team rolls, dodge rolls, AI choices). Tests replace it with a
/// scripted sequence of unit draws so every outcome is reproducible.
#[derive(Debug, Clone)]
pub struct GameRng {
    source: Source,
}

impl GameRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: Source::Seeded(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            source: Source::Seeded(StdRng::from_os_rng()),
        }
    }

    /// Replays the given draws in order. Each value must lie in `[0, 1)`.
    pub fn new_for_test(outcomes: Vec<f64>) -> Self {
        Self {
            source: Source::Scripted { outcomes, index: 0 },
        }
    }

    /// Uniform draw from `[0, 1)`.
    pub fn next_unit(&mut self, reason: &str) -> f64 {
        let value = match &mut self.source {
            Source::Seeded(rng) => rng.random::<f64>(),
            Source::Scripted { outcomes, index } => {
                if *index >= outcomes.len() {
                    panic!(
                        "GameRng exhausted! Tried to get a value for: '{}'. Need more scripted values.",
                        reason
                    );
                }
                let outcome = outcomes[*index];
                *index += 1;
                outcome
            }
        };
        tracing::trace!(value, reason, "rng draw");
        value
    }

    /// Uniform index into a collection of `len` elements. `len` must be non-zero.
    pub fn next_index(&mut self, len: usize, reason: &str) -> usize {
        assert!(len > 0, "next_index called with an empty range for: '{}'", reason);
        if let Source::Seeded(rng) = &mut self.source {
            let index = rng.random_range(0..len);
            tracing::trace!(index, len, reason, "rng index");
            return index;
        }
        let unit = self.next_unit(reason);
        ((unit * len as f64) as usize).min(len - 1)
    }
}
