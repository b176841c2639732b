//! Weighted random choice of the next word to quiz.
//!
//! A category is drawn from a discrete distribution over the four
//! partitions, with empty partitions weighted zero and the rest
//! renormalized. A word is then drawn uniformly from that partition.

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::category::{Category, Partitions};
use crate::error::{Result, VocabError};

/// Base selection weights, in `new, learning, reviewing, mastered` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryWeights(pub [f64; 4]);

impl Default for CategoryWeights {
    fn default() -> Self {
        Self([0.2, 0.35, 0.35, 0.1])
    }
}

impl CategoryWeights {
    pub fn get(&self, category: Category) -> f64 {
        self.0[category.index()]
    }

    /// Check that every weight is finite and non-negative and that they
    /// do not all vanish.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(w) = self.0.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(format!("weights must be finite and non-negative, got {w}"));
        }
        if self.0.iter().sum::<f64>() <= 0.0 {
            return Err("weights must not all be zero".to_string());
        }
        Ok(())
    }

    /// Weights with empty partitions zeroed and the remainder summing to 1.
    ///
    /// Fails with [`VocabError::NoWordsAvailable`] when nothing is left.
    pub fn effective(&self, partitions: &Partitions) -> Result<[f64; 4]> {
        let mut weights = [0.0; 4];
        for category in Category::ALL {
            if partitions.count(category) > 0 {
                weights[category.index()] = self.get(category).max(0.0);
            }
        }
        let sum: f64 = weights.iter().sum();
        if sum <= 0.0 || !sum.is_finite() {
            return Err(VocabError::NoWordsAvailable);
        }
        for w in &mut weights {
            *w /= sum;
        }
        Ok(weights)
    }
}

/// Draw one category according to the effective weights.
pub fn select_category<R: Rng + ?Sized>(
    partitions: &Partitions,
    weights: &CategoryWeights,
    rng: &mut R,
) -> Result<Category> {
    let effective = weights.effective(partitions)?;
    let dist = WeightedIndex::new(effective).map_err(|_| VocabError::NoWordsAvailable)?;
    Ok(Category::ALL[dist.sample(rng)])
}

/// Pick the next word to quiz. Never returns a word from an empty partition.
pub fn select<'a, R: Rng + ?Sized>(
    partitions: &'a Partitions,
    weights: &CategoryWeights,
    rng: &mut R,
) -> Result<&'a str> {
    let category = select_category(partitions, weights, rng)?;
    let word = partitions
        .get(category)
        .choose(rng)
        .ok_or(VocabError::NoWordsAvailable)?;
    tracing::debug!(%category, word = %word, "selected word");
    Ok(word.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn all_empty_fails() {
        let parts = Partitions::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let err = select(&parts, &CategoryWeights::default(), &mut rng).unwrap_err();
        assert!(matches!(err, VocabError::NoWordsAvailable));
    }

    #[test]
    fn effective_weights_renormalize() {
        let parts = Partitions::from_parts(words(&["a"]), vec![], words(&["b"]), vec![]);
        let w = CategoryWeights::default().effective(&parts).unwrap();
        assert_eq!(w[1], 0.0);
        assert_eq!(w[3], 0.0);
        assert!((w[0] - 0.2 / 0.55).abs() < 1e-12);
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_partition_always_wins() {
        let parts = Partitions::from_parts(vec![], vec![], vec![], words(&["abate", "zealous"]));
        // Heavily skewed weights away from mastered still have to land there.
        let weights = CategoryWeights([0.9, 0.05, 0.04, 0.01]);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..200 {
            let word = select(&parts, &weights, &mut rng).unwrap();
            assert!(word == "abate" || word == "zealous");
        }
    }

    #[test]
    fn never_picks_from_empty_partition() {
        let parts = Partitions::from_parts(words(&["n1", "n2"]), vec![], words(&["r1"]), vec![]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..500 {
            let category =
                select_category(&parts, &CategoryWeights::default(), &mut rng).unwrap();
            assert!(matches!(category, Category::New | Category::Reviewing));
        }
    }

    #[test]
    fn zero_weight_on_only_nonempty_partition_fails() {
        let parts = Partitions::from_parts(vec![], vec![], vec![], words(&["abate"]));
        let weights = CategoryWeights([0.5, 0.5, 0.0, 0.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(matches!(
            select(&parts, &weights, &mut rng),
            Err(VocabError::NoWordsAvailable)
        ));
    }

    #[test]
    fn seeded_selection_is_reproducible() {
        let parts = Partitions::from_parts(
            words(&["a", "b", "c"]),
            words(&["d", "e"]),
            words(&["f"]),
            words(&["g", "h"]),
        );
        let draw = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..20)
                .map(|_| select(&parts, &CategoryWeights::default(), &mut rng).unwrap().to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(99), draw(99));
    }

    #[test]
    fn frequencies_track_weights() {
        let parts = Partitions::from_parts(words(&["n"]), words(&["l"]), words(&["r"]), words(&["m"]));
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let mut counts = [0usize; 4];
        let draws = 20_000;
        for _ in 0..draws {
            let c = select_category(&parts, &CategoryWeights::default(), &mut rng).unwrap();
            counts[c.index()] += 1;
        }
        let mastered = counts[3] as f64 / draws as f64;
        let learning = counts[1] as f64 / draws as f64;
        assert!((mastered - 0.1).abs() < 0.02, "mastered share {mastered}");
        assert!((learning - 0.35).abs() < 0.02, "learning share {learning}");
    }

    #[test]
    fn does_not_mutate_partitions() {
        let parts = Partitions::from_parts(words(&["a", "b"]), words(&["c"]), vec![], vec![]);
        let before = parts.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..10 {
            select(&parts, &CategoryWeights::default(), &mut rng).unwrap();
        }
        assert_eq!(parts, before);
    }

    #[test]
    fn validate_weights() {
        assert!(CategoryWeights::default().validate().is_ok());
        assert!(CategoryWeights([0.0; 4]).validate().is_err());
        assert!(CategoryWeights([-0.1, 0.5, 0.5, 0.1]).validate().is_err());
        assert!(CategoryWeights([f64::NAN, 0.5, 0.5, 0.1]).validate().is_err());
    }
}
