// Random image selection — shuffles a copy of the list and keeps a prefix.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::manifest::ImageList;

/// Number of entries kept from a shuffled list of `len` entries.
///
/// The rule is `max(count, len - 1)`, capped at `len`: a small `count`
/// against a large list keeps all but one entry.
pub fn sample_len(len: usize, count: usize) -> usize {
    count.max(len.saturating_sub(1)).min(len)
}

/// Shuffle a copy of `items` uniformly with `rng` and keep `sample_len` entries.
pub fn randomize_with<T: Clone, R: Rng + ?Sized>(items: &[T], count: usize, rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(sample_len(items.len(), count));
    shuffled
}

/// Shuffle with the thread-local RNG.
pub fn randomize(images: &ImageList, count: usize) -> ImageList {
    randomize_with(images, count, &mut rand::rng())
}

/// Sampler owning its RNG, so a seeded instance gives reproducible runs.
pub struct Sampler {
    rng: Mutex<StdRng>,
}

impl Sampler {
    /// Sampler seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn randomize(&self, images: &ImageList, count: usize) -> ImageList {
        let sample = randomize_with(images, count, &mut *self.rng.lock());
        debug!(
            "sampled {} of {} images (requested {})",
            sample.len(),
            images.len(),
            count
        );
        sample
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::manifest::ImageRef;

    fn images(n: usize) -> ImageList {
        (0..n)
            .map(|i| ImageRef {
                source_uri: format!("https://example.org/img/{i}.jpg"),
                filename: format!("{i}.jpeg"),
            })
            .collect()
    }

    #[test]
    fn test_sample_len_rule() {
        assert_eq!(sample_len(5, 10), 5);
        assert_eq!(sample_len(100, 3), 99);
        assert_eq!(sample_len(3, 2), 2);
        assert_eq!(sample_len(3, 3), 3);
        assert_eq!(sample_len(1, 0), 0);
        assert_eq!(sample_len(0, 10), 0);
        assert_eq!(sample_len(0, 0), 0);
    }

    #[test]
    fn test_output_is_subset_without_duplicates() {
        let sampler = Sampler::seeded(7);
        for len in 0..12 {
            let input = images(len);
            let all: HashSet<_> = input.iter().cloned().collect();
            for count in 0..15 {
                let out = sampler.randomize(&input, count);
                assert_eq!(out.len(), sample_len(len, count));
                let unique: HashSet<_> = out.iter().cloned().collect();
                assert_eq!(unique.len(), out.len());
                assert!(unique.is_subset(&all));
            }
        }
    }

    #[test]
    fn test_input_untouched() {
        let input = images(20);
        let before = input.clone();
        let _ = randomize(&input, 3);
        assert_eq!(input, before);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let input = images(30);
        let a = Sampler::seeded(42).randomize(&input, 4);
        let b = Sampler::seeded(42).randomize(&input, 4);
        assert_eq!(a, b);
    }

    #[test]
    fn test_selection_frequency_uniform() {
        // 4 items, count 0 -> 3 kept: each item should be kept ~75% of the time.
        let input: Vec<usize> = (0..4).collect();
        let mut rng = StdRng::seed_from_u64(1234);
        let trials = 20_000;
        let mut hits = [0usize; 4];
        for _ in 0..trials {
            for item in randomize_with(&input, 0, &mut rng) {
                hits[item] += 1;
            }
        }
        for h in hits {
            let freq = h as f64 / trials as f64;
            assert!((freq - 0.75).abs() < 0.02, "frequency {freq} out of range");
        }
    }

    #[test]
    fn test_first_position_uniform() {
        let input: Vec<usize> = (0..5).collect();
        let mut rng = StdRng::seed_from_u64(99);
        let trials = 25_000;
        let mut firsts = [0usize; 5];
        for _ in 0..trials {
            firsts[randomize_with(&input, 5, &mut rng)[0]] += 1;
        }
        for f in firsts {
            let freq = f as f64 / trials as f64;
            assert!((freq - 0.2).abs() < 0.02, "frequency {freq} out of range");
        }
    }
}
