//! Sampling of the final victim set from a filtered entity pool.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use faultline_model::{Entity, SelectionMode};

use crate::error::SelectError;

/// Applies a [`SelectionMode`] to a filtered entity pool.
///
/// The random source is owned by the sampler and constructed explicitly, so
/// concurrent selections use independent generators and tests can seed a
/// deterministic one.
pub struct Sampler<R: Rng = StdRng> {
    rng: R,
}

impl Sampler<StdRng> {
    /// Sampler backed by an entropy-seeded generator.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sampler for tests and reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for Sampler<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Sampler<R> {
    /// Sampler backed by a caller-supplied generator.
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Draw the final target list from `entities` according to `mode`.
    ///
    /// `value` carries the mode's numeric argument as a string; `One` and
    /// `All` ignore it. Fails with [`SelectError::EmptyPool`] on an empty
    /// pool before the mode is examined.
    pub fn sample(
        &mut self,
        mut entities: Vec<Entity>,
        mode: SelectionMode,
        value: &str,
    ) -> Result<Vec<Entity>, SelectError> {
        if entities.is_empty() {
            return Err(SelectError::EmptyPool);
        }

        let len = entities.len();
        let count = match mode {
            SelectionMode::One => {
                let index = self.rng.gen_range(0..len);
                return Ok(vec![entities.swap_remove(index)]);
            }
            SelectionMode::All => return Ok(entities),
            SelectionMode::Fixed => {
                let num = parse_value(value)?;
                let num = num.min(len as i64);
                if num <= 0 {
                    return Err(SelectError::Value(
                        "cannot select any entity as the value is below or equal to 0".to_string(),
                    ));
                }
                num as usize
            }
            SelectionMode::FixedPercent => {
                let percentage = parse_percentage(value, "(0, 100]")?;
                len * percentage as usize / 100
            }
            SelectionMode::RandomMaxPercent => {
                let max_percentage = parse_percentage(value, "[0, 100]")?;
                // gen_range works on a half-open interval; +1 makes the
                // configured maximum itself reachable
                let percentage = self.rng.gen_range(0..max_percentage + 1);
                len * percentage as usize / 100
            }
        };

        let indexes = self.sample_indexes(0, len, count);
        Ok(indexes.into_iter().map(|i| entities[i].clone()).collect())
    }

    /// Draw `count` distinct indexes from the half-open range `[start, end)`.
    ///
    /// Rules, in order: `end < start` yields an empty list; `count` at least
    /// the range size yields every index in ascending order; otherwise
    /// indexes are drawn uniformly with rejection on repeats and returned in
    /// the order drawn.
    pub fn sample_indexes(&mut self, start: usize, end: usize, count: usize) -> Vec<usize> {
        if end < start {
            return Vec::new();
        }

        if count >= end - start {
            return (start..end).collect();
        }

        let mut indexes = Vec::with_capacity(count);
        let mut seen = HashSet::with_capacity(count);
        while indexes.len() < count {
            let index = self.rng.gen_range(start..end);
            if seen.insert(index) {
                indexes.push(index);
            }
        }

        indexes
    }
}

fn parse_value(value: &str) -> Result<i64, SelectError> {
    value
        .parse::<i64>()
        .map_err(|_| SelectError::Value(format!("{value:?} is not an integer")))
}

fn parse_percentage(value: &str, range: &str) -> Result<i64, SelectError> {
    let percentage = parse_value(value)?;

    if percentage == 0 {
        return Err(SelectError::Value(
            "cannot select any entity as the value is below or equal to 0".to_string(),
        ));
    }
    if !(0..=100).contains(&percentage) {
        return Err(SelectError::Value(format!(
            "percentage value {percentage} is invalid, must be in {range}"
        )));
    }

    Ok(percentage)
}

#[cfg(test)]
mod tests {
    use super::Sampler;
    use crate::error::SelectError;
    use faultline_model::{Entity, SelectionMode};

    fn pool(n: usize) -> Vec<Entity> {
        (0..n)
            .map(|i| Entity::new("default", format!("web-{i}")))
            .collect()
    }

    #[test]
    fn indexes_are_distinct_and_in_range() {
        let mut sampler = Sampler::with_seed(7);
        for n in [1usize, 5, 10, 32] {
            for k in 0..=n {
                let indexes = sampler.sample_indexes(0, n, k);
                assert_eq!(indexes.len(), k, "n={n} k={k}");

                let mut sorted = indexes.clone();
                sorted.sort_unstable();
                sorted.dedup();
                assert_eq!(sorted.len(), k, "duplicates for n={n} k={k}");
                assert!(indexes.iter().all(|&i| i < n));
            }
        }
    }

    #[test]
    fn count_at_least_range_returns_ascending_range() {
        let mut sampler = Sampler::with_seed(7);
        assert_eq!(sampler.sample_indexes(0, 4, 4), vec![0, 1, 2, 3]);
        assert_eq!(sampler.sample_indexes(0, 4, 9), vec![0, 1, 2, 3]);
        assert_eq!(sampler.sample_indexes(2, 5, 3), vec![2, 3, 4]);
    }

    #[test]
    fn inverted_range_is_empty() {
        let mut sampler = Sampler::with_seed(7);
        assert!(sampler.sample_indexes(5, 2, 0).is_empty());
        assert!(sampler.sample_indexes(5, 2, 3).is_empty());
    }

    #[test]
    fn empty_range_is_empty() {
        let mut sampler = Sampler::with_seed(7);
        assert!(sampler.sample_indexes(3, 3, 0).is_empty());
    }

    #[test]
    fn empty_pool_fails_before_mode_is_examined() {
        let mut sampler = Sampler::with_seed(7);
        let res = sampler.sample(Vec::new(), SelectionMode::All, "");
        assert!(matches!(res, Err(SelectError::EmptyPool)));
    }

    #[test]
    fn mode_one_picks_a_single_entity() {
        let mut sampler = Sampler::with_seed(7);
        let picked = sampler.sample(pool(5), SelectionMode::One, "").unwrap();
        assert_eq!(picked.len(), 1);
    }

    #[test]
    fn mode_all_returns_the_whole_pool() {
        let mut sampler = Sampler::with_seed(7);
        let picked = sampler.sample(pool(5), SelectionMode::All, "").unwrap();
        assert_eq!(picked.len(), 5);
    }

    #[test]
    fn fixed_caps_at_pool_size() {
        let mut sampler = Sampler::with_seed(7);
        let picked = sampler.sample(pool(5), SelectionMode::Fixed, "9").unwrap();
        assert_eq!(picked.len(), 5);

        let picked = sampler.sample(pool(5), SelectionMode::Fixed, "2").unwrap();
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn fixed_rejects_non_integer_and_non_positive_values() {
        let mut sampler = Sampler::with_seed(7);
        for value in ["abc", "0", "-3"] {
            let res = sampler.sample(pool(5), SelectionMode::Fixed, value);
            assert!(matches!(res, Err(SelectError::Value(_))), "value={value}");
        }
    }

    #[test]
    fn fixed_percent_takes_the_floored_share() {
        let mut sampler = Sampler::with_seed(7);
        let picked = sampler
            .sample(pool(7), SelectionMode::FixedPercent, "100")
            .unwrap();
        assert_eq!(picked.len(), 7);

        let picked = sampler
            .sample(pool(7), SelectionMode::FixedPercent, "50")
            .unwrap();
        assert_eq!(picked.len(), 3);
    }

    #[test]
    fn fixed_percent_may_floor_to_zero_targets() {
        let mut sampler = Sampler::with_seed(7);
        let picked = sampler
            .sample(pool(3), SelectionMode::FixedPercent, "10")
            .unwrap();
        assert!(picked.is_empty());
    }

    #[test]
    fn fixed_percent_rejects_zero_and_out_of_range_values() {
        let mut sampler = Sampler::with_seed(7);
        for value in ["0", "-5", "101"] {
            let res = sampler.sample(pool(7), SelectionMode::FixedPercent, value);
            assert!(matches!(res, Err(SelectError::Value(_))), "value={value}");
        }
    }

    #[test]
    fn random_max_percent_rejects_zero_and_out_of_range_values() {
        let mut sampler = Sampler::with_seed(7);
        for value in ["0", "-5", "101", "abc"] {
            let res = sampler.sample(pool(10), SelectionMode::RandomMaxPercent, value);
            assert!(matches!(res, Err(SelectError::Value(_))), "value={value}");
        }
    }

    #[test]
    fn random_max_percent_count_stays_within_pool() {
        let mut sampler = Sampler::with_seed(7);
        for _ in 0..50 {
            let picked = sampler
                .sample(pool(10), SelectionMode::RandomMaxPercent, "100")
                .unwrap();
            assert!(picked.len() <= 10);
        }
    }

    #[test]
    fn sampled_entities_are_distinct() {
        let mut sampler = Sampler::with_seed(7);
        let picked = sampler.sample(pool(10), SelectionMode::Fixed, "6").unwrap();
        let mut names: Vec<_> = picked.iter().map(|e| e.name.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn seeded_samplers_are_reproducible() {
        let mut a = Sampler::with_seed(42);
        let mut b = Sampler::with_seed(42);
        assert_eq!(a.sample_indexes(0, 100, 10), b.sample_indexes(0, 100, 10));
    }
}
