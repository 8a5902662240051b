use rand::{rngs::ThreadRng, Rng};

/// Source of the random choices made by the meal planner.
pub trait Selector {
    /// Returns an index in `0..len`. Never called with `len == 0`.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform choice backed by any `rand` generator.
pub struct RngSelector<R>(R);

impl<R: Rng> RngSelector<R> {
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl RngSelector<ThreadRng> {
    pub fn thread_local() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl<R: Rng> Selector for RngSelector<R> {
    fn pick(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn rng_selector_stays_in_range() {
        let mut sel = RngSelector::new(StdRng::seed_from_u64(7));
        for len in 1..50 {
            assert!(sel.pick(len) < len);
        }
    }

    #[test]
    fn seeded_selectors_repeat() {
        let mut a = RngSelector::new(StdRng::seed_from_u64(42));
        let mut b = RngSelector::new(StdRng::seed_from_u64(42));
        let xs: Vec<usize> = (0..20).map(|_| a.pick(10)).collect();
        let ys: Vec<usize> = (0..20).map(|_| b.pick(10)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn scripted_selector_wraps_and_repeats() {
        let mut sel = testing::ScriptedSelector::new(vec![1, 5]);
        assert_eq!(sel.pick(3), 1);
        assert_eq!(sel.pick(3), 2);
        assert_eq!(sel.pick(4), 1);
        assert_eq!(sel.calls, vec![3, 3, 4]);
    }
}
