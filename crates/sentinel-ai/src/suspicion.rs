//! Bounded suspicion accumulator.
//!
//! Visual contact raises suspicion, absence lets it drain. The two rates are
//! independent, so a guard can be quick to grow wary and slow to forget.

use serde::{Deserialize, Serialize};

/// Suspicion level clamped to `[0, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Suspicion {
    value: f32,
    max: f32,
}

impl Suspicion {
    /// Creates an empty accumulator.
    ///
    /// A non-positive or non-finite `max` is replaced by the smallest
    /// positive value so the accumulator stays usable.
    #[must_use]
    pub fn new(max: f32) -> Self {
        let max = if max.is_finite() && max > 0.0 {
            max
        } else {
            f32::MIN_POSITIVE
        };
        Self { value: 0.0, max }
    }

    /// Raises suspicion by `rate * dt`, saturating at the maximum.
    pub fn increase(&mut self, rate: f32, dt: f32) {
        self.value = (self.value + Self::step(rate, dt)).min(self.max);
    }

    /// Lowers suspicion by `rate * dt`, saturating at zero.
    pub fn decay(&mut self, rate: f32, dt: f32) {
        self.value = (self.value - Self::step(rate, dt)).max(0.0);
    }

    /// Whether the maximum has been reached.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.value >= self.max
    }

    /// Whether suspicion has drained completely.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value <= 0.0
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Current value as a fraction of the maximum, in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        (self.value / self.max).clamp(0.0, 1.0)
    }

    /// Clears suspicion.
    pub fn reset(&mut self) {
        self.value = 0.0;
    }

    // Negative and NaN steps would reverse the direction of the call.
    fn step(rate: f32, dt: f32) -> f32 {
        let step = rate * dt;
        if step.is_nan() {
            0.0
        } else {
            step.max(0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_increase_saturates() {
        let mut s = Suspicion::new(5.0);
        s.increase(1.0, 3.0);
        assert!((s.value() - 3.0).abs() < 1e-6);
        assert!(!s.is_full());
        s.increase(1.0, 3.0);
        assert!(s.is_full());
        assert_eq!(s.value(), 5.0);
        assert_eq!(s.fraction(), 1.0);
    }

    #[test]
    fn test_decay_saturates() {
        let mut s = Suspicion::new(5.0);
        s.increase(2.0, 1.0);
        s.decay(0.5, 2.0);
        assert!((s.value() - 1.0).abs() < 1e-6);
        s.decay(0.5, 10.0);
        assert!(s.is_empty());
        assert_eq!(s.value(), 0.0);
    }

    #[test]
    fn test_asymmetric_rates() {
        let mut s = Suspicion::new(10.0);
        s.increase(4.0, 1.0);
        s.decay(1.0, 1.0);
        assert!((s.value() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_steps_do_nothing() {
        let mut s = Suspicion::new(5.0);
        s.increase(1.0, 2.0);
        s.increase(-1.0, 1.0);
        s.decay(1.0, -1.0);
        s.increase(f32::NAN, 1.0);
        s.decay(f32::NAN, 1.0);
        assert!((s.value() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_max() {
        let mut s = Suspicion::new(0.0);
        assert!(s.max() > 0.0);
        s.increase(1.0, 1.0);
        assert!(s.is_full());
        assert_eq!(s.fraction(), 1.0);
        assert!(Suspicion::new(f32::NAN).max() > 0.0);
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Increase(f32, f32),
        Decay(f32, f32),
    }

    fn magnitude() -> impl Strategy<Value = f32> {
        prop_oneof![
            -100.0f32..100.0,
            Just(0.0f32),
            Just(f32::INFINITY),
            Just(f32::NAN),
        ]
    }

    fn op() -> impl Strategy<Value = Op> {
        (any::<bool>(), magnitude(), magnitude()).prop_map(|(up, rate, dt)| {
            if up {
                Op::Increase(rate, dt)
            } else {
                Op::Decay(rate, dt)
            }
        })
    }

    proptest! {
        #[test]
        fn prop_suspicion_stays_in_bounds(
            max in 0.01f32..1000.0,
            ops in prop::collection::vec(op(), 0..64),
        ) {
            let mut s = Suspicion::new(max);
            for op in ops {
                match op {
                    Op::Increase(rate, dt) => s.increase(rate, dt),
                    Op::Decay(rate, dt) => s.decay(rate, dt),
                }
                prop_assert!(s.value() >= 0.0);
                prop_assert!(s.value() <= s.max());
                prop_assert!((0.0..=1.0).contains(&s.fraction()));
            }
        }
    }
}
