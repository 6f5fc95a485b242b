// Cumulative distribution functions used to turn a z-score into a win
// probability.

use statrs::function::erf::erfc;
use std::f64::consts::SQRT_2;

/// A cumulative distribution function over a standardized difference.
pub trait Cdf {
    fn cdf(&self, z: f64) -> f64;

    /// Upper tail `1 - cdf(z)`.
    fn sf(&self, z: f64) -> f64 {
        1.0 - self.cdf(z)
    }
}

/// Standard normal Φ(z) as `erfc(-z / √2) / 2`. The upper tail is taken
/// from `erfc` directly rather than by subtraction, so far tails do not
/// round to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardNormal;

impl Cdf for StandardNormal {
    fn cdf(&self, z: f64) -> f64 {
        0.5 * erfc(-z / SQRT_2)
    }

    fn sf(&self, z: f64) -> f64 {
        0.5 * erfc(z / SQRT_2)
    }
}

/// Any `Fn(f64) -> f64` can stand in for a distribution.
impl<F> Cdf for F
where
    F: Fn(f64) -> f64,
{
    fn cdf(&self, z: f64) -> f64 {
        self(z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn standard_normal_known_values() {
        let phi = StandardNormal;
        assert!(approx_eq(phi.cdf(0.0), 0.5, 1e-12));
        assert!(approx_eq(phi.cdf(1.0), 0.841_344_746, 1e-8));
        assert!(approx_eq(phi.cdf(-1.5), 0.066_807_201, 1e-8));
        assert!(approx_eq(phi.cdf(1.96), 0.975_002_105, 1e-8));
    }

    #[test]
    fn standard_normal_is_symmetric() {
        let phi = StandardNormal;
        for z in [0.1, 0.75, 2.0, 3.3] {
            assert!(approx_eq(phi.cdf(z) + phi.cdf(-z), 1.0, 1e-12));
        }
    }

    #[test]
    fn standard_normal_infinite_tails() {
        let phi = StandardNormal;
        assert!(approx_eq(phi.cdf(f64::INFINITY), 1.0, 1e-15));
        assert!(approx_eq(phi.cdf(f64::NEG_INFINITY), 0.0, 1e-15));
        assert!(phi.cdf(f64::NAN).is_nan());
    }

    #[test]
    fn closures_are_distributions() {
        let logistic = |z: f64| 1.0 / (1.0 + (-z).exp());
        assert!(approx_eq(logistic.cdf(0.0), 0.5, 1e-12));
        assert!(approx_eq(logistic.sf(0.0), 0.5, 1e-12));
    }

    #[test]
    fn standard_normal_upper_tail() {
        let phi = StandardNormal;
        for z in [-2.0, 0.0, 0.5, 1.5] {
            assert!(approx_eq(phi.sf(z), 1.0 - phi.cdf(z), 1e-14));
        }
        // 1 - Φ(10) rounds to 0 by subtraction
        let tail = phi.sf(10.0);
        assert!(tail > 0.0);
        assert!(approx_eq(tail / 7.619_853_024e-24, 1.0, 1e-8));
    }
}
