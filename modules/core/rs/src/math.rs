//! Numeric primitives behind the spacer (gap) scoring model.

use std::f64::consts::SQRT_2;

#[inline(always)]
pub fn min_of<T: Ord>(a: T, b: T) -> T {
    if a > b { b } else { a }
}

/// Binomial coefficient C(n, k) computed with the multiplicative recurrence.
///
/// Each step splits `c * n / i` into `(c / i * i + c % i) * n / i` to keep intermediate values
/// small. Returns 0 if the next multiplication would overflow, i.e. the coefficient is not
/// representable. By construction, C(n, k) = 0 for k > n.
pub fn binomial(mut n: u64, k: u64) -> u64 {
    // C(n, k) = C(n, n - k), the shorter recurrence has smaller intermediate values
    let k = if k <= n { min_of(k, n - k) } else { k };

    let mut c: u64 = 1;
    for i in 1..=k {
        if n == 0 || c / i > u64::MAX / n {
            return 0;
        }
        c = match (c / i * n).checked_add(c % i * n / i) {
            Some(next) => next,
            None => return 0,
        };
        n -= 1;
    }
    c
}

/// log2 C(n, k) accumulated term by term. Unlike [`binomial`], never overflows.
pub fn log2_binomial(n: u64, k: u64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    let k = min_of(k, n - k);
    (1..=k)
        .map(|i| ((n - k + i) as f64).log2() - (i as f64).log2())
        .sum()
}

/// Error function, Abramowitz & Stegun 7.1.26 (|error| < 1.5e-7).
pub fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + 0.3275911 * x);
    let poly = t
        * (0.254829592
            + t * (-0.284496736 + t * (1.421413741 + t * (-1.453152027 + t * 1.061405429))));
    sign * (1.0 - poly * (-x * x).exp())
}

/// Gaussian CDF. `sigma` must be non-zero, its sign is ignored.
pub fn normal_cdf(x: f64, mu: f64, sigma: f64) -> f64 {
    debug_assert!(sigma != 0.0);
    let z = (x - mu) / sigma.abs();
    (1.0 + erf(z / SQRT_2)) / 2.0
}

/// Probability mass of the Gaussian discretized at `x`, i.e. the integral over [x - 0.5, x + 0.5].
/// A zero `sigma` collapses the distribution into a point mass at `mu`.
pub fn normal_point_mass(x: f64, mu: f64, sigma: f64) -> f64 {
    if sigma != 0.0 {
        return normal_cdf(x + 0.5, mu, sigma) - normal_cdf(x - 0.5, mu, sigma);
    }
    if x == mu { 1.0 } else { 0.0 }
}
