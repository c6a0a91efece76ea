use eyre::{ensure, Result};

/// Prefix sums of log2 values: `log2(n!)` for every `n` in `0..=max_n`.
///
/// Used to evaluate log2 binomial coefficients in O(1) when normalizing precomputed connector
/// scores. A table must cover the effective length (sequence length minus total recognizers
/// width) of every sequence it is used with.
#[derive(Clone, PartialEq, Debug)]
pub struct Log2Table {
    factorials: Vec<f64>,
}

impl Log2Table {
    pub fn new(max_n: usize) -> Self {
        let mut factorials = Vec::with_capacity(max_n + 1);
        let mut acc = 0.0_f64;
        factorials.push(acc);
        for n in 1..=max_n {
            acc += (n as f64).log2();
            factorials.push(acc);
        }
        Self { factorials }
    }

    /// Build from a host-provided cumulative table where `sums[i] = log2((i + 1)!)`,
    /// i.e. the running sum of `log2(1), log2(2), ...`.
    pub fn from_prefix_sums(sums: &[f64]) -> Result<Self> {
        ensure!(
            sums.iter().all(|x| x.is_finite()),
            "Log2 prefix sums must be finite"
        );
        ensure!(
            sums.windows(2).all(|x| x[0] <= x[1]),
            "Log2 prefix sums must be non-decreasing"
        );
        ensure!(
            sums.first().map_or(true, |x| *x == 0.0),
            "Log2 prefix sums must start with log2(1!) = 0"
        );

        let mut factorials = Vec::with_capacity(sums.len() + 1);
        factorials.push(0.0);
        factorials.extend_from_slice(sums);
        Ok(Self { factorials })
    }

    /// The largest `n` covered by the table
    pub fn max_n(&self) -> usize {
        self.factorials.len() - 1
    }

    pub fn covers(&self, n: usize) -> bool {
        n <= self.max_n()
    }

    pub fn ensure_covers(&self, n: usize) -> Result<()> {
        ensure!(
            self.covers(n),
            "Log2 normalization table covers n <= {}, but n = {n} is required",
            self.max_n()
        );
        Ok(())
    }

    #[inline(always)]
    pub fn log2_factorial(&self, n: usize) -> f64 {
        self.factorials[n]
    }

    /// log2 C(n, k); negative infinity when k > n. Requires `n <= max_n()`.
    #[inline(always)]
    pub fn log2_binomial(&self, n: usize, k: usize) -> f64 {
        if k > n {
            return f64::NEG_INFINITY;
        }
        self.factorials[n] - self.factorials[k] - self.factorials[n - k]
    }
}
