use derive_getters::Getters;
use eyre::{ensure, eyre, Result};

use multiplacement_core_rs::math;
use multiplacement_core_rs::num::{cast, Float};

use crate::geometry::Geometry;
use crate::normalization::Log2Table;
use crate::organism::Connector;

/// Spacer scoring function: the log-odds contribution of placing `gap` positions between the
/// recognizers joined by the connector `connector`.
///
/// Must be defined for every gap in `[0, num_alignments)`. Scores are finite, except for negative
/// infinity marking gap lengths the connector forbids.
pub trait Scorer {
    type Score: Float;

    fn score(&self, connector: usize, gap: usize) -> Self::Score;
}

/// Lower bounds that keep the logarithms of the Gaussian and tabled gap models finite.
#[derive(Copy, Clone, PartialEq, Debug, Getters)]
pub struct Floors {
    /// Minimum area under the Gaussian over the admissible gap lengths
    auc: f64,
    /// Minimum probability of a gap length
    numerator: f64,
    /// Background probability of gaps that can't occur in a random arrangement
    background: f64,
}

impl Default for Floors {
    fn default() -> Self {
        Self {
            auc: 1e-6,
            numerator: 1e-5,
            background: 1e-4,
        }
    }
}

impl Floors {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate(name: &str, value: f64) -> Result<f64> {
        ensure!(
            value.is_finite() && value > 0.0,
            "{name} floor must be finite and positive, got {value}"
        );
        Ok(value)
    }

    pub fn set_auc(&mut self, auc: f64) -> Result<&mut Self> {
        self.auc = Self::validate("AUC", auc)?;
        Ok(self)
    }

    pub fn set_numerator(&mut self, numerator: f64) -> Result<&mut Self> {
        self.numerator = Self::validate("Numerator", numerator)?;
        Ok(self)
    }

    pub fn set_background(&mut self, background: f64) -> Result<&mut Self> {
        self.background = Self::validate("Background", background)?;
        Ok(self)
    }
}

/// Probability of observing a particular gap between two consecutive recognizers when `N`
/// recognizers are scattered at random over `E` free positions: C(E - d, N - 1) / C(E, N),
/// where `d = gap + 1`.
struct Background {
    recognizers: usize,
    effective_length: usize,
    // C(E, N), zero when not representable
    total: u64,
    floor: f64,
}

impl Background {
    #[inline(always)]
    fn in_range(&self, d: usize) -> bool {
        d >= 1 && d + self.recognizers <= self.effective_length + 1
    }

    /// log2 background probability evaluated with exact binomial coefficients
    fn log2_exact(&self, d: usize) -> f64 {
        if !self.in_range(d) {
            return self.floor.log2();
        }

        let (n, k) = ((self.effective_length - d) as u64, (self.recognizers - 1) as u64);
        let fixed = math::binomial(n, k);
        if fixed != 0 && self.total != 0 {
            (fixed as f64 / self.total as f64).log2()
        } else {
            math::log2_binomial(n, k)
                - math::log2_binomial(self.effective_length as u64, self.recognizers as u64)
        }
    }

    /// log2 background probability evaluated with the log2 factorials table
    fn log2_tabled(&self, table: &Log2Table, d: usize) -> f64 {
        if !self.in_range(d) {
            return self.floor.log2();
        }
        table.log2_binomial(self.effective_length - d, self.recognizers - 1)
            - table.log2_binomial(self.effective_length, self.recognizers)
    }
}

/// Connector resolved against the geometry of one sequence
enum Model<'a, S: Float> {
    /// Discretized Gaussian, `auc` is its clamped area over the admissible gap lengths
    Gaussian { mu: f64, sigma: f64, auc: f64 },
    /// Zero sigma: the gap equal to `mu` is the only allowed one
    Exact { mu: f64 },
    /// Gap probabilities normalized through the log2 factorials table
    Tabled {
        probabilities: &'a [S],
        table: &'a Log2Table,
    },
}

/// Gap scorer for the connectors of one organism placed on one sequence.
///
/// * Parametric connectors score the discretized Gaussian mass of the gap, normalized by the
///   Gaussian area over the admissible gap lengths, against the combinatorial background.
/// * Parametric connectors with zero sigma allow only the gap equal to `mu`. Any other gap scores
///   negative infinity and can't be part of a placement.
/// * Precomputed connectors take the gap probability from their table and correct it by the same
///   combinatorial background, evaluated through the [`Log2Table`].
pub struct GapScorer<'a, S: Float> {
    models: Vec<Model<'a, S>>,
    background: Background,
    floors: Floors,
}

impl<'a, S: Float> GapScorer<'a, S> {
    pub fn new(
        connectors: &'a [Connector<S>],
        geometry: &Geometry,
        floors: Floors,
        table: Option<&'a Log2Table>,
    ) -> Result<Self> {
        ensure!(
            connectors.len() + 1 == geometry.len(),
            "Expected {} connectors, got {}",
            geometry.len() - 1,
            connectors.len()
        );

        let effective_length = *geometry.effective_length();
        let max_gap = *geometry.num_alignments() - 1;

        let mut models = Vec::with_capacity(connectors.len());
        for (ind, connector) in connectors.iter().enumerate() {
            let model = match connector {
                Connector::Parametric { mu, sigma } => {
                    let (mu, sigma) = (to_f64(*mu)?, to_f64(*sigma)?);
                    if sigma == 0.0 {
                        Model::Exact { mu }
                    } else {
                        let upper = math::normal_cdf(effective_length as f64 - 1.0, mu, sigma);
                        let lower = math::normal_cdf(0.0, mu, sigma);
                        let auc = (upper - lower).max(floors.auc);
                        Model::Gaussian { mu, sigma, auc }
                    }
                }
                Connector::Precomputed(probabilities) => {
                    ensure!(
                        probabilities.len() > max_gap,
                        "Precomputed connector {ind} scores {} gap lengths, but gaps up to {max_gap} are possible",
                        probabilities.len()
                    );
                    let table = table.ok_or_else(|| {
                        eyre!("Precomputed connectors require a log2 normalization table")
                    })?;
                    table.ensure_covers(effective_length)?;
                    Model::Tabled {
                        probabilities,
                        table,
                    }
                }
            };
            models.push(model);
        }

        let recognizers = geometry.len();
        let total = math::binomial(effective_length as u64, recognizers as u64);
        if total == 0 && effective_length >= recognizers && !connectors.is_empty() {
            log::warn!(
                "C({effective_length}, {recognizers}) overflows u64, falling back to log-space background"
            );
        }

        Ok(Self {
            models,
            background: Background {
                recognizers,
                effective_length,
                total,
                floor: floors.background,
            },
            floors,
        })
    }
}

impl<S: Float> Scorer for GapScorer<'_, S> {
    type Score = S;

    fn score(&self, connector: usize, gap: usize) -> Self::Score {
        let d = gap + 1;
        let score = match &self.models[connector] {
            Model::Gaussian { mu, sigma, auc } => {
                let mass = math::normal_point_mass(gap as f64, *mu, *sigma);
                (mass.max(self.floors.numerator) / auc).log2() - self.background.log2_exact(d)
            }
            Model::Exact { mu } => {
                if gap as f64 == *mu {
                    -self.background.log2_exact(d)
                } else {
                    f64::NEG_INFINITY
                }
            }
            Model::Tabled {
                probabilities,
                table,
            } => {
                let probability = probabilities
                    .get(gap)
                    .and_then(|x| x.to_f64())
                    .unwrap_or(0.0)
                    .max(self.floors.numerator);
                probability.log2() - self.background.log2_tabled(table, d)
            }
        };
        debug_assert!(
            !score.is_nan() && score != f64::INFINITY,
            "connector={connector}, gap={gap}"
        );
        cast(score)
    }
}

fn to_f64<S: Float>(value: S) -> Result<f64> {
    value
        .to_f64()
        .filter(|x| x.is_finite())
        .ok_or_else(|| eyre!("Connector parameter {value:?} is not a finite number"))
}
