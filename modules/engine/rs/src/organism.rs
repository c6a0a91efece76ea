#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use derive_getters::{Dissolve, Getters};
use eyre::{ensure, Result};

use multiplacement_core_rs::num::Float;

/// Nucleotide with its row in the recognizer matrices.
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Base {
    A = 0,
    G = 1,
    C = 2,
    T = 3,
}

impl Base {
    pub const COUNT: usize = 4;

    #[inline(always)]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl TryFrom<u8> for Base {
    type Error = ();

    #[inline(always)]
    fn try_from(symbol: u8) -> Result<Self, Self::Error> {
        match symbol {
            b'A' | b'a' => Ok(Base::A),
            b'G' | b'g' => Ok(Base::G),
            b'C' | b'c' => Ok(Base::C),
            b'T' | b't' => Ok(Base::T),
            _ => Err(()),
        }
    }
}

/// Position-specific scoring matrix (PSSM) stored column by column:
/// `scores[column * 4 + base]` is the log-odds score of `base` at `column`.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, PartialEq, Debug, Getters, Dissolve)]
pub struct Recognizer<S: Float> {
    width: usize,
    scores: Vec<S>,
}

impl<S: Float> Recognizer<S> {
    pub fn new(width: usize, scores: Vec<S>) -> Result<Self> {
        ensure!(width > 0, "Recognizer must have at least one column");
        ensure!(
            scores.len() == width * Base::COUNT,
            "Recognizer with {width} columns must have {} scores, got {}",
            width * Base::COUNT,
            scores.len()
        );
        ensure!(
            scores.iter().all(|x| x.is_finite()),
            "Recognizer scores must be finite"
        );
        Ok(Self { width, scores })
    }

    #[inline(always)]
    pub fn score(&self, column: usize, base: Base) -> S {
        self.scores[column * Base::COUNT + base.index()]
    }

    /// Score the recognizer against a window of exactly `width` symbols.
    /// Ambiguous symbols (N, IUPAC codes, gaps, etc.) carry no evidence and contribute zero.
    #[inline]
    pub fn score_window(&self, window: &[u8]) -> S {
        debug_assert_eq!(window.len(), self.width);

        let mut score = S::zero();
        for (column, symbol) in window.iter().enumerate() {
            if let Ok(base) = Base::try_from(*symbol) {
                score = score + self.score(column, base);
            }
        }
        score
    }
}

/// Scoring model for the spacer between two consecutive recognizers.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, PartialEq, Debug)]
pub enum Connector<S: Float> {
    /// Gaussian preference over the gap length. Zero sigma allows only the gap equal to mu.
    Parametric { mu: S, sigma: S },
    /// Probability of each gap length, indexed by the gap length itself.
    Precomputed(Vec<S>),
}

impl<S: Float> Connector<S> {
    pub fn parametric(mu: S, sigma: S) -> Result<Self> {
        ensure!(
            mu.is_finite() && sigma.is_finite(),
            "Connector parameters must be finite, got mu={mu:?}, sigma={sigma:?}"
        );
        Ok(Connector::Parametric { mu, sigma })
    }

    pub fn precomputed(probabilities: Vec<S>) -> Result<Self> {
        ensure!(
            !probabilities.is_empty(),
            "Precomputed connector must score at least one gap length"
        );
        ensure!(
            probabilities.iter().all(|x| x.is_finite() && *x >= S::zero()),
            "Precomputed connector probabilities must be finite and non-negative"
        );
        Ok(Connector::Precomputed(probabilities))
    }

    pub fn is_precomputed(&self) -> bool {
        matches!(self, Connector::Precomputed(_))
    }
}

/// An ordered chain of recognizers joined by connectors: R0 -C0- R1 -C1- ... R(N-1)
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, PartialEq, Debug, Getters, Dissolve)]
pub struct Organism<S: Float> {
    recognizers: Vec<Recognizer<S>>,
    connectors: Vec<Connector<S>>,
}

impl<S: Float> Organism<S> {
    pub fn new(recognizers: Vec<Recognizer<S>>, connectors: Vec<Connector<S>>) -> Result<Self> {
        ensure!(
            !recognizers.is_empty(),
            "Organism must have at least one recognizer"
        );
        ensure!(
            connectors.len() + 1 == recognizers.len(),
            "Organism with {} recognizers must have {} connectors, got {}",
            recognizers.len(),
            recognizers.len() - 1,
            connectors.len()
        );
        Ok(Self {
            recognizers,
            connectors,
        })
    }

    /// A single recognizer without connectors.
    pub fn single(recognizer: Recognizer<S>) -> Self {
        Self {
            recognizers: vec![recognizer],
            connectors: Vec::new(),
        }
    }

    /// Number of recognizers
    pub fn len(&self) -> usize {
        self.recognizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recognizers.is_empty()
    }

    pub fn widths(&self) -> Vec<usize> {
        self.recognizers.iter().map(|x| x.width).collect()
    }

    pub fn total_width(&self) -> usize {
        self.recognizers.iter().map(|x| x.width).sum()
    }

    pub fn has_precomputed(&self) -> bool {
        self.connectors.iter().any(Connector::is_precomputed)
    }
}
