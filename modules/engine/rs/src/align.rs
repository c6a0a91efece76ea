use derive_getters::{Dissolve, Getters};
use eyre::{ensure, Result};
use rayon::prelude::*;
use rayon::ThreadPool;

use multiplacement_core_rs::num::Float;

use crate::gap;
use crate::matrix::{Dims, Matrix};

/// Recorded decisions of the placement DP.
#[derive(Clone, PartialEq, Debug, Getters, Dissolve)]
pub struct TraceTable<S: Float> {
    /// Best cumulative score of the whole chain ending with the last recognizer at each column
    scores: Vec<S>,
    /// Row `c` holds the gap length chosen for the connector `c` at each column of the
    /// recognizer `c + 1`
    gaps: Matrix<usize>,
}

impl<S: Float> TraceTable<S> {
    /// Column of the best total score and the score itself
    pub fn best(&self) -> (usize, S) {
        let index = argmax(&self.scores);
        (index, self.scores[index])
    }
}

/// Index of the first maximum, 0 for an empty slice.
pub fn argmax<S: Float>(values: &[S]) -> usize {
    let mut best = 0;
    for (ind, value) in values.iter().enumerate() {
        if *value > values[best] {
            best = ind;
        }
    }
    best
}

/// Best cumulative score for the recognizer placed at `column` and the gap that produced it.
///
/// Every source column `k <= column` is examined in ascending order, the first candidate seeds
/// the maximum and later ones replace it only if strictly better. Among exact ties the smallest
/// source column (the longest gap) wins.
#[inline(always)]
fn relax<S: Float>(previous: &[S], gap_scores: &[S], score: S, column: usize) -> (S, usize) {
    let mut best = previous[0] + gap_scores[column] + score;
    let mut gap = column;
    for k in 1..=column {
        let candidate = previous[k] + gap_scores[column - k] + score;
        if best < candidate {
            best = candidate;
            gap = column - k;
        }
    }
    (best, gap)
}

/// Max-plus DP over all recognizers of the organism.
///
/// `scores` is the PSSM scan matrix (one row per recognizer), `scorer` assigns scores to gap
/// lengths of each connector. The DP examines every pair of columns `k <= j` for every
/// connector, hence O(columns^2 * recognizers). Columns of the same recognizer are independent
/// and are processed in parallel when a thread pool is provided; the result does not depend on it.
pub fn align_organism<S, G>(
    scores: &Matrix<S>,
    scorer: &G,
    pool: Option<&ThreadPool>,
) -> Result<TraceTable<S>>
where
    S: Float,
    G: gap::Scorer<Score = S>,
{
    let (recognizers, columns) = (scores.rows(), scores.cols());
    ensure!(recognizers >= 1, "At least one recognizer is required");
    ensure!(columns >= 1, "At least one alignment column is required");

    let mut gaps = Matrix::filled(Dims::new(recognizers - 1, columns), 0_usize)?;
    let mut best = scores.row(0).to_vec();
    let mut gap_scores = Vec::with_capacity(columns);

    for rec in 1..recognizers {
        // Gap lengths range over [0, columns), score each one once per connector
        gap_scores.clear();
        gap_scores.extend((0..columns).map(|gap| scorer.score(rec - 1, gap)));

        let row = scores.row(rec);
        let relaxed: Vec<(S, usize)> = match pool {
            Some(pool) => pool.install(|| {
                (0..columns)
                    .into_par_iter()
                    .map(|j| relax(&best, &gap_scores, row[j], j))
                    .collect()
            }),
            None => (0..columns)
                .map(|j| relax(&best, &gap_scores, row[j], j))
                .collect(),
        };

        for ((score, gap), (cell, saveto)) in relaxed
            .into_iter()
            .zip(best.iter_mut().zip(gaps.row_mut(rec - 1)))
        {
            *cell = score;
            *saveto = gap;
        }
    }

    Ok(TraceTable { scores: best, gaps })
}
