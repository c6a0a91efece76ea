use eyre::{ensure, eyre, OptionExt, Result};

use multiplacement_core_rs::num::Float;

use crate::align::TraceTable;
use crate::gap;
use crate::matrix::Matrix;
use crate::placement::Placement;

/// Walk the recorded gap decisions back from the best final column and rebuild the placement.
///
/// `scores` is the PSSM scan matrix the table was computed from, `scorer` must be the same gap
/// scorer used by the DP.
pub fn reconstruct<S, G>(scores: &Matrix<S>, table: &TraceTable<S>, scorer: &G) -> Result<Placement<S>>
where
    S: Float,
    G: gap::Scorer<Score = S>,
{
    let recognizers = scores.rows();
    ensure!(
        recognizers >= 2,
        "Traceback requires at least two recognizers, got {recognizers}"
    );
    ensure!(
        table.gaps().rows() + 1 == recognizers && table.scores().len() == scores.cols(),
        "Trace table {:?} doesn't match the scores {:?}",
        table.gaps().dims(),
        scores.dims()
    );

    let (mut column, total) = table.best();
    let mut gaps = vec![0; recognizers - 1];
    for connector in (0..recognizers - 1).rev() {
        let gap = *table
            .gaps()
            .get(connector, column)
            .ok_or_eyre("Traceback left the alignment matrix")?;
        column = column.checked_sub(gap).ok_or_else(|| {
            eyre!("Gap {gap} of the connector {connector} runs before the first alignment column")
        })?;
        gaps[connector] = gap;
    }
    let start = column;

    let mut recognizer_scores = Vec::with_capacity(recognizers);
    let mut column = start;
    for rec in 0..recognizers {
        if rec > 0 {
            column += gaps[rec - 1];
        }
        let score = scores
            .get(rec, column)
            .ok_or_else(|| eyre!("Recognizer {rec} is placed outside of the alignment matrix"))?;
        recognizer_scores.push(*score);
    }

    let connector_scores = gaps
        .iter()
        .enumerate()
        .map(|(connector, gap)| scorer.score(connector, *gap))
        .collect();

    Placement::new(start, gaps, recognizer_scores, connector_scores, total)
}
