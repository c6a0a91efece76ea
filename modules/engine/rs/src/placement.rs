#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use derive_getters::{Dissolve, Getters};
use eyre::{ensure, Result};
use itertools::izip;

use multiplacement_core_rs::num::Float;

use crate::align::argmax;
use crate::geometry::Geometry;
use crate::matrix::Matrix;

/// The best placement of an organism on a sequence.
///
/// Positions are alignment columns: the recognizer `i` starts at the column
/// `start + sum(gaps[..i])`, i.e. at the sequence position `forward_offset(i) + column`.
/// `score` is the cumulative score of the DP cell the placement was traced from. It equals the sum
/// of recognizer and connector scores up to the rounding of the summation order.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, PartialEq, Debug, Getters, Dissolve)]
pub struct Placement<S: Float> {
    start: usize,
    gaps: Vec<usize>,
    recognizer_scores: Vec<S>,
    connector_scores: Vec<S>,
    score: S,
}

impl<S: Float> Placement<S> {
    pub fn new(
        start: usize,
        gaps: Vec<usize>,
        recognizer_scores: Vec<S>,
        connector_scores: Vec<S>,
        score: S,
    ) -> Result<Self> {
        ensure!(
            !recognizer_scores.is_empty(),
            "Placement must include at least one recognizer"
        );
        ensure!(
            gaps.len() + 1 == recognizer_scores.len() && gaps.len() == connector_scores.len(),
            "Placement of {} recognizers must have {} gaps and connector scores, got {} and {}",
            recognizer_scores.len(),
            recognizer_scores.len() - 1,
            gaps.len(),
            connector_scores.len()
        );
        Ok(Self {
            start,
            gaps,
            recognizer_scores,
            connector_scores,
            score,
        })
    }

    /// Best placement of a lone recognizer: the first column with the maximum score.
    pub fn single(scores: &Matrix<S>) -> Result<Self> {
        ensure!(
            scores.rows() == 1 && scores.cols() >= 1,
            "Expected scores of a single recognizer, got {:?}",
            scores.dims()
        );
        let row = scores.row(0);
        let start = argmax(row);
        Ok(Self {
            start,
            gaps: Vec::new(),
            recognizer_scores: vec![row[start]],
            connector_scores: Vec::new(),
            score: row[start],
        })
    }

    /// Number of placed recognizers
    pub fn len(&self) -> usize {
        self.recognizer_scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recognizer_scores.is_empty()
    }

    /// Alignment column of every recognizer.
    pub fn columns(&self) -> Vec<usize> {
        let mut columns = Vec::with_capacity(self.len());
        let mut column = self.start;
        columns.push(column);
        for gap in &self.gaps {
            column += gap;
            columns.push(column);
        }
        columns
    }

    /// Sequence position of every recognizer.
    pub fn positions(&self, geometry: &Geometry) -> Result<Vec<usize>> {
        ensure!(
            geometry.len() == self.len(),
            "Geometry of {} recognizers doesn't match the placement of {}",
            geometry.len(),
            self.len()
        );
        Ok(self
            .columns()
            .into_iter()
            .enumerate()
            .map(|(rec, column)| geometry.position(rec, column))
            .collect())
    }

    /// Export into caller-allocated buffers:
    /// * `recognizer_scores`: N + 1 slots, recognizer scores followed by the total score;
    /// * `connector_scores`: max(N - 1, 1) slots, a lone recognizer reports a zero connector score;
    /// * `connector_lengths`: N slots, the start column followed by the gaps.
    pub fn write_into(
        &self,
        recognizer_scores: &mut [S],
        connector_scores: &mut [S],
        connector_lengths: &mut [usize],
    ) -> Result<()> {
        let n = self.len();
        ensure!(
            recognizer_scores.len() == n + 1,
            "Recognizer scores buffer must have {} slots, got {}",
            n + 1,
            recognizer_scores.len()
        );
        ensure!(
            connector_scores.len() == n.max(2) - 1,
            "Connector scores buffer must have {} slots, got {}",
            n.max(2) - 1,
            connector_scores.len()
        );
        ensure!(
            connector_lengths.len() == n,
            "Connector lengths buffer must have {n} slots, got {}",
            connector_lengths.len()
        );

        recognizer_scores[..n].copy_from_slice(&self.recognizer_scores);
        recognizer_scores[n] = self.score;

        if self.connector_scores.is_empty() {
            connector_scores[0] = S::zero();
        } else {
            connector_scores.copy_from_slice(&self.connector_scores);
        }

        connector_lengths[0] = self.start;
        for (slot, gap) in izip!(&mut connector_lengths[1..], &self.gaps) {
            *slot = *gap;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Dims;

    #[test]
    fn test_new() -> Result<()> {
        let placement = Placement::new(2, vec![3, 0], vec![1.0, 2.0, 0.5], vec![-1.0, 0.25], 2.75)?;
        assert_eq!(*placement.score(), 2.75);
        assert_eq!(placement.len(), 3);
        assert_eq!(placement.columns(), vec![2, 5, 5]);

        assert!(Placement::<f64>::new(0, vec![], vec![], vec![], 0.0).is_err());
        assert!(Placement::new(0, vec![1], vec![1.0, 2.0], vec![], 3.0).is_err());
        assert!(Placement::new(0, vec![], vec![1.0, 2.0], vec![0.0], 3.0).is_err());
        Ok(())
    }

    #[test]
    fn test_single() -> Result<()> {
        let mut scores = Matrix::filled(Dims::new(1, 5), 0.0_f32)?;
        scores.row_mut(0).copy_from_slice(&[0.0, 3.0, 1.0, 3.0, -2.0]);

        let placement = Placement::single(&scores)?;
        assert_eq!(*placement.start(), 1);
        assert_eq!(*placement.score(), 3.0);
        assert!(placement.gaps().is_empty());
        assert!(placement.connector_scores().is_empty());

        let scores = Matrix::filled(Dims::new(2, 5), 0.0_f32)?;
        assert!(Placement::single(&scores).is_err());
        Ok(())
    }

    #[test]
    fn test_positions() -> Result<()> {
        let geometry = Geometry::new(30, &[4, 2, 3])?;
        let placement = Placement::new(1, vec![5, 2], vec![0.0; 3], vec![0.0; 2], 0.0)?;
        // columns: 1, 6, 8; forward offsets: 0, 4, 6
        assert_eq!(placement.positions(&geometry)?, vec![1, 10, 14]);

        let other = Geometry::new(30, &[4, 2])?;
        assert!(placement.positions(&other).is_err());
        Ok(())
    }

    #[test]
    fn test_write_into() -> Result<()> {
        let placement = Placement::new(4, vec![1, 7], vec![1.0, 2.0, 3.0], vec![-0.5, 0.5], 6.0)?;

        let (mut rec, mut con, mut len) = (vec![0.0; 4], vec![0.0; 2], vec![0; 3]);
        placement.write_into(&mut rec, &mut con, &mut len)?;
        assert_eq!(rec, vec![1.0, 2.0, 3.0, 6.0]);
        assert_eq!(con, vec![-0.5, 0.5]);
        assert_eq!(len, vec![4, 1, 7]);

        assert!(placement.write_into(&mut rec[..3], &mut con, &mut len).is_err());
        assert!(placement.write_into(&mut rec, &mut con[..1], &mut len).is_err());
        assert!(placement.write_into(&mut rec, &mut con, &mut len[..2]).is_err());
        Ok(())
    }

    #[test]
    fn test_write_into_single() -> Result<()> {
        let placement = Placement::new(9, vec![], vec![4.5_f32], vec![], 4.5)?;

        let (mut rec, mut con, mut len) = (vec![0.0; 2], vec![7.0], vec![0]);
        placement.write_into(&mut rec, &mut con, &mut len)?;
        assert_eq!(rec, vec![4.5, 4.5]);
        assert_eq!(con, vec![0.0]);
        assert_eq!(len, vec![9]);
        Ok(())
    }
}
