use eyre::{ensure, Result};

use multiplacement_core_rs::num::Float;

use crate::geometry::Geometry;
use crate::matrix::{Dims, Matrix};
use crate::organism::Organism;

/// Score every recognizer of the organism at every valid start position of the sequence.
///
/// Row `i` of the result holds the recognizer `i`, column `j` its placement at the sequence
/// position `geometry.position(i, j)`.
pub fn scan_pssm<S: Float>(
    seq: &[u8],
    organism: &Organism<S>,
    geometry: &Geometry,
) -> Result<Matrix<S>> {
    ensure!(
        seq.len() == *geometry.seq_len() && organism.len() == geometry.len(),
        "Geometry doesn't match the sequence and the organism"
    );

    let dims = Dims::new(organism.len(), *geometry.num_alignments());
    let mut scores = Matrix::filled(dims, S::zero())?;

    for (ind, recognizer) in organism.recognizers().iter().enumerate() {
        let width = *recognizer.width();
        let row = scores.row_mut(ind);
        for (cell, start) in row.iter_mut().zip(geometry.window(ind)) {
            *cell = recognizer.score_window(&seq[start..start + width]);
        }
    }
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organism::{Connector, Recognizer};

    fn one_hot(consensus: &[u8]) -> Recognizer<f64> {
        let mut scores = vec![0.0; consensus.len() * 4];
        for (column, symbol) in consensus.iter().enumerate() {
            let base = crate::organism::Base::try_from(*symbol).unwrap();
            scores[column * 4 + base.index()] = 1.0;
        }
        Recognizer::new(consensus.len(), scores).unwrap()
    }

    #[test]
    fn test_scan_single() -> Result<()> {
        let organism = Organism::single(one_hot(b"AC"));
        let seq = b"ACACgtac";
        let geometry = Geometry::new(seq.len(), &organism.widths())?;

        let scores = scan_pssm(seq, &organism, &geometry)?;
        assert_eq!(*scores.dims(), Dims::new(1, 7));
        assert_eq!(scores.row(0), &[2.0, 0.0, 2.0, 0.0, 0.0, 0.0, 2.0]);
        Ok(())
    }

    #[test]
    fn test_scan_chain() -> Result<()> {
        let organism = Organism::new(
            vec![one_hot(b"GG"), one_hot(b"T")],
            vec![Connector::parametric(1.0, 1.0)?],
        )?;
        //          0123456
        let seq = b"GGTNGGT";
        let geometry = Geometry::new(seq.len(), &organism.widths())?;

        let scores = scan_pssm(seq, &organism, &geometry)?;
        assert_eq!(*scores.dims(), Dims::new(2, 5));
        // GG at positions 0..5
        assert_eq!(scores.row(0), &[2.0, 1.0, 0.0, 1.0, 2.0]);
        // T at positions 2..7
        assert_eq!(scores.row(1), &[1.0, 0.0, 0.0, 0.0, 1.0]);
        Ok(())
    }

    #[test]
    fn test_scan_ambiguous_symbols() -> Result<()> {
        let organism = Organism::single(Recognizer::new(1, vec![-1.0, -2.0, -3.0, -4.0])?);
        let seq = b"NaRt-";
        let geometry = Geometry::new(seq.len(), &organism.widths())?;

        let scores = scan_pssm(seq, &organism, &geometry)?;
        assert_eq!(scores.row(0), &[0.0, -1.0, 0.0, -4.0, 0.0]);
        Ok(())
    }

    #[test]
    fn test_scan_geometry_mismatch() -> Result<()> {
        let organism = Organism::single(one_hot(b"AC"));
        let geometry = Geometry::new(10, &organism.widths())?;
        assert!(scan_pssm(b"ACGT", &organism, &geometry).is_err());
        Ok(())
    }
}
