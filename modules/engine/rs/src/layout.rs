//! Organisms described by flat buffers, the way they are exchanged with host runtimes.

use derive_more::Constructor;
use eyre::{ensure, eyre, Result};
use itertools::Itertools;

use multiplacement_core_rs::num::Float;

use crate::geometry::forward_offset;
use crate::organism::{Base, Connector, Organism, Recognizer};

/// Connector payload layouts recognized by [`FlatOrganism`]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ConnectorLayout {
    /// `(mu, sigma)` pairs, 2 values per connector
    Parametric,
    /// `max_length` gap probabilities per connector
    Precomputed,
}

/// Borrowed flat description of an organism:
/// * `widths`: number of columns of each recognizer;
/// * `matrices`: all recognizer matrices concatenated, `width * 4` scores each;
/// * `connectors`: parametric or precomputed payload of all connectors, concatenated;
/// * `max_length`: number of gap lengths scored by each precomputed connector.
#[derive(Clone, Copy, Debug, Constructor)]
pub struct FlatOrganism<'a, S: Float> {
    widths: &'a [usize],
    matrices: &'a [S],
    connectors: &'a [S],
    max_length: usize,
}

impl<S: Float> FlatOrganism<'_, S> {
    /// Detect the connector layout from the payload size. Parametric layout wins when both sizes
    /// coincide.
    pub fn connector_layout(&self) -> Result<ConnectorLayout> {
        let connectors = self.widths.len().saturating_sub(1);
        let size = self.connectors.len();

        if size == connectors * 2 {
            Ok(ConnectorLayout::Parametric)
        } else if connectors > 0
            && self.max_length > 0
            && Some(size) == connectors.checked_mul(self.max_length)
        {
            Ok(ConnectorLayout::Precomputed)
        } else {
            Err(eyre!(
                "Invalid shape: connector payload of {size} values matches neither {} parametric \
                 nor {} precomputed (max length {}) values for {connectors} connectors",
                connectors * 2,
                connectors.saturating_mul(self.max_length),
                self.max_length
            ))
        }
    }

    pub fn into_organism(self) -> Result<Organism<S>> {
        ensure!(
            !self.widths.is_empty(),
            "Invalid shape: at least one recognizer is required"
        );
        ensure!(
            self.widths.iter().all(|x| *x > 0),
            "Invalid shape: recognizer widths must be positive, got {:?}",
            self.widths
        );

        let total: usize = self.widths.iter().sum();
        ensure!(
            self.matrices.len() == total * Base::COUNT,
            "Invalid shape: {} recognizer columns require {} scores, got {}",
            total,
            total * Base::COUNT,
            self.matrices.len()
        );

        let recognizers = self
            .widths
            .iter()
            .enumerate()
            .map(|(ind, width)| {
                let start = forward_offset(ind, self.widths) * Base::COUNT;
                let end = start + width * Base::COUNT;
                Recognizer::new(*width, self.matrices[start..end].to_vec())
            })
            .collect::<Result<Vec<_>>>()?;

        let connectors = match self.connector_layout()? {
            ConnectorLayout::Parametric => self
                .connectors
                .iter()
                .tuples::<(_, _)>()
                .map(|(mu, sigma)| Connector::parametric(*mu, *sigma))
                .collect::<Result<Vec<_>>>()?,
            ConnectorLayout::Precomputed => self
                .connectors
                .chunks_exact(self.max_length)
                .map(|probabilities| Connector::precomputed(probabilities.to_vec()))
                .collect::<Result<Vec<_>>>()?,
        };

        Organism::new(recognizers, connectors)
    }
}

impl<S: Float> TryFrom<FlatOrganism<'_, S>> for Organism<S> {
    type Error = eyre::Report;

    fn try_from(value: FlatOrganism<'_, S>) -> Result<Self> {
        value.into_organism()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parametric() -> Result<()> {
        let widths = [1, 2];
        let matrices: Vec<f32> = (0..12).map(|x| x as f32).collect();
        let connectors = [3.0, 0.5];

        let flat = FlatOrganism::new(&widths, &matrices, &connectors, 10);
        assert_eq!(flat.connector_layout()?, ConnectorLayout::Parametric);

        let organism = Organism::try_from(flat)?;
        assert_eq!(organism.widths(), vec![1, 2]);
        assert_eq!(organism.recognizers()[0].scores(), &vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(organism.recognizers()[1].scores(), &matrices[4..].to_vec());
        assert_eq!(
            organism.connectors(),
            &vec![Connector::Parametric { mu: 3.0, sigma: 0.5 }]
        );
        Ok(())
    }

    #[test]
    fn test_precomputed() -> Result<()> {
        let widths = [1, 1, 1];
        let matrices = vec![0.0_f64; 12];
        let connectors: Vec<f64> = (0..8).map(|x| x as f64 / 10.0).collect();

        let flat = FlatOrganism::new(&widths, &matrices, &connectors, 4);
        assert_eq!(flat.connector_layout()?, ConnectorLayout::Precomputed);

        let organism = flat.into_organism()?;
        assert_eq!(
            organism.connectors(),
            &vec![
                Connector::Precomputed(vec![0.0, 0.1, 0.2, 0.3]),
                Connector::Precomputed(vec![0.4, 0.5, 0.6, 0.7]),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_single() -> Result<()> {
        let widths = [2];
        let matrices = vec![1.0_f32; 8];

        let organism = FlatOrganism::new(&widths, &matrices, &[], 0).into_organism()?;
        assert_eq!(organism.len(), 1);
        assert!(organism.connectors().is_empty());

        // A lone recognizer has no connectors
        assert!(FlatOrganism::new(&widths, &matrices, &[0.5], 1).into_organism().is_err());
        Ok(())
    }

    #[test]
    fn test_ambiguous_layout() -> Result<()> {
        // max_length = 2 => both layouts have the same size
        let widths = [1, 1];
        let matrices = vec![0.0_f64; 8];
        let flat = FlatOrganism::new(&widths, &matrices, &[2.0, 1.0], 2);
        assert_eq!(flat.connector_layout()?, ConnectorLayout::Parametric);
        Ok(())
    }

    #[test]
    fn test_invalid_shape() {
        let widths = [1, 2, 1];
        let matrices = vec![0.0_f32; 16];

        // Neither 2 * 2 nor 2 * 5
        let payload = vec![0.1_f32; 7];
        assert!(FlatOrganism::new(&widths, &matrices, &payload, 5).connector_layout().is_err());
        assert!(FlatOrganism::new(&widths, &matrices, &payload, 5).into_organism().is_err());

        // Matrices don't match the widths
        let payload = vec![1.0_f32; 4];
        assert!(FlatOrganism::new(&widths, &matrices[..12], &payload, 5).into_organism().is_err());
        assert!(FlatOrganism::new(&widths, &matrices, &payload, 5).into_organism().is_ok());

        // Zero width
        assert!(FlatOrganism::new(&[0, 4], &matrices, &[1.0, 1.0], 5).into_organism().is_err());
        assert!(FlatOrganism::<f32>::new(&[], &[], &[], 5).into_organism().is_err());
    }
}
