use derive_getters::Getters;
use derive_more::Constructor;
use eyre::Result;
use rayon::ThreadPool;

use multiplacement_core_rs::num::Float;

use crate::align::align_organism;
use crate::builder::EngineBuilder;
use crate::gap::{Floors, GapScorer};
use crate::geometry::Geometry;
use crate::normalization::Log2Table;
use crate::organism::Organism;
use crate::placement::Placement;
use crate::scan::scan_pssm;
use crate::traceback::reconstruct;

/// Finds the best placement of organisms on sequences.
///
/// An engine is immutable and may be shared between threads. Each call owns all of its scratch
/// buffers, the optional thread pool only parallelizes the DP over alignment columns.
#[derive(Default, Constructor, Getters)]
pub struct Engine {
    thread_pool: Option<ThreadPool>,
    floors: Floors,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Place the organism on the sequence.
    ///
    /// `table` is required when the organism has precomputed connectors and must cover the
    /// effective length of the sequence, i.e. its length minus the total width of the organism.
    pub fn run<S: Float>(
        &self,
        seq: &[u8],
        organism: &Organism<S>,
        table: Option<&Log2Table>,
    ) -> Result<Placement<S>> {
        let geometry = Geometry::new(seq.len(), &organism.widths())?;
        log::debug!(
            "Placing {} recognizers on a sequence of length {}: {} alignment columns, effective length {}",
            organism.len(),
            seq.len(),
            geometry.num_alignments(),
            geometry.effective_length()
        );
        if organism.len() > 1 && *geometry.num_alignments() == 1 {
            log::warn!(
                "Organism of {} columns fills the whole sequence, all gaps are forced to zero",
                organism.total_width()
            );
        }

        // Validate connectors before scanning the sequence
        let scorer = GapScorer::new(organism.connectors(), &geometry, self.floors, table)?;

        let scores = scan_pssm(seq, organism, &geometry)?;
        if organism.len() == 1 {
            return Placement::single(&scores);
        }

        let trace = align_organism(&scores, &scorer, self.thread_pool.as_ref())?;
        let placement = reconstruct(&scores, &trace, &scorer)?;
        if placement.score().is_infinite() {
            log::warn!("No arrangement of the organism satisfies its zero-sigma connectors");
        }
        Ok(placement)
    }
}
