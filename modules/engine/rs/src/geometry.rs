use std::ops::Range;

use derive_getters::Getters;
use eyre::{ensure, Result};

/// The first sequence position where the recognizer `index` may start, i.e. the total width of
/// all preceding recognizers.
pub fn forward_offset(index: usize, widths: &[usize]) -> usize {
    widths[..index].iter().sum()
}

/// The number of trailing positions reserved after the start of the recognizer `index`: the total
/// width of this and all subsequent recognizers minus one. For the last recognizer this is its own
/// width minus one.
pub fn reverse_offset(index: usize, widths: &[usize]) -> usize {
    debug_assert!(index < widths.len());
    widths[index..].iter().sum::<usize>() - 1
}

/// Scanning windows of all recognizers of an organism on a sequence of the given length.
///
/// Every recognizer has the same number of valid start positions (alignment columns):
/// `seq_len - total_width + 1`. Column `j` of the recognizer `i` is the sequence position
/// `forward_offset(i) + j`.
#[derive(Clone, Eq, PartialEq, Debug, Getters)]
pub struct Geometry {
    seq_len: usize,
    forward: Vec<usize>,
    reverse: Vec<usize>,
    num_alignments: usize,
    effective_length: usize,
}

impl Geometry {
    pub fn new(seq_len: usize, widths: &[usize]) -> Result<Self> {
        ensure!(!widths.is_empty(), "At least one recognizer width is required");
        ensure!(
            widths.iter().all(|x| *x > 0),
            "Recognizer widths must be positive"
        );

        let total: usize = widths.iter().sum();
        ensure!(
            seq_len >= total,
            "Sequence of length {seq_len} is shorter than the organism ({total} columns)"
        );

        let forward: Vec<_> = (0..widths.len())
            .map(|i| forward_offset(i, widths))
            .collect();
        let reverse: Vec<_> = (0..widths.len())
            .map(|i| reverse_offset(i, widths))
            .collect();
        let num_alignments = seq_len - forward[0] - reverse[0];

        debug_assert!(
            forward
                .iter()
                .zip(&reverse)
                .all(|(f, r)| seq_len - f - r == num_alignments)
        );

        Ok(Self {
            seq_len,
            forward,
            reverse,
            num_alignments,
            effective_length: seq_len - total,
        })
    }

    /// Number of recognizers
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Valid start positions of the given recognizer in sequence coordinates.
    pub fn window(&self, recognizer: usize) -> Range<usize> {
        self.forward[recognizer]..self.seq_len - self.reverse[recognizer]
    }

    /// Sequence position of the given alignment column of the recognizer.
    pub fn position(&self, recognizer: usize, column: usize) -> usize {
        self.forward[recognizer] + column
    }
}
