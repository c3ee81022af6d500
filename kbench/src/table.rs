use crate::measurement::{ByteSize, CountsMode, KmerSize, Measurement, NONE_TOKEN};

/// Immutable in-memory relation of benchmark [`Measurement`] rows.
///
/// The analyzer treats this as a queryable relation: rows are never mutated
/// and selection always materializes an explicit subset, so that an empty
/// subset is visible to the caller instead of silently folding into a zero.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    rows: Vec<Measurement>,
}

impl ResultTable {
    /// Creates a new `ResultTable` from a collection of rows.
    #[must_use]
    pub fn new<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = Measurement>,
    {
        Self {
            rows: rows.into_iter().collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Measurement] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Selects the rows of one (sequence, counts mode, k-mer size) cell.
    ///
    /// The counts filter is direct equality on the requested mode. Matching
    /// is verbatim on the normalized tokens — there is no fuzzy matching.
    #[must_use]
    pub fn select<'a>(
        &'a self,
        sequence: &str,
        mode: CountsMode,
        kmer_size: &KmerSize,
    ) -> RowSelection<'a> {
        let rows = self
            .rows
            .iter()
            .filter(|row| {
                row.sequence() == sequence
                    && row.counts_mode() == mode
                    && row.kmer_size() == kmer_size
            })
            .collect();

        RowSelection { rows }
    }

    /// Returns the size of the raw source sequence for the given
    /// (sequence, k-mer size) pair, or `None` if it was never recorded.
    ///
    /// The raw source is stored under the pseudo-method `none` with
    /// compression `none`. It is the same file in both counts modes, so the
    /// counts column is ignored here.
    #[must_use]
    pub fn source_size(&self, sequence: &str, kmer_size: &KmerSize) -> Option<ByteSize> {
        let mut found = false;
        let mut total = ByteSize::ZERO;

        for row in &self.rows {
            if row.sequence() == sequence
                && row.kmer_size() == kmer_size
                && row.method() == NONE_TOKEN
                && row.compression().is_none()
            {
                found = true;
                total += row.size();
            }
        }

        found.then(|| total)
    }
}

/// A materialized subset of table rows for one (sequence, counts mode,
/// k-mer size) cell. All per-method reductions run over a selection.
#[derive(Debug, Clone)]
pub struct RowSelection<'a> {
    rows: Vec<&'a Measurement>,
}

impl<'a> RowSelection<'a> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the uncompressed (`compression == none`) rows of one
    /// method, across all its file types.
    pub fn uncompressed_rows<'b>(
        &'b self,
        method: &'b str,
    ) -> impl Iterator<Item = &'a Measurement> + 'b {
        self.rows
            .iter()
            .copied()
            .filter(move |row| row.method() == method && row.compression().is_none())
    }

    /// Iterates over the compressed candidate rows of one (method, file
    /// type) pair, yielding `(size, tool)` so the minimization scan keeps
    /// the winner's provenance without re-querying the table.
    pub fn compressed_candidates<'b>(
        &'b self,
        method: &'b str,
        file_type: &'b str,
    ) -> impl Iterator<Item = (ByteSize, &'a str)> + 'b {
        self.rows.iter().copied().filter_map(move |row| {
            if row.method() != method || row.file_type() != file_type {
                return None;
            }

            row.compression().tool().map(|tool| (row.size(), tool))
        })
    }
}
