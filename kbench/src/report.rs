use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::measurement::{ByteSize, CountsMode, KmerSize};

/// Tally of how many (method, file type) minimizations each compression tool
/// has won. Monotonically incremented during one counts-mode pass, never
/// reset within it.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolTally {
    wins: BTreeMap<String, u64>,
}

impl ToolTally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one minimization win for `tool`.
    pub fn record(&mut self, tool: &str) {
        *self.wins.entry(tool.to_owned()).or_insert(0) += 1;
    }

    /// Returns the win count of `tool`.
    ///
    /// # Examples
    /// ```
    /// use kbench::report::ToolTally;
    ///
    /// let mut tally = ToolTally::new();
    /// tally.record("zstd");
    /// tally.record("zstd");
    /// assert_eq!(tally.wins("zstd"), 2);
    /// assert_eq!(tally.wins("gzip"), 0);
    /// ```
    #[must_use]
    pub fn wins(&self, tool: &str) -> u64 {
        self.wins.get(tool).copied().unwrap_or(0)
    }

    /// Returns the sum of all win counts, i.e. the number of minimizations
    /// performed.
    #[must_use]
    pub fn total_wins(&self) -> u64 {
        self.wins.values().sum()
    }

    /// Iterates over `(tool, wins)` pairs in tool-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.wins.iter().map(|(tool, &wins)| (tool.as_str(), wins))
    }
}

/// Finalized per-method arithmetic means for one k-mer size.
///
/// The two ratio kinds are named apart deliberately: `avg_ratio` compares
/// each method against its own uncompressed output, `avg_ratio_vs_source`
/// against the method-independent raw source sequence, which makes methods
/// comparable on a common baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MethodAverages {
    pub avg_ratio: f64,
    pub avg_ratio_vs_source: f64,
    pub avg_uncompressed: f64,
    pub avg_compressed: f64,
}

/// Per-method size vectors for one (sequence, k-mer size) cell, indexed in
/// method order.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SequenceSizes {
    pub sequence: String,
    pub uncompressed: Vec<ByteSize>,
    pub compressed: Vec<ByteSize>,
}

/// Everything computed for one k-mer size: raw per-sequence vectors plus the
/// finalized averages, both in method order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KmerSummary {
    pub kmer_size: KmerSize,
    pub sequences: Vec<SequenceSizes>,
    pub averages: Vec<MethodAverages>,
}

/// The complete output of one counts-mode aggregation pass, shaped for the
/// downstream rendering layer. Pure grouping — no numbers are computed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub counts_mode: CountsMode,
    /// Methods considered in this pass, defining the index order of every
    /// per-method vector below.
    pub methods: Vec<String>,
    /// One summary per k-mer size, in k-mer-size-list order.
    pub kmer_sizes: Vec<KmerSummary>,
    pub tally: ToolTally,
}
