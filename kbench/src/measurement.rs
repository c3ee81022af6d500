use std::fmt::{Display, Formatter};

use derive_more::{Add, AddAssign, Sum};
use serde::{Deserialize, Serialize};

/// Wire spelling of the uncompressed-baseline sentinel in the `compression`
/// column, and of the raw-source pseudo-method in the `method` column.
pub const NONE_TOKEN: &str = "none";

/// Number of bytes occupied by a measured output artifact.
#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Default,
    Add,
    AddAssign,
    Sum,
    Serialize,
    Deserialize,
)]
#[repr(transparent)]
pub struct ByteSize(u64);

impl ByteSize {
    pub const ZERO: ByteSize = ByteSize(0);

    #[inline]
    #[must_use]
    pub const fn new(bytes: u64) -> Self {
        Self(bytes)
    }

    #[inline]
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Returns the size as a float, for ratio arithmetic.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }
}

impl Display for ByteSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} B", self.0)
    }
}

/// Whether a method's output representation includes per-k-mer occurrence
/// counts (which requires an extra counts-bearing output file).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CountsMode {
    Counts,
    NoCounts,
}

impl CountsMode {
    pub const VALUES: [CountsMode; 2] = [CountsMode::Counts, CountsMode::NoCounts];

    /// Returns the wire/CLI name of this mode.
    ///
    /// # Examples
    /// ```
    /// use kbench::measurement::CountsMode;
    ///
    /// assert_eq!(CountsMode::Counts.name(), "counts");
    /// assert_eq!(CountsMode::NoCounts.name(), "no-counts");
    /// ```
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            CountsMode::Counts => "counts",
            CountsMode::NoCounts => "no-counts",
        }
    }

    /// Parses a wire token into a `CountsMode`.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "counts" => Some(CountsMode::Counts),
            "no-counts" => Some(CountsMode::NoCounts),
            _ => None,
        }
    }
}

impl Display for CountsMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Compression applied to an output artifact after it is produced.
///
/// `None` is the uncompressed baseline, spelled `none` in the result table.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Compression {
    None,
    Tool(String),
}

impl Compression {
    /// Parses a wire token into a `Compression`.
    ///
    /// # Examples
    /// ```
    /// use kbench::measurement::Compression;
    ///
    /// assert_eq!(Compression::from_token("none"), Compression::None);
    /// assert_eq!(
    ///     Compression::from_token("zstd"),
    ///     Compression::Tool("zstd".to_owned())
    /// );
    /// ```
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        if token == NONE_TOKEN {
            Compression::None
        } else {
            Compression::Tool(token.to_owned())
        }
    }

    #[inline]
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Compression::None)
    }

    /// Returns the tool name, or `None` for the uncompressed baseline.
    #[must_use]
    pub fn tool(&self) -> Option<&str> {
        match self {
            Compression::None => None,
            Compression::Tool(name) => Some(name),
        }
    }
}

impl Display for Compression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Compression::None => write!(f, "{}", NONE_TOKEN),
            Compression::Tool(name) => write!(f, "{}", name),
        }
    }
}

/// K-mer size grouping key.
///
/// The token is normalized once at construction: surrounding whitespace is
/// trimmed and integer-looking tokens are re-rendered canonically, so that
/// `" 21"`, `"021"` and `21` all compare equal. The result table and the
/// k-mer-size list sometimes disagree on the representation; normalizing at
/// the edge keeps the core comparing plain strings.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct KmerSize(String);

impl KmerSize {
    /// Creates a normalized `KmerSize` from a raw token.
    ///
    /// # Examples
    /// ```
    /// use kbench::measurement::KmerSize;
    ///
    /// assert_eq!(KmerSize::new(" 21"), KmerSize::new("21"));
    /// assert_eq!(KmerSize::new("021"), KmerSize::new("21"));
    /// assert_ne!(KmerSize::new("21"), KmerSize::new("31"));
    /// ```
    #[must_use]
    pub fn new<T: AsRef<str>>(token: T) -> Self {
        let token = token.as_ref().trim();

        match token.parse::<u64>() {
            Ok(value) => Self(value.to_string()),
            Err(_) => Self(token.to_owned()),
        }
    }

    /// Returns the normalized token as a string.
    #[inline]
    #[must_use]
    pub fn str(&self) -> &str {
        &self.0
    }
}

impl Display for KmerSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for KmerSize {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<u64> for KmerSize {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// A single benchmark measurement: the byte size of one output artifact of
/// one method, run over one sequence with one k-mer size, after one
/// compression step.
///
/// Rows are immutable facts produced by the benchmark runner; the analyzer
/// only reads them.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Measurement {
    sequence: String,
    method: String,
    counts_mode: CountsMode,
    kmer_size: KmerSize,
    file_type: String,
    compression: Compression,
    size: ByteSize,
}

impl Measurement {
    /// Creates a new `Measurement` row.
    ///
    /// # Examples
    /// ```
    /// use kbench::measurement::{ByteSize, Compression, CountsMode, Measurement};
    ///
    /// let row = Measurement::new(
    ///     "seqA",
    ///     "ust",
    ///     CountsMode::NoCounts,
    ///     21_u64,
    ///     "fasta",
    ///     Compression::Tool("zstd".to_owned()),
    ///     ByteSize::new(250),
    /// );
    /// assert_eq!(row.method(), "ust");
    /// assert_eq!(row.size(), ByteSize::new(250));
    /// ```
    #[must_use]
    pub fn new<S, M, K, F>(
        sequence: S,
        method: M,
        counts_mode: CountsMode,
        kmer_size: K,
        file_type: F,
        compression: Compression,
        size: ByteSize,
    ) -> Self
    where
        S: Into<String>,
        M: Into<String>,
        K: Into<KmerSize>,
        F: Into<String>,
    {
        Self {
            sequence: sequence.into(),
            method: method.into(),
            counts_mode,
            kmer_size: kmer_size.into(),
            file_type: file_type.into(),
            compression,
            size,
        }
    }

    #[inline]
    #[must_use]
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    #[inline]
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    #[inline]
    #[must_use]
    pub fn counts_mode(&self) -> CountsMode {
        self.counts_mode
    }

    #[inline]
    #[must_use]
    pub fn kmer_size(&self) -> &KmerSize {
        &self.kmer_size
    }

    #[inline]
    #[must_use]
    pub fn file_type(&self) -> &str {
        &self.file_type
    }

    #[inline]
    #[must_use]
    pub fn compression(&self) -> &Compression {
        &self.compression
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> ByteSize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use crate::measurement::{ByteSize, Compression, CountsMode, KmerSize, Measurement};

    #[test]
    fn test_byte_size_arithmetic() {
        let a = ByteSize::new(100);
        let b = ByteSize::new(23);

        assert_eq!(a + b, ByteSize::new(123));
        assert_eq!(
            [a, b].into_iter().sum::<ByteSize>(),
            ByteSize::new(123)
        );
        assert_eq!(ByteSize::ZERO.get(), 0);
        assert_eq!(format!("{}", a), "100 B");
    }

    #[test]
    fn test_counts_mode_tokens() {
        for mode in CountsMode::VALUES {
            assert_eq!(CountsMode::from_token(mode.name()), Some(mode));
        }
        assert_eq!(CountsMode::from_token("nocounts"), None);
    }

    #[test]
    fn test_compression_tokens() {
        assert!(Compression::from_token("none").is_none());
        assert_eq!(Compression::from_token("none").tool(), None);
        assert_eq!(Compression::from_token("gzip").tool(), Some("gzip"));
        assert_eq!(format!("{}", Compression::from_token("none")), "none");
        assert_eq!(format!("{}", Compression::from_token("xz")), "xz");
    }

    #[test]
    fn test_kmer_size_normalization() {
        assert_eq!(KmerSize::new("21"), KmerSize::from(21_u64));
        assert_eq!(KmerSize::new("  21\t"), KmerSize::new("21"));
        assert_eq!(KmerSize::new("0021"), KmerSize::new("21"));
        // non-numeric tokens pass through verbatim after trimming
        assert_eq!(KmerSize::new(" k21 ").str(), "k21");
    }

    #[test]
    fn test_measurement_accessors() {
        let row = Measurement::new(
            "seqA",
            "ust",
            CountsMode::Counts,
            "31",
            "counts",
            Compression::None,
            ByteSize::new(1000),
        );

        assert_eq!(row.sequence(), "seqA");
        assert_eq!(row.method(), "ust");
        assert_eq!(row.counts_mode(), CountsMode::Counts);
        assert_eq!(row.kmer_size(), &KmerSize::from(31_u64));
        assert_eq!(row.file_type(), "counts");
        assert!(row.compression().is_none());
        assert_eq!(row.size(), ByteSize::new(1000));
    }
}
