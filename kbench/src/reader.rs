use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Read;

use crate::measurement::{ByteSize, Compression, CountsMode, KmerSize, Measurement};
use crate::table::ResultTable;

const COLUMNS: [&str; 7] = [
    "sequence",
    "method",
    "counts",
    "kmer_size",
    "file_type",
    "compression",
    "size",
];

/// Error occurring during parsing a result CSV file.
#[derive(Debug)]
pub enum ResultReaderError {
    /// Low-level CSV error (I/O, quoting, uneven record length).
    CsvError(csv::Error),
    /// The header row is missing one of the expected columns.
    MissingColumn(String),
    /// The `counts` field is neither `counts` nor `no-counts`.
    InvalidCountsMode { line: u64, value: String },
    /// The `size` field is not a non-negative integer.
    InvalidSize { line: u64, value: String },
    /// A required field is empty.
    EmptyField { line: u64, column: &'static str },
}

impl From<csv::Error> for ResultReaderError {
    fn from(e: csv::Error) -> Self {
        Self::CsvError(e)
    }
}

impl Display for ResultReaderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultReaderError::CsvError(e) => write!(f, "CSV error: {}", e),
            ResultReaderError::MissingColumn(column) => {
                write!(f, "Missing column `{}` in the header row", column)
            }
            ResultReaderError::InvalidCountsMode { line, value } => {
                write!(f, "Invalid counts mode `{}` at line {}", value, line)
            }
            ResultReaderError::InvalidSize { line, value } => {
                write!(f, "Invalid size `{}` at line {}", value, line)
            }
            ResultReaderError::EmptyField { line, column } => {
                write!(f, "Empty `{}` field at line {}", column, line)
            }
        }
    }
}

impl Error for ResultReaderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ResultReaderError::CsvError(e) => Some(e),
            _ => None,
        }
    }
}

/// The result of a result-table reading operation.
pub type ResultReaderResult<T> = Result<T, ResultReaderError>;

/// Reads a benchmark result table from CSV data.
///
/// The input must carry a header row with the columns
/// `sequence,method,counts,kmer_size,file_type,compression,size` (any column
/// order). String fields are trimmed; `kmer_size` tokens are normalized by
/// [`KmerSize::new`] so the table and the k-mer-size list compare equal even
/// when one side spells sizes as padded integers.
///
/// # Examples
/// ```
/// use kbench::reader::read_results;
///
/// let csv = "\
/// sequence,method,counts,kmer_size,file_type,compression,size
/// seqA,ust,no-counts,21,fasta,none,1000
/// seqA,ust,no-counts,21,fasta,zstd,250
/// ";
/// let table = read_results(csv.as_bytes()).unwrap();
/// assert_eq!(table.len(), 2);
/// ```
///
/// # Errors
/// Fails on the first malformed record, naming the line and field.
pub fn read_results<R: Read>(reader: R) -> ResultReaderResult<ResultTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut indices = [0_usize; COLUMNS.len()];
    for (i, column) in COLUMNS.iter().enumerate() {
        indices[i] = headers
            .iter()
            .position(|header| header == *column)
            .ok_or_else(|| ResultReaderError::MissingColumn((*column).to_owned()))?;
    }
    let [sequence_idx, method_idx, counts_idx, kmer_size_idx, file_type_idx, compression_idx, size_idx] =
        indices;

    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |pos| pos.line());

        let field = |idx: usize, column: &'static str| -> ResultReaderResult<&str> {
            match record.get(idx) {
                Some(value) if !value.is_empty() => Ok(value),
                _ => Err(ResultReaderError::EmptyField { line, column }),
            }
        };

        let counts_token = field(counts_idx, "counts")?;
        let counts_mode = CountsMode::from_token(counts_token).ok_or_else(|| {
            ResultReaderError::InvalidCountsMode {
                line,
                value: counts_token.to_owned(),
            }
        })?;

        let size_token = field(size_idx, "size")?;
        let size = size_token
            .parse::<u64>()
            .map_err(|_| ResultReaderError::InvalidSize {
                line,
                value: size_token.to_owned(),
            })?;

        rows.push(Measurement::new(
            field(sequence_idx, "sequence")?,
            field(method_idx, "method")?,
            counts_mode,
            KmerSize::new(field(kmer_size_idx, "kmer_size")?),
            field(file_type_idx, "file_type")?,
            Compression::from_token(field(compression_idx, "compression")?),
            ByteSize::new(size),
        ));
    }

    Ok(ResultTable::new(rows))
}
