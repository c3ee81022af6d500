use std::fmt::Display;
use std::fs::File;
use std::io;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Default result table location when no positional path is given.
pub const DEFAULT_RESULTS_PATH: &str = "results/results.csv";

#[derive(Debug, Clone)]
pub struct InputFile {
    path: PathBuf,
}

impl Display for InputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

pub fn input_file(path: &str) -> Result<InputFile, String> {
    let result = InputFile {
        path: Path::new(path).to_path_buf(),
    };

    Ok(result)
}

impl InputFile {
    pub fn as_reader(&self) -> Result<InputReader, anyhow::Error> {
        InputReader::from_path(&self.path)
    }
}

pub fn input_stream(path: &str) -> Result<InputStream, String> {
    let result = InputStream {
        path: Path::new(path).to_path_buf(),
    };

    Ok(result)
}

/// Input path that also accepts `-` for the standard input.
#[derive(Debug, Clone)]
pub struct InputStream {
    path: PathBuf,
}

impl Display for InputStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl Default for InputStream {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_RESULTS_PATH),
        }
    }
}

impl InputStream {
    pub fn as_reader(&self) -> Result<InputReader, anyhow::Error> {
        InputReader::from_path(&self.path)
    }
}

#[derive(Debug)]
pub enum InputReader {
    Stdin(io::Stdin),
    File { file: File, path: PathBuf },
}

impl InputReader {
    fn from_path(path: &Path) -> anyhow::Result<Self> {
        let is_stdin = path.to_string_lossy() == "-";

        let val = if is_stdin {
            Self::Stdin(io::stdin())
        } else {
            let file = File::open(path)?;

            Self::File {
                file,
                path: path.to_owned(),
            }
        };
        Ok(val)
    }

    pub fn file_path(&self) -> Option<&Path> {
        match self {
            InputReader::Stdin(_) => None,
            InputReader::File { path, .. } => Some(path),
        }
    }

    #[must_use]
    pub fn into_read(self) -> Box<dyn Read + Send> {
        match self {
            InputReader::Stdin(stdin) => Box::new(stdin),
            InputReader::File { file, .. } => Box::new(file),
        }
    }
}
