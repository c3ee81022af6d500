use std::io;

/// Optional CSV emission of the per-k-mer-size averages to the standard
/// output. A disabled instance swallows all writes, so command code can emit
/// records unconditionally.
#[derive(Debug)]
pub(crate) struct CsvReportOutput {
    writer: Option<csv::Writer<io::Stdout>>,
    initialized: bool,
}

impl CsvReportOutput {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        let writer = enabled.then(|| csv::Writer::from_writer(io::stdout()));

        Self {
            writer,
            initialized: false,
        }
    }

    pub fn use_header(&mut self, header: &[&str]) -> anyhow::Result<()> {
        if let Some(writer) = &mut self.writer {
            if !self.initialized {
                writer.write_record(header)?;
                self.initialized = true;
            }
        }

        anyhow::Ok(())
    }

    pub fn add_record<I, T>(&mut self, values: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        if let Some(writer) = &mut self.writer {
            writer.write_record(values)?;
        }

        anyhow::Ok(())
    }

    pub fn flush(&mut self) -> anyhow::Result<()> {
        if let Some(writer) = &mut self.writer {
            writer.flush()?;
        }

        anyhow::Ok(())
    }
}
