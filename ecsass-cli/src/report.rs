use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::Context;

pub(crate) const REPORT_HEADER: [&str; 3] = ["name", "length", "status"];
pub(crate) const STATUS_OK: &str = "ok";

/// CSV summary of a batch run: one record per table row.
#[derive(Debug)]
pub(crate) struct BatchReport<W: Write> {
    writer: Option<csv::Writer<W>>,
}

impl BatchReport<File> {
    pub fn create(path: Option<&Path>) -> anyhow::Result<Self> {
        let writer = match path {
            Some(path) => {
                let file = File::create(path).with_context(|| {
                    format!("Could not create the report file `{}`", path.display())
                })?;
                Some(file)
            }
            None => None,
        };

        Self::new(writer)
    }
}

impl<W: Write> BatchReport<W> {
    pub fn new(writer: Option<W>) -> anyhow::Result<Self> {
        let writer = match writer {
            Some(writer) => {
                let mut writer = csv::Writer::from_writer(writer);
                writer.write_record(REPORT_HEADER)?;
                Some(writer)
            }
            None => None,
        };

        Ok(Self { writer })
    }

    pub fn add_assembled(&mut self, name: &str, length: usize) -> anyhow::Result<()> {
        self.add_record(name, &length.to_string(), STATUS_OK)
    }

    pub fn add_failed(&mut self, name: &str, error: &str) -> anyhow::Result<()> {
        self.add_record(name, "", error)
    }

    fn add_record(&mut self, name: &str, length: &str, status: &str) -> anyhow::Result<()> {
        if let Some(writer) = &mut self.writer {
            writer.write_record([name, length, status])?;
        }

        Ok(())
    }

    pub fn flush(&mut self) -> anyhow::Result<()> {
        if let Some(writer) = &mut self.writer {
            writer.flush()?;
        }

        Ok(())
    }
}
