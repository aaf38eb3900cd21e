use crate::error::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct ForecastWriter;

impl ForecastWriter {
    /// One value per line; an existing file at `path` is overwritten.
    pub fn write<P: AsRef<Path>>(values: &[f64], path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        for value in values {
            writeln!(writer, "{}", value)?;
        }
        writer.flush()?;

        log::info!("Wrote {} forecast values to {}", values.len(), path.as_ref().display());
        Ok(())
    }

    /// Pretty-printed JSON, overwriting any existing file.
    pub fn write_json<T: Serialize, P: AsRef<Path>>(record: &T, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer_pretty(&mut writer, record)?;
        writer.flush()?;
        Ok(())
    }
}
