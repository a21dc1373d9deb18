//! Matrix and JSON writers used by the CLI and the pipeline.

use crate::{Error, Result};
use ndarray::Array2;
use serde::Serialize;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write `matrix` as tab-separated rows, with an optional header line.
pub fn write_matrix_tsv<T, W, S>(out: &mut W, matrix: &Array2<T>, header: Option<&[S]>) -> Result<()>
where
    T: Display,
    W: Write,
    S: AsRef<str>,
{
    if let Some(h) = header {
        if h.len() != matrix.ncols() {
            return Err(Error::invalid_input(format!(
                "header has {} columns, matrix has {}",
                h.len(),
                matrix.ncols()
            )));
        }
        let line: Vec<&str> = h.iter().map(|s| s.as_ref()).collect();
        writeln!(out, "{}", line.join("\t"))?;
    }
    for row in matrix.rows() {
        let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
        writeln!(out, "{}", cells.join("\t"))?;
    }
    Ok(())
}

/// Matrix rendered as a TSV string.
pub fn matrix_to_tsv<T: Display, S: AsRef<str>>(matrix: &Array2<T>, header: Option<&[S]>) -> Result<String> {
    let mut buf = Vec::new();
    write_matrix_tsv(&mut buf, matrix, header)?;
    String::from_utf8(buf).map_err(|e| Error::parse(e.to_string()))
}

/// Write `matrix` to a TSV file.
pub fn save_matrix_tsv<T: Display, S: AsRef<str>>(
    path: impl AsRef<Path>,
    matrix: &Array2<T>,
    header: Option<&[S]>,
) -> Result<()> {
    let mut w = BufWriter::new(File::create(path.as_ref())?);
    write_matrix_tsv(&mut w, matrix, header)?;
    w.flush()?;
    log::debug!("Wrote {}x{} matrix to {:?}", matrix.nrows(), matrix.ncols(), path.as_ref());
    Ok(())
}

/// Write `value` as pretty JSON.
pub fn save_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let mut w = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(&mut w, value).map_err(|e| Error::parse(e.to_string()))?;
    w.flush()?;
    Ok(())
}
