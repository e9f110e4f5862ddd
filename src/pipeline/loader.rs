//! Dataset loader for the German Credit CSV file

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use polars::prelude::*;

use super::schema::{validate_schema, DataLoadError};

/// Default number of rows used for CSV schema inference
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 10000;

/// Shape and size of a loaded dataset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetStats {
    pub rows: usize,
    pub columns: usize,
    pub memory_mb: f64,
}

impl DatasetStats {
    pub fn of(df: &DataFrame) -> Self {
        let (rows, columns) = df.shape();
        Self {
            rows,
            columns,
            memory_mb: df.estimated_size() as f64 / (1024.0 * 1024.0),
        }
    }
}

fn check_csv_path(path: &Path) -> Result<(), DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::NotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if extension != "csv" {
        return Err(DataLoadError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        });
    }

    Ok(())
}

/// Load and validate the dataset.
///
/// Fails without returning any rows if the file is missing, unreadable or
/// violates the fixed schema.
pub fn load_dataset(path: &Path) -> Result<DataFrame, DataLoadError> {
    load_dataset_with_schema_length(path, DEFAULT_INFER_SCHEMA_LENGTH)
}

/// Load and validate the dataset using `infer_schema_length` rows for type
/// inference (0 means full scan).
pub fn load_dataset_with_schema_length(
    path: &Path,
    infer_schema_length: usize,
) -> Result<DataFrame, DataLoadError> {
    check_csv_path(path)?;

    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let read_error = |source| DataLoadError::Read {
        path: path.to_path_buf(),
        source,
    };

    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(schema_length)
        .finish()
        .map_err(read_error)?
        .collect()
        .map_err(read_error)?;

    validate_schema(&df)?;

    log::info!(
        "loaded {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );

    Ok(df)
}

/// Read only the header of a CSV file
pub fn get_column_names(path: &Path) -> Result<Vec<String>, DataLoadError> {
    check_csv_path(path)?;

    let schema = LazyCsvReader::new(path)
        .with_has_header(true)
        .finish()
        .and_then(|mut lf| lf.collect_schema())
        .map_err(|source| DataLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(schema.iter_names().map(|s| s.to_string()).collect())
}

/// Load-once holder for the base table.
///
/// The first successful `get` reads the file; later calls hand out the same
/// immutable frame. A failed load is not cached, so the caller sees the
/// error on every attempt.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    infer_schema_length: usize,
    frame: OnceLock<Arc<DataFrame>>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_schema_length(path, DEFAULT_INFER_SCHEMA_LENGTH)
    }

    pub fn with_schema_length(path: impl Into<PathBuf>, infer_schema_length: usize) -> Self {
        Self {
            path: path.into(),
            infer_schema_length,
            frame: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.frame.get().is_some()
    }

    pub fn get(&self) -> Result<Arc<DataFrame>, DataLoadError> {
        if let Some(df) = self.frame.get() {
            log::debug!("dataset cache hit for {}", self.path.display());
            return Ok(Arc::clone(df));
        }

        let df = Arc::new(load_dataset_with_schema_length(
            &self.path,
            self.infer_schema_length,
        )?);

        // Another thread may have won the race; either frame is identical
        Ok(Arc::clone(self.frame.get_or_init(|| df)))
    }
}
