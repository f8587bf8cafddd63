//! Loading and saving the JSON dataset file.

mod seed;
mod wire;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;

use crate::domain::Dataset;
use wire::{DatasetFile, DatasetFileRef};

pub use seed::{seed_dataset, DEFAULT_BULK_STUDENTS};

/// Storage abstraction so the enrollment service can be exercised in isolation.
pub trait DatasetStore {
    /// Always yields a usable dataset; problems are reported as a warning.
    fn load(&self) -> LoadOutcome;
    fn save(&self, dataset: &Dataset) -> Result<(), StoreError>;
}

/// Dataset produced by [`DatasetStore::load`] plus any recovered problem.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub dataset: Dataset,
    pub warning: Option<LoadWarning>,
}

/// Non-fatal load problems. The seed dataset was substituted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadWarning {
    #[error("data file {path:?} not found; starting from built-in data")]
    MissingFile { path: PathBuf },
    #[error("data file {path:?} is unusable ({reason}); starting from built-in data")]
    Corrupt { path: PathBuf, reason: String },
}

/// Error enumeration for save failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to encode dataset: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Pretty-printed JSON file store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    bulk_students: usize,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            bulk_students: DEFAULT_BULK_STUDENTS,
        }
    }

    /// Number of random students generated when falling back to seed data.
    pub fn with_seed_students(mut self, bulk_students: usize) -> Self {
        self.bulk_students = bulk_students;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn fallback(&self, warning: LoadWarning) -> LoadOutcome {
        tracing::warn!(%warning, "falling back to seed dataset");
        LoadOutcome {
            dataset: seed_dataset(self.bulk_students),
            warning: Some(warning),
        }
    }

    fn corrupt(&self, reason: impl ToString) -> LoadWarning {
        LoadWarning::Corrupt {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }

    fn write_err(&self, source: io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl DatasetStore for JsonFileStore {
    fn load(&self) -> LoadOutcome {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return self.fallback(LoadWarning::MissingFile {
                    path: self.path.clone(),
                });
            }
            Err(err) => return self.fallback(self.corrupt(err)),
        };

        let decoded = serde_json::from_str::<DatasetFile>(&contents)
            .map_err(|err| self.corrupt(err))
            .and_then(|file| file.decode().map_err(|err| self.corrupt(err)));

        match decoded {
            Ok(dataset) => {
                tracing::debug!(
                    path = ?self.path,
                    activities = dataset.activities.len(),
                    students = dataset.students.len(),
                    "dataset loaded"
                );
                LoadOutcome {
                    dataset,
                    warning: None,
                }
            }
            Err(warning) => self.fallback(warning),
        }
    }

    /// Writes to a sibling temporary file, then renames it over the target.
    fn save(&self, dataset: &Dataset) -> Result<(), StoreError> {
        let mut buffer = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(
            &mut buffer,
            PrettyFormatter::with_indent(b"    "),
        );
        DatasetFileRef::from(dataset).serialize(&mut serializer)?;
        buffer.push(b'\n');

        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(directory).map_err(|err| self.write_err(err))?;
        // Temp files start out owner-only; keep whatever mode the target already had.
        if let Ok(existing) = fs::metadata(&self.path) {
            staged
                .as_file()
                .set_permissions(existing.permissions())
                .map_err(|err| self.write_err(err))?;
        }
        staged
            .write_all(&buffer)
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|err| self.write_err(err))?;
        staged
            .persist(&self.path)
            .map_err(|err| self.write_err(err.error))?;

        tracing::debug!(path = ?self.path, bytes = buffer.len(), "dataset saved");
        Ok(())
    }
}
