//! Dataset name to directory path lookup.
//!
//! The comparison core only depends on [`DatasetPathResolver`]. The bundled
//! [`SqliteDatasetResolver`] reads a table of dataset folder paths:
//!
//! ```sql
//! CREATE TABLE dataset_folder_paths (
//!     dataset             TEXT PRIMARY KEY,
//!     dataset_folder_path TEXT,
//!     archive_folder_path TEXT
//! );
//! ```

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, OptionalExtension};

/// The two directories recorded for a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    /// Where the dataset lives on the storage server
    pub storage_path: PathBuf,
    /// Where the dataset was archived
    pub archive_path: PathBuf,
}

/// Errors from resolving a dataset name.
#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    /// No record exists for the dataset.
    #[error("Dataset '{dataset}' not found in {source_name}")]
    NotFound {
        dataset: String,
        source_name: String,
    },

    /// The record has no storage path.
    #[error("Dataset '{dataset}' has an empty dataset folder path (using {source_name})")]
    EmptyStoragePath {
        dataset: String,
        source_name: String,
    },

    /// The record has no archive path.
    #[error("Dataset '{dataset}' has an empty archive folder path (using {source_name})")]
    EmptyArchivePath {
        dataset: String,
        source_name: String,
    },

    /// No lookup database was configured.
    #[error("No dataset lookup database configured; use --dataset-db or set dataset_db in the config file")]
    NotConfigured,

    /// The lookup database could not be opened.
    #[error("Dataset lookup database not found: {0}")]
    DatabaseNotFound(PathBuf),

    /// The lookup query failed.
    #[error("Dataset lookup failed: {0}")]
    Query(#[from] rusqlite::Error),
}

/// Resolves a symbolic dataset name to its storage and archive directories.
pub trait DatasetPathResolver {
    /// Look up `dataset`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the dataset is unknown, either path is
    /// empty, or the lookup itself fails.
    fn resolve(&self, dataset: &str) -> Result<DatasetPaths, ResolveError>;
}

/// [`DatasetPathResolver`] backed by a SQLite database.
pub struct SqliteDatasetResolver {
    conn: Connection,
    source_name: String,
}

impl SqliteDatasetResolver {
    /// Open the lookup database read-only.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::DatabaseNotFound`] if the file does not exist,
    /// or [`ResolveError::Query`] if SQLite cannot open it.
    pub fn open(path: &Path) -> Result<Self, ResolveError> {
        if !path.is_file() {
            return Err(ResolveError::DatabaseNotFound(path.to_path_buf()));
        }

        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        log::debug!("Opened dataset lookup database {}", path.display());
        Ok(Self {
            conn,
            source_name: path.display().to_string(),
        })
    }

    /// Open the configured lookup database, if there is one.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotConfigured`] when `path` is `None`, otherwise
    /// the errors of [`SqliteDatasetResolver::open`].
    pub fn open_configured(path: Option<&Path>) -> Result<Self, ResolveError> {
        path.ok_or(ResolveError::NotConfigured).and_then(Self::open)
    }

    /// Wrap an existing connection.
    #[must_use]
    pub fn from_connection(conn: Connection, source_name: impl Into<String>) -> Self {
        Self {
            conn,
            source_name: source_name.into(),
        }
    }
}

impl DatasetPathResolver for SqliteDatasetResolver {
    fn resolve(&self, dataset: &str) -> Result<DatasetPaths, ResolveError> {
        let row: Option<(Option<String>, Option<String>)> = self
            .conn
            .query_row(
                "SELECT dataset_folder_path, archive_folder_path \
                 FROM dataset_folder_paths WHERE dataset = ?1 LIMIT 1",
                [dataset],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((storage, archive)) = row else {
            return Err(ResolveError::NotFound {
                dataset: dataset.to_string(),
                source_name: self.source_name.clone(),
            });
        };

        let storage = storage.unwrap_or_default();
        if storage.trim().is_empty() {
            return Err(ResolveError::EmptyStoragePath {
                dataset: dataset.to_string(),
                source_name: self.source_name.clone(),
            });
        }

        let archive = archive.unwrap_or_default();
        if archive.trim().is_empty() {
            return Err(ResolveError::EmptyArchivePath {
                dataset: dataset.to_string(),
                source_name: self.source_name.clone(),
            });
        }

        Ok(DatasetPaths {
            storage_path: PathBuf::from(storage),
            archive_path: PathBuf::from(archive),
        })
    }
}
