//! Where weeks and staff are kept between runs.

use crate::{
    config::RosterConfig,
    data::{RosterWeek, StaffMember},
};
use chrono::NaiveDate;
use miette::Diagnostic;
use rustc_hash::FxHashMap;
use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Error reading or writing roster data.
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    /// Error involving filesystem
    #[error("could not access {}", path.display())]
    #[diagnostic(help("make sure the data directory exists and is writable"))]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },

    /// File contents are not the expected JSON.
    #[error("malformed data in {}", path.display())]
    #[diagnostic(help("fix or remove the file; a removed week is provisioned again"))]
    Json {
        /// File that failed.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Read/write access to stored roster data.
pub trait RosterStore {
    /// The week starting on `start`, if one has been saved.
    fn load_week(&self, start: NaiveDate) -> Result<Option<RosterWeek>, StoreError>;

    /// Save `week`, replacing any week with the same start date.
    fn save_week(&mut self, week: &RosterWeek) -> Result<(), StoreError>;

    /// Every staff member who has not been deleted.
    fn load_staff(&self) -> Result<Vec<StaffMember>, StoreError>;
}

/// The week starting on `start`, provisioned from `config` and saved if it does not exist yet.
pub fn week_or_provision<S: RosterStore + ?Sized>(
    store: &mut S,
    config: &RosterConfig,
    start: NaiveDate,
) -> Result<RosterWeek, StoreError> {
    if let Some(week) = store.load_week(start)? {
        return Ok(week);
    }
    tracing::info!(%start, "no stored week; provisioning a new one");
    let week = RosterWeek::provision(start, config);
    store.save_week(&week)?;
    Ok(week)
}

/// The week starting on `start`, or a freshly provisioned one that is not saved.
///
/// For callers that must leave the store untouched.
pub fn week_or_blank<S: RosterStore + ?Sized>(
    store: &S,
    config: &RosterConfig,
    start: NaiveDate,
) -> Result<RosterWeek, StoreError> {
    Ok(store
        .load_week(start)?
        .unwrap_or_else(|| RosterWeek::provision(start, config)))
}

/// Store that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Weeks by start date.
    pub weeks: FxHashMap<NaiveDate, RosterWeek>,
    /// Every staff member, deleted or not.
    pub staff: Vec<StaffMember>,
}

impl RosterStore for MemoryStore {
    fn load_week(&self, start: NaiveDate) -> Result<Option<RosterWeek>, StoreError> {
        Ok(self.weeks.get(&start).cloned())
    }

    fn save_week(&mut self, week: &RosterWeek) -> Result<(), StoreError> {
        self.weeks.insert(week.start, week.clone());
        Ok(())
    }

    fn load_staff(&self) -> Result<Vec<StaffMember>, StoreError> {
        Ok(self.staff.iter().filter(|s| !s.deleted).cloned().collect())
    }
}

/// Store backed by a directory of JSON files:
///
/// ```text
/// <root>/staff.json
/// <root>/weeks/2019-01-01.json
/// ```
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    /// Use the directory at `root`. Nothing is touched until the first read or write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the staff list.
    pub fn staff_path(&self) -> PathBuf {
        self.root.join("staff.json")
    }

    /// Path of the week starting on `start`.
    pub fn week_path(&self, start: NaiveDate) -> PathBuf {
        self.root
            .join("weeks")
            .join(format!("{}.json", start.format("%Y-%m-%d")))
    }

    /// Open `path` for reading, or [`None`] if it does not exist.
    fn open(path: &Path) -> Result<Option<BufReader<File>>, StoreError> {
        match File::open(path) {
            Ok(file) => Ok(Some(BufReader::new(file))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn read<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
        Self::open(path)?
            .map(|reader| {
                serde_json::from_reader(reader).map_err(|source| StoreError::Json {
                    path: path.to_path_buf(),
                    source,
                })
            })
            .transpose()
    }
}

impl RosterStore for JsonDirStore {
    #[tracing::instrument(level = "debug", skip(self))]
    fn load_week(&self, start: NaiveDate) -> Result<Option<RosterWeek>, StoreError> {
        Self::read(&self.week_path(start))
    }

    #[tracing::instrument(level = "debug", skip_all, fields(week = %week.start))]
    fn save_week(&mut self, week: &RosterWeek) -> Result<(), StoreError> {
        let path = self.week_path(week.start);
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };

        let dir = path.parent().unwrap_or(self.root.as_path());
        std::fs::create_dir_all(dir).map_err(io_err)?;

        // the live file is only ever replaced whole; a failed write drops the temp file
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, week).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?;
            writer.flush().map_err(io_err)?;
        }
        tmp.persist(&path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn load_staff(&self) -> Result<Vec<StaffMember>, StoreError> {
        let path = self.staff_path();
        let Some(staff) = Self::read::<Vec<StaffMember>>(&path)? else {
            tracing::warn!(path = %path.display(), "no staff file; treating staff list as empty");
            return Ok(Vec::new());
        };
        Ok(staff.into_iter().filter(|s| !s.deleted).collect())
    }
}
