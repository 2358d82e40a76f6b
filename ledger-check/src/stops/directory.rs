//! Stop directory: stop id → display name and stop kind.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

use super::error::StopDirectoryError;
use crate::domain::StopId;

/// One row of the directory CSV (`stop_id,name,is_real`).
#[derive(Debug, Deserialize)]
struct StopRow {
    stop_id: u32,
    name: String,
    is_real: bool,
}

/// What the directory knows about a stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopInfo {
    /// Display name
    pub name: String,
    /// Whether this is a passenger stop rather than a timing point
    pub is_real: bool,
}

/// Stop id lookup.
///
/// Unknown ids resolve to their number as the name and count as real stops,
/// so a ledger can be checked without a directory at all.
#[derive(Debug, Clone, Default)]
pub struct StopDirectory {
    stops: HashMap<StopId, StopInfo>,
}

impl StopDirectory {
    /// Create an empty directory.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the directory from a CSV file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StopDirectoryError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| StopDirectoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let directory = Self::from_reader(file, path)?;
        info!(stops = directory.len(), path = %path.display(), "loaded stop directory");
        Ok(directory)
    }

    /// Read the directory from CSV. `path` is only used in error messages.
    pub fn from_reader<R: Read>(reader: R, path: &Path) -> Result<Self, StopDirectoryError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut stops = HashMap::new();
        for result in reader.deserialize() {
            let row: StopRow = result.map_err(|source| StopDirectoryError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
            let info = StopInfo {
                name: row.name,
                is_real: row.is_real,
            };
            if stops.insert(StopId(row.stop_id), info).is_some() {
                return Err(StopDirectoryError::Duplicate {
                    path: path.to_path_buf(),
                    stop_id: row.stop_id,
                });
            }
        }

        Ok(Self { stops })
    }

    /// Add or replace one stop.
    pub fn insert(&mut self, id: StopId, info: StopInfo) {
        self.stops.insert(id, info);
    }

    /// Look up a stop.
    pub fn get(&self, id: StopId) -> Option<&StopInfo> {
        self.stops.get(&id)
    }

    /// Returns the stop's display name.
    pub fn name(&self, id: StopId) -> String {
        self.get(id)
            .map(|info| info.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Returns whether the stop is a real passenger stop.
    pub fn is_real(&self, id: StopId) -> bool {
        self.get(id).is_none_or(|info| info.is_real)
    }

    /// Get the number of stops in the directory.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Check if the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}
