#![deny(warnings)]

//! Persistence layer: JSON snapshot files and source dumps.
//!
//! A snapshot file is a versioned header followed by the snapshot tables,
//! all in one JSON object. A source dump is a [`MemorySource`] with the
//! same version header plus optional turn markers.

use chrono::{DateTime, Utc};
use ec_core::{GameCode, MemorySource, Snapshot, TurnKey};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Current on-disk format version.
pub const FORMAT_VERSION: u32 = 1;

/// Errors reading or writing persisted files.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: malformed file: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("{}: unsupported format version {found}", .path.display())]
    UnsupportedVersion { path: PathBuf, found: u32 },
}

/// A turn with the wall-clock window it was played in, when known.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnMarker {
    pub year: i32,
    pub quarter: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

impl TurnMarker {
    pub fn key(&self) -> TurnKey {
        TurnKey::new(self.year, self.quarter)
    }
}

impl From<TurnKey> for TurnMarker {
    fn from(turn: TurnKey) -> Self {
        Self {
            year: turn.year,
            quarter: turn.quarter,
            start: None,
            end: None,
        }
    }
}

fn default_version() -> u32 {
    FORMAT_VERSION
}

/// On-disk form of a [`Snapshot`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotFile {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "is_unnamed")]
    pub game: GameCode,
    pub turn: TurnMarker,
    #[serde(flatten)]
    pub snapshot: Snapshot,
}

fn is_unnamed(game: &GameCode) -> bool {
    game.0.is_empty()
}

impl SnapshotFile {
    /// Wrap a snapshot, taking game and turn from it.
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            version: FORMAT_VERSION,
            game: snapshot.game.clone(),
            turn: snapshot.turn.into(),
            snapshot,
        }
    }

    /// Replace the turn marker, keeping the snapshot's turn in step.
    pub fn with_marker(mut self, marker: TurnMarker) -> Self {
        self.snapshot.turn = marker.key();
        self.turn = marker;
        self
    }

    /// The snapshot with game and turn restored from the header.
    pub fn into_snapshot(self) -> Snapshot {
        let mut snapshot = self.snapshot;
        snapshot.game = self.game;
        snapshot.turn = self.turn.key();
        snapshot
    }
}

/// On-disk form of a [`MemorySource`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceDump {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Known turn windows, used to stamp extracted snapshots.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub turns: Vec<TurnMarker>,
    #[serde(flatten)]
    pub source: MemorySource,
}

impl SourceDump {
    pub fn new(source: MemorySource) -> Self {
        Self {
            version: FORMAT_VERSION,
            turns: Vec::new(),
            source,
        }
    }

    /// The marker recorded for `turn`, or a bare one.
    pub fn marker(&self, turn: TurnKey) -> TurnMarker {
        self.turns
            .iter()
            .find(|m| m.key() == turn)
            .cloned()
            .unwrap_or_else(|| turn.into())
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, PersistenceError> {
    let text = fs::read_to_string(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| PersistenceError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

fn check_version(path: &Path, found: u32) -> Result<(), PersistenceError> {
    if found != FORMAT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            path: path.to_path_buf(),
            found,
        });
    }
    Ok(())
}

/// Write pretty JSON next to `path` and rename it into place, so readers
/// never see a partial file.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    let tmp = path.with_extension("json.tmp");
    let io_err = |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&tmp, text).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}

pub fn read_snapshot_file(path: &Path) -> Result<SnapshotFile, PersistenceError> {
    let file: SnapshotFile = read_json(path)?;
    check_version(path, file.version)?;
    debug!(path = %path.display(), game = %file.game, turn = %file.turn.key(), "snapshot read");
    Ok(file)
}

pub fn write_snapshot_file(path: &Path, file: &SnapshotFile) -> Result<(), PersistenceError> {
    write_json(path, file)?;
    info!(path = %path.display(), game = %file.game, turn = %file.turn.key(), "snapshot written");
    Ok(())
}

pub fn read_source_dump(path: &Path) -> Result<SourceDump, PersistenceError> {
    let dump: SourceDump = read_json(path)?;
    check_version(path, dump.version)?;
    debug!(
        path = %path.display(),
        game = %dump.source.game,
        chunks = dump.source.chunks.len(),
        "source dump read"
    );
    Ok(dump)
}

pub fn write_source_dump(path: &Path, dump: &SourceDump) -> Result<(), PersistenceError> {
    write_json(path, dump)?;
    info!(path = %path.display(), game = %dump.source.game, "source dump written");
    Ok(())
}
