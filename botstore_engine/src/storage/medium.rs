use std::{
    io,
    path::{Path, PathBuf},
};

use log::*;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::fs;

use crate::db_types::StorageMediumKind;

pub const ORDERS_DOCUMENT: &str = "orders.json";
pub const USERS_DOCUMENT: &str = "users.json";
/// Appended to a document's name for the copy kept when its contents cannot be used at all.
pub const CORRUPT_SUFFIX: &str = ".corrupt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageMedium {
    /// One pretty-printed JSON array per collection, in the given directory.
    JsonFiles(PathBuf),
    /// Nothing is persisted. Data lives for as long as the process does.
    Volatile,
}

/// A collection read back from a document, and whether the document needs rewriting because it was missing or
/// damaged.
pub(crate) struct LoadedDocument<T> {
    pub records: Vec<T>,
    pub needs_rewrite: bool,
    /// The whole document was unusable and is being reset to an empty collection.
    pub discarded: bool,
}

impl<T> LoadedDocument<T> {
    fn empty(needs_rewrite: bool) -> Self {
        Self { records: vec![], needs_rewrite, discarded: false }
    }

    fn discarded() -> Self {
        Self { records: vec![], needs_rewrite: true, discarded: true }
    }
}

impl StorageMedium {
    pub fn kind(&self) -> StorageMediumKind {
        match self {
            Self::JsonFiles(_) => StorageMediumKind::JsonFiles,
            Self::Volatile => StorageMediumKind::Volatile,
        }
    }

    /// Writes `records` to `document` via a temporary file and a rename, so that readers never see a partial write.
    pub(crate) async fn write_document<T: Serialize>(&self, document: &str, records: &[T]) -> io::Result<()> {
        let dir = match self {
            Self::JsonFiles(dir) => dir,
            Self::Volatile => return Ok(()),
        };
        let json = serde_json::to_vec_pretty(records).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let path = dir.join(document);
        let tmp = dir.join(format!("{document}.tmp"));
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &path).await?;
        trace!("💾️ Wrote {} records to {}", records.len(), path.display());
        Ok(())
    }

    /// Reads a collection document, healing what it can.
    ///
    /// A missing or empty document is an empty collection. A document that is not a JSON array is reset. Records that
    /// do not deserialize are dropped.
    pub(crate) async fn read_document<T: DeserializeOwned>(&self, document: &str) -> io::Result<LoadedDocument<T>> {
        let dir = match self {
            Self::JsonFiles(dir) => dir,
            Self::Volatile => return Ok(LoadedDocument::empty(false)),
        };
        let path = dir.join(document);
        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("💾️ {} does not exist yet. Initialising it", path.display());
                return Ok(LoadedDocument::empty(true));
            },
            Err(e) => return Err(e),
        };
        let mut loaded = parse_collection(&path, &text);
        if loaded.discarded {
            let backup = dir.join(format!("{document}{CORRUPT_SUFFIX}"));
            match fs::write(&backup, &text).await {
                Ok(()) => warn!("💾️ The unusable contents of {} were saved to {}", path.display(), backup.display()),
                Err(e) => {
                    warn!("💾️ Could not back up {} ({e}). Leaving it as it is", path.display());
                    loaded.needs_rewrite = false;
                },
            }
        }
        Ok(loaded)
    }
}

fn parse_collection<T: DeserializeOwned>(path: &Path, text: &str) -> LoadedDocument<T> {
    if text.trim().is_empty() {
        return LoadedDocument::empty(true);
    }
    let items = match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            warn!("💾️ {} is not a JSON array. Resetting it to an empty collection", path.display());
            return LoadedDocument::discarded();
        },
        Err(e) => {
            warn!("💾️ {} is not valid JSON ({e}). Resetting it to an empty collection", path.display());
            return LoadedDocument::discarded();
        },
    };
    let total = items.len();
    let records = items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| {
            serde_json::from_value::<T>(item)
                .map_err(|e| warn!("💾️ Dropping record #{i} of {}. {e}", path.display()))
                .ok()
        })
        .collect::<Vec<T>>();
    let needs_rewrite = records.len() != total;
    LoadedDocument { records, needs_rewrite, discarded: false }
}

/// True if the error means the medium cannot be written to at all, as opposed to a transient failure. A data
/// directory that sits below a regular file can never be written either.
pub(crate) fn is_read_only(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem | io::ErrorKind::NotADirectory
    )
}
