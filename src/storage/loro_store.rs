use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use loro::{LoroDoc, LoroValue, ValueOrContainer};

use super::{lock, KeyValueStore};
use crate::error::Result;

const LORO_DB: &str = "loro.db";
const CORRUPT_SUFFIX: &str = "corrupt";
const KV_MAP: &str = "kv";

/// Key-value store backed by a single Loro document.
///
/// Values live in one top-level map. The document is exported as a snapshot
/// and written to disk after every mutation.
pub struct LoroStore {
    doc: Mutex<LoroDoc>,
    path: PathBuf,
}

impl LoroStore {
    /// Open the document in `dir`, creating the directory and an empty
    /// document if needed.
    ///
    /// A snapshot that fails to import is moved to `loro.db.corrupt` and the
    /// store starts empty.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(LORO_DB);

        let mut doc = LoroDoc::new();
        if path.exists() {
            let bytes = fs::read(&path)?;
            if let Err(e) = doc.import(&bytes) {
                let aside = path.with_extension(format!("db.{}", CORRUPT_SUFFIX));
                tracing::warn!(
                    path = %path.display(),
                    moved_to = %aside.display(),
                    error = %e,
                    "ignoring unreadable snapshot"
                );
                fs::rename(&path, &aside)?;
                doc = LoroDoc::new();
            }
        }

        let store = Self {
            doc: Mutex::new(doc),
            path,
        };
        Ok(store)
    }

    /// Path of the snapshot file on disk
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, doc: &LoroDoc) -> Result<()> {
        doc.commit();
        let bytes = doc.export(loro::ExportMode::Snapshot)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

impl KeyValueStore for LoroStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let doc = lock(&self.doc)?;
        let map = doc.get_map(KV_MAP);

        let value = match map.get(key) {
            Some(ValueOrContainer::Value(LoroValue::String(s))) => Some(s.to_string()),
            _ => None,
        };
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let doc = lock(&self.doc)?;
        doc.get_map(KV_MAP).insert(key, value)?;
        self.persist(&doc)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let doc = lock(&self.doc)?;
        let map = doc.get_map(KV_MAP);
        if map.get(key).is_none() {
            return Ok(());
        }
        map.delete(key)?;
        self.persist(&doc)
    }
}
