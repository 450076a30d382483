//! Durable mirror of the stores' state.
//!
//! Every collection and scalar lives under its own key in a
//! [`KeyValueStore`]. [`Persistence`] is the thin JSON layer the stores talk
//! to: reads that fail for any reason come back as "absent", and writes are
//! fire-and-forget.

mod loro_store;
mod memory;
mod sqlite_store;

pub use loro_store::LoroStore;
pub use memory::MemoryStore;
pub use sqlite_store::SqliteStore;

use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{PlotlineError, Result};

/// Storage keys, one per collection or scalar.
pub mod keys {
    pub const PROJECTS: &str = "projects";
    pub const CHARACTERS: &str = "characters";
    pub const RELATIONSHIPS: &str = "relationships";
    pub const PLOT_POINTS: &str = "plotPoints";
    pub const RESEARCH_ITEMS: &str = "researchItems";
    pub const IDEAS: &str = "ideas";
    pub const CURRENT_PROJECT: &str = "currentProject";
    pub const USER: &str = "user";
}

/// A string-keyed durable store. Implementations are shared between the
/// session and domain stores, so all methods take `&self`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| PlotlineError::Storage("backend lock poisoned".to_string()))
}

/// JSON persistence over a [`KeyValueStore`].
#[derive(Clone)]
pub struct Persistence {
    backend: Arc<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Load and deserialize the value under `key`.
    ///
    /// Missing keys, backend failures and corrupt blobs all yield `None`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read persisted value");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring corrupt persisted value");
                None
            }
        }
    }

    /// Serialize and store `value` under `key`. Failures are logged, not returned.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to serialize value");
                return;
            }
        };

        if let Err(e) = self.backend.set(key, &json) {
            tracing::warn!(key, error = %e, "failed to persist value");
        }
    }

    /// Remove the value under `key`. Failures are logged, not returned.
    pub fn clear(&self, key: &str) {
        if let Err(e) = self.backend.remove(key) {
            tracing::warn!(key, error = %e, "failed to clear persisted value");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    /// A backend whose every call fails.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(PlotlineError::Storage("disk on fire".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(PlotlineError::Storage("disk on fire".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Err(PlotlineError::Storage("disk on fire".to_string()))
        }
    }

    #[test]
    fn test_save_then_load() {
        let persistence = Persistence::new(Arc::new(MemoryStore::new()));
        let sample = Sample {
            name: "Paul".to_string(),
            count: 2,
        };

        persistence.save("sample", &sample);
        assert_eq!(persistence.load::<Sample>("sample"), Some(sample));
    }

    #[test]
    fn test_missing_key_is_absent() {
        let persistence = Persistence::new(Arc::new(MemoryStore::new()));
        assert_eq!(persistence.load::<Sample>("nope"), None);
    }

    #[test]
    fn test_corrupt_value_is_absent() {
        let backend = Arc::new(MemoryStore::new());
        backend.set("sample", "{not json").unwrap();

        let persistence = Persistence::new(backend);
        assert_eq!(persistence.load::<Sample>("sample"), None);
    }

    #[test]
    fn test_wrong_shape_is_absent() {
        let backend = Arc::new(MemoryStore::new());
        backend.set("sample", r#"{"unexpected": true}"#).unwrap();

        let persistence = Persistence::new(backend);
        assert_eq!(persistence.load::<Sample>("sample"), None);
    }

    #[test]
    fn test_clear_removes_value() {
        let backend = Arc::new(MemoryStore::new());
        let persistence = Persistence::new(backend.clone());

        persistence.save("sample", &vec![1, 2, 3]);
        persistence.clear("sample");

        assert_eq!(backend.get("sample").unwrap(), None);
    }

    #[test]
    fn test_backend_failures_are_swallowed() {
        let persistence = Persistence::new(Arc::new(BrokenStore));

        persistence.save("sample", &vec![1, 2, 3]);
        persistence.clear("sample");
        assert_eq!(persistence.load::<Vec<u32>>("sample"), None);
    }
}
