//! In-memory session store: uploaded datasets and their latest profiles,
//! keyed by an opaque session id.
//!
//! The store is passed explicitly to whoever needs it; clones share state.
//!
//! ```
//! use tabscope::analyser::logic::{Dataset, Profiler, RawValue};
//! use tabscope::session::SessionStore;
//!
//! let store = SessionStore::new();
//! let dataset = Dataset::new(
//!     vec!["x".to_owned()],
//!     vec![vec![RawValue::Int(1)], vec![RawValue::Int(2)]],
//! )?;
//! let id = store.register(dataset);
//!
//! let profile = store.profile(&Profiler::default(), &id, None)?;
//! assert_eq!(profile.shape(), (2, 1));
//! # Ok::<(), tabscope::error::ProfileError>(())
//! ```

use crate::analyser::logic::{Dataset, DatasetProfile, Profiler};
use crate::error::Result;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

/// Anything that can resolve a session id to a dataset.
pub trait DatasetSource {
    fn dataset(&self, session_id: &str) -> Option<Arc<Dataset>>;
}

impl DatasetSource for HashMap<String, Arc<Dataset>> {
    fn dataset(&self, session_id: &str) -> Option<Arc<Dataset>> {
        self.get(session_id).cloned()
    }
}

#[derive(Clone, Default)]
pub struct SessionStore {
    datasets: Arc<RwLock<HashMap<String, Arc<Dataset>>>>,
    profiles: Arc<RwLock<HashMap<String, Arc<DatasetProfile>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the dataset under a fresh UUID v4 and returns the id.
    pub fn register(&self, dataset: Dataset) -> String {
        let id = Uuid::new_v4().to_string();
        self.register_as(&id, dataset);
        id
    }

    /// Stores the dataset under `session_id`, replacing any previous upload.
    /// A profile of the replaced dataset is discarded.
    pub fn register_as(&self, session_id: &str, dataset: Dataset) {
        self.datasets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session_id.to_owned(), Arc::new(dataset));
        self.profiles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session_id);
        tracing::debug!(session_id, "Dataset registered");
    }

    /// Drops the dataset and its profile. Returns whether the session existed.
    pub fn remove(&self, session_id: &str) -> bool {
        self.profiles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session_id);
        self.datasets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session_id)
            .is_some()
    }

    /// Sorted session ids.
    pub fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .datasets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.datasets.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Profiles the session's dataset and keeps the result as its latest profile.
    /// A previous profile is superseded, never modified.
    ///
    /// # Errors
    ///
    /// Unknown session, or any input error from the profiler. Nothing is stored on failure.
    pub fn profile(
        &self,
        profiler: &Profiler,
        session_id: &str,
        target: Option<&str>,
    ) -> Result<Arc<DatasetProfile>> {
        let profile = Arc::new(profiler.profile_session(self, session_id, target)?);
        self.profiles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session_id.to_owned(), Arc::clone(&profile));
        Ok(profile)
    }

    pub fn latest_profile(&self, session_id: &str) -> Option<Arc<DatasetProfile>> {
        self.profiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session_id)
            .cloned()
    }
}

impl DatasetSource for SessionStore {
    fn dataset(&self, session_id: &str) -> Option<Arc<Dataset>> {
        self.datasets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session_id)
            .cloned()
    }
}
