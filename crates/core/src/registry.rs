//! Adapter registry with default and fallback selection.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use crate::adapter::Adapter;
use crate::model::AdapterInfo;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Adapter configuration error: {0}")]
    Configuration(String),
}

#[derive(Default)]
struct RegistryState {
    adapters: BTreeMap<String, Arc<dyn Adapter>>,
    default_id: Option<String>,
    fallback_id: Option<String>,
}

/// Holds every adapter keyed by id, plus the default and fallback choices.
///
/// Safe to share between request handlers: lookups take a shared lock,
/// registration and configuration take an exclusive one.
#[derive(Default)]
pub struct AdapterRegistry {
    state: RwLock<RegistryState>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace an adapter by id. Default and fallback are untouched.
    pub fn register(&self, adapter: Arc<dyn Adapter>) {
        let id = adapter.id().to_string();
        self.write().adapters.insert(id, adapter);
    }

    /// Choose the default and fallback adapters.
    ///
    /// An empty `default_id` keeps the current default, or picks the adapter
    /// with the smallest id if none was chosen yet. The default is committed
    /// before the fallback is checked, so a bad fallback still leaves a usable
    /// default. A fallback equal to the default means "no fallback".
    pub fn configure(&self, default_id: &str, fallback_id: &str) -> Result<(), RegistryError> {
        let mut state = self.write();

        if state.adapters.is_empty() {
            return Err(RegistryError::Configuration(
                "no adapters registered".to_string(),
            ));
        }

        if !default_id.is_empty() {
            if !state.adapters.contains_key(default_id) {
                return Err(RegistryError::Configuration(format!(
                    "default adapter '{}' is not registered",
                    default_id
                )));
            }
            state.default_id = Some(default_id.to_string());
        }

        let current_default_valid = state
            .default_id
            .as_ref()
            .is_some_and(|id| state.adapters.contains_key(id));
        if !current_default_valid {
            state.default_id = state.adapters.keys().next().cloned();
        }

        state.fallback_id = None;
        if fallback_id.is_empty() || state.default_id.as_deref() == Some(fallback_id) {
            return Ok(());
        }
        if !state.adapters.contains_key(fallback_id) {
            return Err(RegistryError::Configuration(format!(
                "fallback adapter '{}' is not registered",
                fallback_id
            )));
        }
        state.fallback_id = Some(fallback_id.to_string());
        Ok(())
    }

    /// Exact lookup by id.
    pub fn get(&self, id: &str) -> Option<Arc<dyn Adapter>> {
        self.read().adapters.get(id).cloned()
    }

    pub fn default_adapter(&self) -> Option<Arc<dyn Adapter>> {
        let state = self.read();
        state
            .default_id
            .as_ref()
            .and_then(|id| state.adapters.get(id))
            .cloned()
    }

    /// The default adapter id, or an empty string when none is configured.
    pub fn default_id(&self) -> String {
        self.read().default_id.clone().unwrap_or_default()
    }

    /// The configured fallback, unless it is `excluding_id`.
    pub fn fallback(&self, excluding_id: &str) -> Option<Arc<dyn Adapter>> {
        let state = self.read();
        state
            .fallback_id
            .as_ref()
            .filter(|id| id.as_str() != excluding_id)
            .and_then(|id| state.adapters.get(id))
            .cloned()
    }

    /// Adapter descriptors: default first, the rest by ascending id.
    pub fn list(&self) -> Vec<AdapterInfo> {
        let state = self.read();
        let default_id = state.default_id.as_deref();
        let fallback_id = state.fallback_id.as_deref();

        let mut infos: Vec<AdapterInfo> = state
            .adapters
            .iter()
            .map(|(id, adapter)| AdapterInfo {
                id: id.clone(),
                name: adapter.name().to_string(),
                description: adapter.description().to_string(),
                endpoint: adapter.endpoint().to_string(),
                is_default: Some(id.as_str()) == default_id,
                is_fallback: Some(id.as_str()) == fallback_id,
            })
            .collect();

        // BTreeMap iteration is already id-ascending; only the default moves.
        infos.sort_by_key(|info| !info.is_default);
        infos
    }

    pub fn len(&self) -> usize {
        self.read().adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().adapters.is_empty()
    }
}
