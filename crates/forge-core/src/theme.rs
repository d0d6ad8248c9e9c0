//! Theme override resolution.
//!
//! A theme is a registry of component loaders. Resolution consults the child
//! theme first, then the core theme, and fails with the unresolved key when
//! neither has it. Nothing is memoized: removing a key from a registry stops
//! it resolving on the very next lookup.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::component::{Component, ComponentLoader, LoadError};

/// Errors from theme resolution.
#[derive(Error, Debug)]
pub enum ThemeError {
    /// No registered loader for the key in either theme layer.
    #[error("No component registered for key: {key}")]
    UnresolvedComponent { key: String },

    /// The winning loader failed.
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// A set of component loaders keyed by symbolic name.
#[derive(Default, Clone)]
pub struct ThemeRegistry {
    loaders: HashMap<String, Arc<dyn ComponentLoader>>,
}

impl ThemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a loader under a key, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, loader: Arc<dyn ComponentLoader>) {
        self.loaders.insert(key.into(), loader);
    }

    /// Remove a key. Resolution stops finding it immediately.
    pub fn remove(&mut self, key: &str) -> bool {
        self.loaders.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.loaders.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Arc<dyn ComponentLoader>> {
        self.loaders.get(key)
    }

    /// All registered keys, unordered.
    pub fn keys(&self) -> Vec<&str> {
        self.loaders.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

impl std::fmt::Debug for ThemeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeRegistry")
            .field("keys", &self.loaders.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Resolve a component key against a child theme and a core theme.
///
/// The child wins whenever it has the key; the core is the fallback. The
/// loader runs once per call.
pub async fn resolve_component(
    key: &str,
    child: Option<&ThemeRegistry>,
    core: Option<&ThemeRegistry>,
) -> Result<Component, ThemeError> {
    let loader = child
        .and_then(|registry| registry.get(key))
        .or_else(|| core.and_then(|registry| registry.get(key)));

    match loader {
        Some(loader) => Ok(loader.load().await?),
        None => Err(ThemeError::UnresolvedComponent {
            key: key.to_string(),
        }),
    }
}

/// A core theme plus an optional child overlay.
#[derive(Debug, Default)]
pub struct ThemeManager {
    core: ThemeRegistry,
    child: Option<ThemeRegistry>,
}

impl ThemeManager {
    pub fn new(core: ThemeRegistry) -> Self {
        Self { core, child: None }
    }

    pub fn with_child(mut self, child: ThemeRegistry) -> Self {
        self.child = Some(child);
        self
    }

    pub fn core(&self) -> &ThemeRegistry {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut ThemeRegistry {
        &mut self.core
    }

    pub fn child(&self) -> Option<&ThemeRegistry> {
        self.child.as_ref()
    }

    pub fn child_mut(&mut self) -> Option<&mut ThemeRegistry> {
        self.child.as_mut()
    }

    /// Resolve a key, child layer first.
    pub async fn component(&self, key: &str) -> Result<Component, ThemeError> {
        resolve_component(key, self.child.as_ref(), Some(&self.core)).await
    }

    /// Whether either layer can resolve the key.
    pub fn has_component(&self, key: &str) -> bool {
        self.child.as_ref().is_some_and(|c| c.contains(key)) || self.core.contains(key)
    }

    /// Union of keys across both layers, deduplicated, unordered.
    pub fn available_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.core.keys().iter().map(|k| k.to_string()).collect();
        if let Some(child) = &self.child {
            for key in child.keys() {
                if !self.core.contains(key) {
                    keys.push(key.to_string());
                }
            }
        }
        keys
    }
}
