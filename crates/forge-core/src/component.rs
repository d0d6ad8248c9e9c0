//! Component descriptors and their loaders.
//!
//! A component is addressed by a stable symbolic name and produced by a
//! [`ComponentLoader`]. Loaders form a closed capability set wired up at
//! startup; there is no dynamic discovery, and no caching between calls.

use async_trait::async_trait;
use thiserror::Error;

/// A renderable unit, resolved by symbolic name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Stable symbolic name (e.g. "ProductCard").
    pub name: String,
    /// Path or identifier of the artifact that renders it.
    pub artifact: String,
}

impl Component {
    pub fn new(name: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artifact: artifact.into(),
        }
    }
}

/// Errors from component loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to load component: {0}")]
    Load(String),
}

/// Produces a [`Component`] on demand.
///
/// Invoked exactly once per resolution; callers never memoize the result, so
/// removing a loader from a registry takes effect immediately.
#[async_trait]
pub trait ComponentLoader: Send + Sync {
    async fn load(&self) -> Result<Component, LoadError>;
}

/// A loader that returns a prebuilt descriptor.
#[derive(Debug, Clone)]
pub struct StaticLoader {
    component: Component,
}

impl StaticLoader {
    pub fn new(component: Component) -> Self {
        Self { component }
    }
}

#[async_trait]
impl ComponentLoader for StaticLoader {
    async fn load(&self) -> Result<Component, LoadError> {
        Ok(self.component.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_loader_returns_descriptor() {
        let loader = StaticLoader::new(Component::new("ProductCard", "cards/product"));
        let component = loader.load().await.unwrap();
        assert_eq!(component.name, "ProductCard");
        assert_eq!(component.artifact, "cards/product");
    }
}
