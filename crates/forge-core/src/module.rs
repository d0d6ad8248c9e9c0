//! Module descriptors.
//!
//! A module bundles the pages, component overrides, hooks and settings one
//! storefront feature contributes. Modules are immutable once built and are
//! shared as `Arc<Module>`.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::component::{ComponentLoader, LoadError};
use crate::context::{AppContext, RequestContext};

/// Errors from the module system.
#[derive(Error, Debug)]
pub enum ModuleError {
    /// A module name was re-requested while its own load was in progress.
    #[error("Circular dependency detected: {0}")]
    CircularDependency(String),

    /// The source has no module under this name.
    #[error("Module not found: {0}")]
    NotFound(String),

    /// Acquisition failed for a known name.
    #[error("Failed to load module {name}: {message}")]
    Acquire { name: String, message: String },

    /// No registered page for a route.
    #[error("No page registered for route: {0}")]
    PageNotFound(String),

    /// No registered component for a key.
    #[error("No component registered for key: {0}")]
    ComponentNotFound(String),

    /// A page or component loader failed.
    #[error(transparent)]
    Component(#[from] LoadError),
}

/// Lifecycle hooks a module may provide.
#[derive(Clone, Default)]
pub struct ModuleHooks {
    /// Runs once when the module is loaded.
    pub on_init: Option<Arc<dyn Fn(&AppContext) + Send + Sync>>,
    /// Runs for each request routed through the module's pages.
    pub on_request: Option<Arc<dyn Fn(&RequestContext) + Send + Sync>>,
}

impl std::fmt::Debug for ModuleHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleHooks")
            .field("on_init", &self.on_init.is_some())
            .field("on_request", &self.on_request.is_some())
            .finish()
    }
}

/// A storefront feature module.
pub struct Module {
    /// Unique module name (e.g. "cart").
    pub name: String,
    /// Names of modules this one declares a dependency on. Recorded for
    /// tooling; load order is the order modules are requested in.
    pub depends_on: Vec<String>,
    /// Route → page loader contributions.
    pub pages: Vec<(String, Arc<dyn ComponentLoader>)>,
    /// Key → component loader contributions.
    pub components: Vec<(String, Arc<dyn ComponentLoader>)>,
    /// Lifecycle hooks.
    pub hooks: ModuleHooks,
    /// Free-form module settings.
    pub settings: HashMap<String, serde_json::Value>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            depends_on: Vec::new(),
            pages: Vec::new(),
            components: Vec::new(),
            hooks: ModuleHooks::default(),
            settings: HashMap::new(),
        }
    }

    pub fn depends_on(mut self, name: impl Into<String>) -> Self {
        self.depends_on.push(name.into());
        self
    }

    pub fn with_page(
        mut self,
        route: impl Into<String>,
        loader: Arc<dyn ComponentLoader>,
    ) -> Self {
        self.pages.push((route.into(), loader));
        self
    }

    pub fn with_component(
        mut self,
        key: impl Into<String>,
        loader: Arc<dyn ComponentLoader>,
    ) -> Self {
        self.components.push((key.into(), loader));
        self
    }

    pub fn on_init(mut self, hook: impl Fn(&AppContext) + Send + Sync + 'static) -> Self {
        self.hooks.on_init = Some(Arc::new(hook));
        self
    }

    pub fn on_request(mut self, hook: impl Fn(&RequestContext) + Send + Sync + 'static) -> Self {
        self.hooks.on_request = Some(Arc::new(hook));
        self
    }

    pub fn with_setting(
        mut self,
        key: impl Into<String>,
        value: serde_json::Value,
    ) -> Self {
        self.settings.insert(key.into(), value);
        self
    }

    /// Finalize into the shared form the registry stores.
    pub fn build(self) -> Arc<Module> {
        Arc::new(self)
    }
}

impl std::fmt::Debug for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("depends_on", &self.depends_on)
            .field(
                "pages",
                &self.pages.iter().map(|(r, _)| r).collect::<Vec<_>>(),
            )
            .field(
                "components",
                &self.components.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            )
            .field("hooks", &self.hooks)
            .finish()
    }
}
