//! The module loader.
//!
//! Modules are acquired from an injected [`ModuleSource`] and loaded in the
//! exact order they are requested. Declared `depends_on` lists are recorded
//! on the module record but do not reorder loading. A name re-requested
//! while its own load is still in progress is a cycle and fails the call.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::component::{Component, ComponentLoader};
use crate::context::AppContext;
use crate::module::{Module, ModuleError};
use crate::registry::ModuleRegistry;

/// Where modules come from.
///
/// The source is the acquisition seam: production wires a fixed map of
/// compiled-in modules, tests script arbitrary behavior.
#[async_trait]
pub trait ModuleSource: Send + Sync {
    /// Produce the module for a name, [`ModuleError::NotFound`] when the
    /// source does not know it.
    async fn acquire(&self, name: &str) -> Result<Arc<Module>, ModuleError>;
}

/// A source backed by a fixed name → module map.
#[derive(Default)]
pub struct StaticModuleSource {
    modules: std::collections::HashMap<String, Arc<Module>>,
}

impl StaticModuleSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, module: Arc<Module>) -> Self {
        self.modules.insert(module.name.clone(), module);
        self
    }
}

#[async_trait]
impl ModuleSource for StaticModuleSource {
    async fn acquire(&self, name: &str) -> Result<Arc<Module>, ModuleError> {
        self.modules
            .get(name)
            .cloned()
            .ok_or_else(|| ModuleError::NotFound(name.to_string()))
    }
}

/// Acquires, registers and initializes modules.
pub struct ModuleLoader {
    source: Arc<dyn ModuleSource>,
    context: AppContext,
    registry: Mutex<ModuleRegistry>,
    // Names whose load is currently in progress, across all concurrent and
    // reentrant calls. Guards against cyclic acquisition.
    visiting: Mutex<HashSet<String>>,
}

impl ModuleLoader {
    pub fn new(source: Arc<dyn ModuleSource>, context: AppContext) -> Self {
        Self {
            source,
            context,
            registry: Mutex::new(ModuleRegistry::new()),
            visiting: Mutex::new(HashSet::new()),
        }
    }

    /// Load the named modules in input order.
    ///
    /// Each name is visited at most once per call; a repeated call visits it
    /// again, re-registering under the registry's record and contribution
    /// policies. Any failure aborts the remainder of the call.
    pub async fn load_modules(&self, names: &[String]) -> Result<(), ModuleError> {
        let mut visited = HashSet::new();
        for name in names {
            if !visited.insert(name.clone()) {
                continue;
            }
            self.load_one(name).await?;
        }
        Ok(())
    }

    async fn load_one(&self, name: &str) -> Result<(), ModuleError> {
        {
            let mut visiting = self.visiting.lock().unwrap();
            if !visiting.insert(name.to_string()) {
                return Err(ModuleError::CircularDependency(name.to_string()));
            }
        }

        let result = self.acquire_and_register(name).await;

        self.visiting.lock().unwrap().remove(name);
        result
    }

    async fn acquire_and_register(&self, name: &str) -> Result<(), ModuleError> {
        let module = self.source.acquire(name).await?;

        self.registry.lock().unwrap().register(Arc::clone(&module));

        if let Some(on_init) = &module.hooks.on_init {
            on_init(&self.context);
        }

        tracing::info!(module = %name, "module loaded");
        Ok(())
    }

    /// The app context modules were initialized with.
    pub fn context(&self) -> &AppContext {
        &self.context
    }

    // === Registry queries ===

    pub fn module(&self, name: &str) -> Option<Arc<Module>> {
        self.registry.lock().unwrap().module(name)
    }

    pub fn all_modules(&self) -> Vec<Arc<Module>> {
        self.registry.lock().unwrap().all_modules()
    }

    pub fn has_module(&self, name: &str) -> bool {
        self.registry.lock().unwrap().has_module(name)
    }

    pub fn page(&self, route: &str) -> Option<Arc<dyn ComponentLoader>> {
        self.registry.lock().unwrap().page(route)
    }

    pub fn component(&self, key: &str) -> Option<Arc<dyn ComponentLoader>> {
        self.registry.lock().unwrap().component(key)
    }

    pub fn page_routes(&self) -> Vec<String> {
        self.registry.lock().unwrap().page_routes()
    }

    /// Resolve and load the page registered for a route.
    pub async fn resolve_page(&self, route: &str) -> Result<Component, ModuleError> {
        let loader = self
            .page(route)
            .ok_or_else(|| ModuleError::PageNotFound(route.to_string()))?;
        Ok(loader.load().await?)
    }

    /// Resolve and load the component registered for a key.
    pub async fn resolve_component(&self, key: &str) -> Result<Component, ModuleError> {
        let loader = self
            .component(key)
            .ok_or_else(|| ModuleError::ComponentNotFound(key.to_string()))?;
        Ok(loader.load().await?)
    }
}
