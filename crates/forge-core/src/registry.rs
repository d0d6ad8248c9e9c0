//! The module registry.
//!
//! Two independent policies govern registration. The module RECORD is
//! first-registration-wins: a duplicate name keeps the original record and
//! logs a warning. Page and component CONTRIBUTIONS are
//! last-registration-wins and are applied even when the record was rejected,
//! so a later module can still override routes and components.

use std::collections::HashMap;
use std::sync::Arc;

use crate::component::ComponentLoader;
use crate::module::Module;

/// Holds every registered module and the merged page/component tables.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: Vec<Arc<Module>>,
    by_name: HashMap<String, usize>,
    pages: HashMap<String, Arc<dyn ComponentLoader>>,
    components: HashMap<String, Arc<dyn ComponentLoader>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module.
    ///
    /// Returns `true` when the record was stored, `false` when a module of
    /// the same name already held it. Contributions are applied either way.
    pub fn register(&mut self, module: Arc<Module>) -> bool {
        let stored = if self.by_name.contains_key(&module.name) {
            tracing::warn!(module = %module.name, "module already registered, keeping original record");
            false
        } else {
            self.by_name.insert(module.name.clone(), self.modules.len());
            self.modules.push(Arc::clone(&module));
            true
        };

        for (route, loader) in &module.pages {
            self.pages.insert(route.clone(), Arc::clone(loader));
        }
        for (key, loader) in &module.components {
            self.components.insert(key.clone(), Arc::clone(loader));
        }

        stored
    }

    /// The registered module record for a name.
    pub fn module(&self, name: &str) -> Option<Arc<Module>> {
        self.by_name
            .get(name)
            .map(|&index| Arc::clone(&self.modules[index]))
    }

    /// All registered modules in registration order.
    pub fn all_modules(&self) -> Vec<Arc<Module>> {
        self.modules.clone()
    }

    pub fn has_module(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// The page loader for a route, latest contribution winning.
    pub fn page(&self, route: &str) -> Option<Arc<dyn ComponentLoader>> {
        self.pages.get(route).cloned()
    }

    /// The component loader for a key, latest contribution winning.
    pub fn component(&self, key: &str) -> Option<Arc<dyn ComponentLoader>> {
        self.components.get(key).cloned()
    }

    /// All routes with a registered page, unordered.
    pub fn page_routes(&self) -> Vec<String> {
        self.pages.keys().cloned().collect()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field(
                "modules",
                &self.modules.iter().map(|m| &m.name).collect::<Vec<_>>(),
            )
            .field("pages", &self.pages.keys().collect::<Vec<_>>())
            .field("components", &self.components.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, StaticLoader};

    fn loader(artifact: &str) -> Arc<dyn ComponentLoader> {
        Arc::new(StaticLoader::new(Component::new(artifact, artifact)))
    }

    #[test]
    fn test_record_is_first_registration_wins() {
        let mut registry = ModuleRegistry::new();
        let first = Module::new("cart")
            .with_setting("version", serde_json::json!(1))
            .build();
        let second = Module::new("cart")
            .with_setting("version", serde_json::json!(2))
            .build();

        assert!(registry.register(first));
        assert!(!registry.register(second));

        let record = registry.module("cart").unwrap();
        assert_eq!(record.settings["version"], serde_json::json!(1));
        assert_eq!(registry.module_count(), 1);
    }

    #[tokio::test]
    async fn test_contributions_are_last_registration_wins() {
        let mut registry = ModuleRegistry::new();
        let first = Module::new("cart")
            .with_page("/cart", loader("cart/v1"))
            .build();
        // Same name: record rejected, contributions still applied.
        let second = Module::new("cart")
            .with_page("/cart", loader("cart/v2"))
            .build();

        registry.register(first);
        registry.register(second);

        let page = registry.page("/cart").unwrap();
        assert_eq!(page.load().await.unwrap().artifact, "cart/v2");
    }

    #[test]
    fn test_all_modules_keeps_registration_order() {
        let mut registry = ModuleRegistry::new();
        registry.register(Module::new("search").build());
        registry.register(Module::new("cart").build());
        registry.register(Module::new("blog").build());

        let modules = registry.all_modules();
        let names: Vec<&str> = modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["search", "cart", "blog"]);
    }

    #[test]
    fn test_reads_never_fail_on_missing() {
        let registry = ModuleRegistry::new();
        assert!(registry.module("missing").is_none());
        assert!(registry.page("/missing").is_none());
        assert!(registry.component("Missing").is_none());
        assert!(!registry.has_module("missing"));
        assert!(registry.page_routes().is_empty());
    }
}
