//! End-to-end tests for the module system: source, loader, registry,
//! hooks, and the cyclic-acquisition guard.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;

use forge_commerce::adapter::{
    AdapterError, CategoriesApi, ProductsApi, StoreAdapter,
};
use forge_commerce::catalog::{Category, Product, ProductListParams};
use forge_core::component::{Component, StaticLoader};
use forge_core::config::{parse_config, StoreForgeConfig};
use forge_core::context::AppContext;
use forge_core::loader::{ModuleLoader, ModuleSource, StaticModuleSource};
use forge_core::module::{Module, ModuleError};

// === Test fixtures ===

struct NullProducts;

#[async_trait]
impl ProductsApi for NullProducts {
    async fn list(&self, _params: &ProductListParams) -> Result<Vec<Product>, AdapterError> {
        Ok(Vec::new())
    }

    async fn get_by_id(&self, id: &str) -> Result<Product, AdapterError> {
        Err(AdapterError::NotFound {
            context: format!("Failed to get product {id}"),
        })
    }

    async fn get_by_slug(&self, _slug: &str) -> Result<Option<Product>, AdapterError> {
        Ok(None)
    }
}

struct NullCategories;

#[async_trait]
impl CategoriesApi for NullCategories {
    async fn list(&self) -> Result<Vec<Category>, AdapterError> {
        Ok(Vec::new())
    }

    async fn get_by_slug(&self, _slug: &str) -> Result<Option<Category>, AdapterError> {
        Ok(None)
    }
}

struct NullAdapter {
    products: NullProducts,
    categories: NullCategories,
}

impl NullAdapter {
    fn new() -> Self {
        Self {
            products: NullProducts,
            categories: NullCategories,
        }
    }
}

impl StoreAdapter for NullAdapter {
    fn name(&self) -> &str {
        "null"
    }

    fn products(&self) -> &dyn ProductsApi {
        &self.products
    }

    fn categories(&self) -> &dyn CategoriesApi {
        &self.categories
    }
}

fn test_config() -> StoreForgeConfig {
    parse_config(
        r#"
        modules = ["cart", "search"]

        [adapter]
        name = "null"
        endpoint = "https://shop.example.com"

        [theme]
        core = "base"
        "#,
    )
    .unwrap()
}

fn test_context() -> AppContext {
    AppContext::new(Arc::new(test_config()), Arc::new(NullAdapter::new()))
}

fn page_loader(artifact: &str) -> Arc<StaticLoader> {
    Arc::new(StaticLoader::new(Component::new(artifact, artifact)))
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// === Loading ===

#[tokio::test]
async fn test_modules_load_in_input_order_and_run_init_hooks() {
    let init_order: Arc<std::sync::Mutex<Vec<String>>> = Arc::default();

    let make = |name: &str, order: Arc<std::sync::Mutex<Vec<String>>>| {
        let tag = name.to_string();
        Module::new(name)
            .on_init(move |_ctx| order.lock().unwrap().push(tag.clone()))
            .build()
    };

    let source = StaticModuleSource::new()
        .with_module(make("cart", Arc::clone(&init_order)))
        .with_module(make("search", Arc::clone(&init_order)))
        .with_module(make("blog", Arc::clone(&init_order)));

    let loader = ModuleLoader::new(Arc::new(source), test_context());
    loader
        .load_modules(&names(&["search", "cart", "blog"]))
        .await
        .unwrap();

    // Input order, not dependency or alphabetical order.
    assert_eq!(*init_order.lock().unwrap(), vec!["search", "cart", "blog"]);
    let modules = loader.all_modules();
    let loaded: Vec<&str> = modules.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(loaded, vec!["search", "cart", "blog"]);
}

#[tokio::test]
async fn test_declared_dependencies_do_not_reorder_loading() {
    let source = StaticModuleSource::new()
        .with_module(Module::new("checkout").depends_on("cart").build())
        .with_module(Module::new("cart").build());

    let loader = ModuleLoader::new(Arc::new(source), test_context());
    // checkout requested before its declared dependency; both load in
    // input order and the declaration is only recorded.
    loader
        .load_modules(&names(&["checkout", "cart"]))
        .await
        .unwrap();

    let modules = loader.all_modules();
    let loaded: Vec<&str> = modules.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(loaded, vec!["checkout", "cart"]);
    assert_eq!(loader.module("checkout").unwrap().depends_on, vec!["cart"]);
}

#[tokio::test]
async fn test_duplicate_names_within_one_call_load_once() {
    let inits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&inits);
    let source = StaticModuleSource::new().with_module(
        Module::new("cart")
            .on_init(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build(),
    );

    let loader = ModuleLoader::new(Arc::new(source), test_context());
    loader
        .load_modules(&names(&["cart", "cart", "cart"]))
        .await
        .unwrap();

    assert_eq!(inits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unknown_module_fails_fast() {
    let source = StaticModuleSource::new().with_module(Module::new("cart").build());
    let loader = ModuleLoader::new(Arc::new(source), test_context());

    let result = loader
        .load_modules(&names(&["cart", "missing", "also-never-reached"]))
        .await;

    match result {
        Err(ModuleError::NotFound(name)) => assert_eq!(name, "missing"),
        other => panic!("unexpected: {other:?}"),
    }
    // The module before the failure was loaded; nothing after it was.
    assert!(loader.has_module("cart"));
    assert_eq!(loader.all_modules().len(), 1);
}

// === Cyclic acquisition ===

/// A source whose module acquisition calls back into the loader, requesting
/// the very module being acquired.
struct ReentrantSource {
    loader: Arc<OnceLock<Arc<ModuleLoader>>>,
}

#[async_trait]
impl ModuleSource for ReentrantSource {
    async fn acquire(&self, name: &str) -> Result<Arc<Module>, ModuleError> {
        if name == "a" {
            let loader = self.loader.get().cloned();
            if let Some(loader) = loader {
                loader.load_modules(&["a".to_string()]).await?;
            }
        }
        Ok(Module::new(name).build())
    }
}

#[tokio::test]
async fn test_reentrant_acquisition_is_a_cycle() {
    let cell: Arc<OnceLock<Arc<ModuleLoader>>> = Arc::new(OnceLock::new());
    let source = ReentrantSource {
        loader: Arc::clone(&cell),
    };
    let loader = Arc::new(ModuleLoader::new(Arc::new(source), test_context()));
    cell.set(Arc::clone(&loader)).ok();

    let result = loader.load_modules(&names(&["a"])).await;
    match result {
        Err(ModuleError::CircularDependency(name)) => assert_eq!(name, "a"),
        other => panic!("unexpected: {other:?}"),
    }
}

// === Registration policies across calls ===

#[tokio::test]
async fn test_repeated_call_re_registers_without_duplicating_records() {
    let inits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&inits);
    let source = StaticModuleSource::new().with_module(
        Module::new("cart")
            .on_init(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build(),
    );
    let loader = ModuleLoader::new(Arc::new(source), test_context());

    loader.load_modules(&names(&["cart"])).await.unwrap();
    loader.load_modules(&names(&["cart"])).await.unwrap();

    // The record stays singular; the init hook ran once per call.
    assert_eq!(loader.all_modules().len(), 1);
    assert_eq!(inits.load(Ordering::SeqCst), 2);
}

// === Resolution ===

#[tokio::test]
async fn test_resolve_page_and_component() {
    let source = StaticModuleSource::new().with_module(
        Module::new("cart")
            .with_page("/cart", page_loader("cart/page"))
            .with_component("MiniCart", page_loader("cart/mini"))
            .build(),
    );
    let loader = ModuleLoader::new(Arc::new(source), test_context());
    loader.load_modules(&names(&["cart"])).await.unwrap();

    assert_eq!(
        loader.resolve_page("/cart").await.unwrap().artifact,
        "cart/page"
    );
    assert_eq!(
        loader.resolve_component("MiniCart").await.unwrap().artifact,
        "cart/mini"
    );

    match loader.resolve_page("/missing").await {
        Err(ModuleError::PageNotFound(route)) => assert_eq!(route, "/missing"),
        other => panic!("unexpected: {other:?}"),
    }
    match loader.resolve_component("Missing").await {
        Err(ModuleError::ComponentNotFound(key)) => assert_eq!(key, "Missing"),
        other => panic!("unexpected: {other:?}"),
    }
}
