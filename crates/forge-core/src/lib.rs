//! Framework core for StoreForge.
//!
//! Everything a storefront needs besides the commerce types themselves:
//!
//! - **Modules**: feature modules, their registry and loader
//! - **Themes**: child-over-core component override resolution
//! - **Config**: the storefront config shape, validation and loading
//! - **Context**: app and request contexts, threaded explicitly
//! - **Events**: a concurrent fan-out event bus
//! - **Cache**: time-based revalidation hints
//!
//! The wiring is dependency-injection throughout: modules come from a
//! [`ModuleSource`], components from [`ComponentLoader`]s, the backend from
//! a `StoreAdapter`. Nothing is discovered at runtime and nothing is global.

pub mod cache;
pub mod component;
pub mod config;
pub mod context;
pub mod events;
pub mod loader;
pub mod module;
pub mod registry;
pub mod theme;

pub use cache::{CacheConfig, CacheStrategy};
pub use component::{Component, ComponentLoader, LoadError, StaticLoader};
pub use config::{
    load_config, parse_config, validate_config, ConfigError, StoreForgeConfig, ThemeConfig,
    ValidationReport,
};
pub use context::{AppContext, RequestContext};
pub use events::{EventBus, EventError, EventHandler, HandlerId};
pub use loader::{ModuleLoader, ModuleSource, StaticModuleSource};
pub use module::{Module, ModuleError, ModuleHooks};
pub use registry::ModuleRegistry;
pub use theme::{resolve_component, ThemeError, ThemeManager, ThemeRegistry};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cache::{CacheConfig, CacheStrategy};
    pub use crate::component::{Component, ComponentLoader, LoadError, StaticLoader};
    pub use crate::config::{
        load_config, validate_config, ConfigError, StoreForgeConfig, ThemeConfig,
    };
    pub use crate::context::{AppContext, RequestContext};
    pub use crate::events::{core_events, EventBus, EventError, EventHandler};
    pub use crate::loader::{ModuleLoader, ModuleSource, StaticModuleSource};
    pub use crate::module::{Module, ModuleError, ModuleHooks};
    pub use crate::registry::ModuleRegistry;
    pub use crate::theme::{resolve_component, ThemeError, ThemeManager, ThemeRegistry};
}
