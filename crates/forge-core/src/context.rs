//! Application and request contexts.
//!
//! The app context is built once at startup and threaded explicitly into
//! everything that needs configuration or backend access. No globals.

use std::collections::HashMap;
use std::sync::Arc;

use forge_commerce::adapter::StoreAdapter;

use crate::config::StoreForgeConfig;

/// Shared application state: the loaded config and the active adapter.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<StoreForgeConfig>,
    pub adapter: Arc<dyn StoreAdapter>,
}

impl AppContext {
    pub fn new(config: Arc<StoreForgeConfig>, adapter: Arc<dyn StoreAdapter>) -> Self {
        Self { config, adapter }
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("adapter", &self.adapter.name())
            .field("modules", &self.config.modules)
            .finish()
    }
}

/// Extracted route parameters (e.g. `:slug` from `/product/:slug`).
pub type RouteParams = HashMap<String, String>;

/// Query string parameters.
pub type QueryParams = HashMap<String, String>;

/// Per-request context layered over the app context.
#[derive(Clone)]
pub struct RequestContext {
    pub app: AppContext,
    /// Request path.
    pub path: String,
    /// Extracted route parameters.
    pub params: RouteParams,
    /// Query string parameters.
    pub query: QueryParams,
}

impl RequestContext {
    pub fn new(app: AppContext, path: impl Into<String>) -> Self {
        Self {
            app,
            path: path.into(),
            params: HashMap::new(),
            query: HashMap::new(),
        }
    }

    pub fn with_params(mut self, params: RouteParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Get a route parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Get a query parameter by name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}
