//! The storefront event bus.
//!
//! Handlers subscribe to named events and are fanned out to concurrently on
//! emit. Every handler runs to completion; failures are collected per
//! handler and reported together, so one failing subscriber never hides the
//! others.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::future::join_all;
use thiserror::Error;

/// Core lifecycle event names.
pub mod core_events {
    pub const INIT: &str = "storeforge:init";
    pub const CONFIG_LOADED: &str = "storeforge:config:loaded";
    pub const ADAPTER_READY: &str = "storeforge:adapter:ready";
    pub const MODULE_LOADED: &str = "storeforge:module:loaded";
    pub const THEME_LOADED: &str = "storeforge:theme:loaded";
    pub const REQUEST_START: &str = "storeforge:request:start";
    pub const REQUEST_END: &str = "storeforge:request:end";
}

/// Errors from event emission.
#[derive(Error, Debug)]
pub enum EventError {
    /// One or more handlers failed; every failure message is carried.
    #[error("{failed} of {total} handlers failed for '{event}': {}", messages.join("; "))]
    HandlersFailed {
        event: String,
        failed: usize,
        total: usize,
        messages: Vec<String>,
    },
}

/// A subscriber to one event name.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(
        &self,
        event: &str,
        payload: &serde_json::Value,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Identifies one subscription for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// Named-event fan-out with concurrent delivery.
#[derive(Default)]
pub struct EventBus {
    handlers: Mutex<HashMap<String, Vec<(HandlerId, Arc<dyn EventHandler>)>>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a handler to an event name.
    pub fn subscribe(&self, event: impl Into<String>, handler: Arc<dyn EventHandler>) -> HandlerId {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers
            .lock()
            .unwrap()
            .entry(event.into())
            .or_default()
            .push((id, handler));
        id
    }

    /// Remove one subscription. Returns `false` when it was not present.
    pub fn unsubscribe(&self, event: &str, id: HandlerId) -> bool {
        let mut handlers = self.handlers.lock().unwrap();
        match handlers.get_mut(event) {
            Some(list) => {
                let before = list.len();
                list.retain(|(handler_id, _)| *handler_id != id);
                before != list.len()
            }
            None => false,
        }
    }

    /// Drop every subscription.
    pub fn clear(&self) {
        self.handlers.lock().unwrap().clear();
    }

    /// Number of handlers subscribed to an event.
    pub fn handler_count(&self, event: &str) -> usize {
        self.handlers
            .lock()
            .unwrap()
            .get(event)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Emit an event, running all handlers concurrently and waiting for all
    /// of them. Handler failures are collected and reported together.
    pub async fn emit(&self, event: &str, payload: &serde_json::Value) -> Result<(), EventError> {
        let handlers: Vec<Arc<dyn EventHandler>> = {
            let guard = self.handlers.lock().unwrap();
            match guard.get(event) {
                Some(list) => list.iter().map(|(_, h)| Arc::clone(h)).collect(),
                None => return Ok(()),
            }
        };

        let total = handlers.len();
        let outcomes = join_all(
            handlers
                .iter()
                .map(|handler| handler.handle(event, payload)),
        )
        .await;

        let messages: Vec<String> = outcomes
            .into_iter()
            .filter_map(|outcome| outcome.err().map(|e| e.to_string()))
            .collect();

        if messages.is_empty() {
            Ok(())
        } else {
            tracing::warn!(event = %event, failed = messages.len(), "event handlers failed");
            Err(EventError::HandlersFailed {
                event: event.to_string(),
                failed: messages.len(),
                total,
                messages,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct Counter {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EventHandler for Counter {
        async fn handle(
            &self,
            _event: &str,
            _payload: &serde_json::Value,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Failing(&'static str);

    #[async_trait]
    impl EventHandler for Failing {
        async fn handle(
            &self,
            _event: &str,
            _payload: &serde_json::Value,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Err(self.0.into())
        }
    }

    #[tokio::test]
    async fn test_emit_runs_all_subscribers() {
        let bus = EventBus::new();
        let first = Arc::new(Counter {
            calls: AtomicUsize::new(0),
        });
        let second = Arc::new(Counter {
            calls: AtomicUsize::new(0),
        });
        bus.subscribe(core_events::INIT, Arc::clone(&first) as Arc<dyn EventHandler>);
        bus.subscribe(core_events::INIT, Arc::clone(&second) as Arc<dyn EventHandler>);

        bus.emit(core_events::INIT, &serde_json::json!({}))
            .await
            .unwrap();

        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_hide_the_rest() {
        let bus = EventBus::new();
        let survivor = Arc::new(Counter {
            calls: AtomicUsize::new(0),
        });
        bus.subscribe("storeforge:init", Arc::new(Failing("boom")) as Arc<dyn EventHandler>);
        bus.subscribe("storeforge:init", Arc::clone(&survivor) as Arc<dyn EventHandler>);

        let result = bus.emit("storeforge:init", &serde_json::json!({})).await;

        // The surviving handler still ran.
        assert_eq!(survivor.calls.load(Ordering::SeqCst), 1);
        match result {
            Err(EventError::HandlersFailed {
                failed,
                total,
                messages,
                ..
            }) => {
                assert_eq!(failed, 1);
                assert_eq!(total, 2);
                assert_eq!(messages, vec!["boom"]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let counter = Arc::new(Counter {
            calls: AtomicUsize::new(0),
        });
        let id = bus.subscribe("x", Arc::clone(&counter) as Arc<dyn EventHandler>);

        assert!(bus.unsubscribe("x", id));
        assert!(!bus.unsubscribe("x", id));
        bus.emit("x", &serde_json::json!({})).await.unwrap();
        assert_eq!(counter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_emit_without_subscribers_is_ok() {
        let bus = EventBus::new();
        assert!(bus.emit("nobody:listens", &serde_json::json!({})).await.is_ok());
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let bus = EventBus::new();
        bus.subscribe("a", Arc::new(Failing("x")) as Arc<dyn EventHandler>);
        bus.subscribe("b", Arc::new(Failing("y")) as Arc<dyn EventHandler>);
        bus.clear();
        assert_eq!(bus.handler_count("a"), 0);
        assert!(bus.emit("a", &serde_json::json!({})).await.is_ok());
    }
}
