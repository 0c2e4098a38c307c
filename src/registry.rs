//! Handler lookup by type.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use crate::{error::ReflowError, handler::WrappingHandler};

/// A handler shared between the registry and the invocation using it.
pub type SharedHandler = Arc<Mutex<Box<dyn WrappingHandler>>>;

/// Maps handler types to handler instances.
///
/// Each instance is reused across invocations and locked for the duration of
/// one `setup`, `apply_edit`, `wrap` sequence.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<&'static str, SharedHandler>,
    last_used: Mutex<Option<&'static str>>,
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.handler_types())
            .field("last_used", &self.last_used())
            .finish()
    }
}

impl HandlerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under its own type, returning any handler it
    /// replaces.
    pub fn register(&mut self, handler: Box<dyn WrappingHandler>) -> Option<SharedHandler> {
        let key = handler.handler_type();
        self.handlers.insert(key, Arc::new(Mutex::new(handler)))
    }

    #[must_use]
    pub fn get(&self, handler_type: &str) -> Option<SharedHandler> {
        self.handlers.get(handler_type).cloned()
    }

    #[must_use]
    pub fn contains(&self, handler_type: &str) -> bool {
        self.handlers.contains_key(handler_type)
    }

    /// Registered types in sorted order.
    #[must_use]
    pub fn handler_types(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self.handlers.keys().copied().collect();
        types.sort_unstable();
        types
    }

    /// Type of the handler that most recently ran.
    #[must_use]
    pub fn last_used(&self) -> Option<&'static str> {
        *self.last_used.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the handler for `handler_type` and mark it as last used.
    ///
    /// # Errors
    /// [`ReflowError::NoHandlerRegistered`] for unknown types and
    /// [`ReflowError::HandlerPoisoned`] when an earlier invocation panicked
    /// while holding the lock.
    pub fn with_handler<T>(
        &self,
        handler_type: &str,
        run: impl FnOnce(&mut dyn WrappingHandler) -> Result<T, ReflowError>,
    ) -> Result<T, ReflowError> {
        let (&key, shared) = self
            .handlers
            .get_key_value(handler_type)
            .ok_or_else(|| ReflowError::NoHandlerRegistered(handler_type.to_owned()))?;
        let mut guard = shared
            .lock()
            .map_err(|_| ReflowError::HandlerPoisoned(handler_type.to_owned()))?;
        *self.last_used.lock().unwrap_or_else(PoisonError::into_inner) = Some(key);
        run(&mut **guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{
        DEFAULT_HANDLER_TYPE,
        DefaultWrappingHandler,
        LIST_HANDLER_TYPE,
        ListWrappingHandler,
    };

    fn registry() -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        registry.register(Box::new(DefaultWrappingHandler::new()));
        registry.register(Box::new(ListWrappingHandler::new()));
        registry
    }

    #[test]
    fn handlers_are_keyed_by_type() {
        let registry = registry();
        assert_eq!(
            registry.handler_types(),
            vec![DEFAULT_HANDLER_TYPE, LIST_HANDLER_TYPE]
        );
        assert!(registry.contains(LIST_HANDLER_TYPE));
        assert!(registry.get("table").is_none());
    }

    #[test]
    fn same_instance_is_reused() {
        let registry = registry();
        let a = registry.get(DEFAULT_HANDLER_TYPE).expect("registered");
        let b = registry.get(DEFAULT_HANDLER_TYPE).expect("registered");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn re_registering_replaces() {
        let mut registry = registry();
        assert!(
            registry
                .register(Box::new(DefaultWrappingHandler::new()))
                .is_some()
        );
        assert_eq!(registry.handler_types().len(), 2);
    }

    #[test]
    fn with_handler_tracks_last_used() {
        let registry = registry();
        assert_eq!(registry.last_used(), None);
        let ty = registry
            .with_handler(LIST_HANDLER_TYPE, |h| Ok(h.handler_type()))
            .expect("registered");
        assert_eq!(ty, LIST_HANDLER_TYPE);
        assert_eq!(registry.last_used(), Some(LIST_HANDLER_TYPE));
    }

    #[test]
    fn unknown_type_is_an_error() {
        let registry = registry();
        assert_eq!(
            registry.with_handler("table", |_| Ok(())),
            Err(ReflowError::NoHandlerRegistered("table".into()))
        );
    }

    #[test]
    fn poisoned_handler_is_reported() {
        let registry = registry();
        let shared = registry.get(DEFAULT_HANDLER_TYPE).expect("registered");
        let _ = std::thread::spawn(move || {
            let _guard = shared.lock().expect("lock");
            panic!("handler panicked");
        })
        .join();
        assert_eq!(
            registry.with_handler(DEFAULT_HANDLER_TYPE, |_| Ok(())),
            Err(ReflowError::HandlerPoisoned(DEFAULT_HANDLER_TYPE.into()))
        );
    }
}
