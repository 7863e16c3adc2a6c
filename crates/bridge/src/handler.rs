//! Message handler registry.
//!
//! The transport delivers `(type, content)` pairs. Each `MessageHandler`
//! claims the types it understands; the registry offers a message to each
//! handler in registration order until one accepts it.

use crate::message::BridgeMessage;

/// A component that handles a family of bridge message types.
pub trait MessageHandler: Send + Sync {
    /// Message types this handler accepts.
    fn supported_types(&self) -> &'static [&'static str];

    /// Handle a message. Returns `false` if the type is not handled here.
    fn handle(&self, message_type: &str, content: &str) -> bool;
}

/// Ordered collection of handlers acting as the outer dispatcher.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Vec<Box<dyn MessageHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler after those already present.
    pub fn register(&mut self, handler: impl MessageHandler + 'static) -> &mut Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Offer a message to each handler. Returns whether any handled it.
    pub fn handle(&self, message_type: &str, content: &str) -> bool {
        let handled = self
            .handlers
            .iter()
            .any(|handler| handler.handle(message_type, content));

        if !handled {
            tracing::debug!("No handler for message type: {}", message_type);
        }
        handled
    }

    /// Parse a `<type>:<content>` wire message and handle it.
    pub fn handle_raw(&self, raw: &str) -> bool {
        let message = BridgeMessage::parse(raw);
        self.handle(&message.message_type, &message.content)
    }

    /// Every supported type across all handlers, sorted.
    pub fn supported_types(&self) -> Vec<&'static str> {
        let mut types: Vec<&'static str> = self
            .handlers
            .iter()
            .flat_map(|handler| handler.supported_types().iter().copied())
            .collect();
        types.sort_unstable();
        types.dedup();
        types
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records every message it accepts.
    struct Recorder {
        types: &'static [&'static str],
        seen: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl MessageHandler for Recorder {
        fn supported_types(&self) -> &'static [&'static str] {
            self.types
        }

        fn handle(&self, message_type: &str, content: &str) -> bool {
            if !self.types.iter().any(|t| *t == message_type) {
                return false;
            }
            self.seen
                .lock()
                .unwrap()
                .push((message_type.to_string(), content.to_string()));
            true
        }
    }

    fn recorder(types: &'static [&'static str]) -> (Recorder, Arc<Mutex<Vec<(String, String)>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        (
            Recorder {
                types,
                seen: seen.clone(),
            },
            seen,
        )
    }

    #[test]
    fn test_routes_to_matching_handler() {
        let (first, first_seen) = recorder(&["alpha"]);
        let (second, second_seen) = recorder(&["beta"]);

        let mut registry = HandlerRegistry::new();
        registry.register(first).register(second);

        assert!(registry.handle("beta", "payload"));
        assert!(first_seen.lock().unwrap().is_empty());
        assert_eq!(
            second_seen.lock().unwrap().as_slice(),
            &[("beta".to_string(), "payload".to_string())]
        );
    }

    #[test]
    fn test_unhandled_type() {
        let (only, seen) = recorder(&["alpha"]);
        let mut registry = HandlerRegistry::new();
        registry.register(only);

        assert!(!registry.handle("gamma", ""));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_first_registered_handler_wins() {
        let (first, first_seen) = recorder(&["alpha"]);
        let (second, second_seen) = recorder(&["alpha"]);

        let mut registry = HandlerRegistry::new();
        registry.register(first).register(second);

        assert!(registry.handle("alpha", ""));
        assert_eq!(first_seen.lock().unwrap().len(), 1);
        assert!(second_seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_handle_raw_splits_wire_format() {
        let (only, seen) = recorder(&["alpha"]);
        let mut registry = HandlerRegistry::new();
        registry.register(only);

        assert!(registry.handle_raw(r#"alpha:{"k":"v:w"}"#));
        assert_eq!(seen.lock().unwrap()[0].1, r#"{"k":"v:w"}"#);
    }

    #[test]
    fn test_supported_types_sorted_and_deduplicated() {
        let (first, _) = recorder(&["beta", "alpha"]);
        let (second, _) = recorder(&["alpha", "gamma"]);

        let mut registry = HandlerRegistry::new();
        registry.register(first).register(second);

        assert_eq!(registry.supported_types(), vec!["alpha", "beta", "gamma"]);
    }
}
