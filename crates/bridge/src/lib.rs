//! UI bridge for the prompt library.
//!
//! This crate connects a UI surface to the prompt store:
//! - Typed requests (`<type>:<content>`) routed through a handler registry
//! - The prompt request router, reporting outcomes as named UI callbacks
//! - A channel that hands callbacks off to the UI-confined context
//! - Escaping of callback arguments for script transport

pub mod dispatcher;
pub mod escape;
pub mod handler;
pub mod message;
pub mod prompt_handler;


// Re-export main types
pub use dispatcher::{ui_channel, ChannelDispatcher, UiDispatcher, UiQueue};
pub use escape::escape_js;
pub use handler::{HandlerRegistry, MessageHandler};
pub use message::{BridgeMessage, Callback, Operation, OperationResult, UiCall};
pub use prompt_handler::PromptRequestRouter;
