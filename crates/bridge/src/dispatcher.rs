//! Handoff of UI calls to the UI-confined execution context.
//!
//! Request handling runs on whatever thread delivered the request. Callbacks
//! must run on the UI side, so handlers only enqueue `UiCall`s here and the
//! owner of the `UiQueue` executes them later.

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::message::UiCall;

/// Sink for outbound UI calls.
///
/// Implementations must not run the callback inline.
pub trait UiDispatcher: Send + Sync {
    fn dispatch(&self, call: UiCall);
}

/// Dispatcher backed by an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelDispatcher {
    tx: UnboundedSender<UiCall>,
}

impl UiDispatcher for ChannelDispatcher {
    fn dispatch(&self, call: UiCall) {
        let callback = call.callback;
        if self.tx.send(call).is_err() {
            tracing::warn!("UI queue closed, dropping {} call", callback);
        }
    }
}

/// Receiving end drained by the UI context.
#[derive(Debug)]
pub struct UiQueue {
    rx: UnboundedReceiver<UiCall>,
}

impl UiQueue {
    /// Wait for the next call. `None` once every dispatcher is dropped.
    pub async fn recv(&mut self) -> Option<UiCall> {
        self.rx.recv().await
    }

    /// Next call if one is already queued.
    pub fn try_recv(&mut self) -> Option<UiCall> {
        self.rx.try_recv().ok()
    }

    /// All calls queued so far, in dispatch order.
    pub fn drain(&mut self) -> Vec<UiCall> {
        let mut calls = Vec::new();
        while let Ok(call) = self.rx.try_recv() {
            calls.push(call);
        }
        calls
    }
}

/// Create a connected dispatcher/queue pair.
pub fn ui_channel() -> (ChannelDispatcher, UiQueue) {
    let (tx, rx) = unbounded_channel();
    (ChannelDispatcher { tx }, UiQueue { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Callback;

    #[test]
    fn test_drain_preserves_order() {
        let (dispatcher, mut queue) = ui_channel();
        dispatcher.dispatch(UiCall::new(Callback::PromptOperationResult, "first"));
        dispatcher.dispatch(UiCall::new(Callback::UpdatePrompts, "second"));

        let calls = queue.drain();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].argument, "first");
        assert_eq!(calls[1].callback, Callback::UpdatePrompts);
        assert!(queue.try_recv().is_none());
    }

    #[test]
    fn test_dispatch_after_queue_dropped_does_not_panic() {
        let (dispatcher, queue) = ui_channel();
        drop(queue);
        dispatcher.dispatch(UiCall::new(Callback::UpdatePrompts, "[]"));
    }

    #[tokio::test]
    async fn test_recv_from_other_thread() {
        let (dispatcher, mut queue) = ui_channel();

        let producer = std::thread::spawn(move || {
            dispatcher.dispatch(UiCall::new(Callback::UpdatePrompts, "[]"));
        });

        let call = queue.recv().await.unwrap();
        assert_eq!(call.to_script(), "window.updatePrompts('[]')");

        producer.join().unwrap();
        assert!(queue.recv().await.is_none());
    }
}
