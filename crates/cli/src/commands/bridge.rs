//! Bridge command handler.
//!
//! Runs the prompt request router over a line protocol: each stdin line is a
//! `<type>:<content>` request, each stdout line a UI call such as
//! `window.updatePrompts('[...]')`. Requests are handled on blocking worker
//! threads; a single task owns stdout and plays the UI thread.

use clap::Args;
use promptlib_bridge::{ui_channel, BridgeMessage, HandlerRegistry, PromptRequestRouter};
use promptlib_core::{config::AppConfig, AppError, AppResult};
use promptlib_prompt::PromptStore;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Serve bridge requests from stdin
#[derive(Args, Debug)]
pub struct BridgeCommand {
    /// Send the prompt list once before reading requests
    #[arg(long)]
    pub initial_list: bool,
}

impl BridgeCommand {
    pub async fn execute(&self, config: &AppConfig, store: PromptStore) -> AppResult<()> {
        config.ensure_data_dir()?;
        tracing::info!("Serving prompt bridge for {}", store.path().display());

        let (ui, mut queue) = ui_channel();
        let mut registry = HandlerRegistry::new();
        registry.register(PromptRequestRouter::new(store, ui));
        tracing::debug!("Bridge types: {:?}", registry.supported_types());
        let registry = Arc::new(registry);

        let ui_task = tokio::spawn(async move {
            let mut stdout = tokio::io::stdout();
            while let Some(call) = queue.recv().await {
                stdout.write_all(call.to_script().as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
            Ok::<(), std::io::Error>(())
        });

        if self.initial_list {
            route(&registry, BridgeMessage::parse("get_prompts")).await?;
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            route(&registry, BridgeMessage::parse(line.trim_end_matches('\r'))).await?;
        }

        // Last dispatcher goes away with the registry, which ends the UI task.
        drop(registry);
        ui_task
            .await
            .map_err(|e| AppError::Other(format!("UI task failed: {}", e)))??;

        tracing::info!("Bridge input closed");
        Ok(())
    }
}

/// Handle one request on a blocking thread.
async fn route(registry: &Arc<HandlerRegistry>, message: BridgeMessage) -> AppResult<()> {
    let registry = Arc::clone(registry);
    let message_type = message.message_type.clone();

    let handled = tokio::task::spawn_blocking(move || {
        registry.handle(&message.message_type, &message.content)
    })
    .await
    .map_err(|e| AppError::Other(format!("Request task failed: {}", e)))?;

    if !handled {
        tracing::warn!("Unhandled bridge message type: {}", message_type);
    }
    Ok(())
}
