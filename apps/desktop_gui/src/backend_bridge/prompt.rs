//! Routes component dialogs to modal windows on the UI thread.

use async_trait::async_trait;
use client_core::Prompt;
use crossbeam_channel::Sender;
use tokio::sync::oneshot;

use crate::controller::events::UiEvent;

pub struct BridgePrompt {
    ui_tx: Sender<UiEvent>,
}

impl BridgePrompt {
    pub fn new(ui_tx: Sender<UiEvent>) -> Self {
        Self { ui_tx }
    }
}

#[async_trait]
impl Prompt for BridgePrompt {
    /// Waits for the user's answer; a closed window counts as "no".
    async fn confirm(&self, message: &str) -> bool {
        let (reply, answer) = oneshot::channel();
        if self
            .ui_tx
            .try_send(UiEvent::ConfirmRequested {
                message: message.to_string(),
                reply,
            })
            .is_err()
        {
            tracing::warn!("ui queue unavailable; treating confirmation as declined");
            return false;
        }
        answer.await.unwrap_or(false)
    }

    async fn alert(&self, message: &str) {
        let _ = self.ui_tx.try_send(UiEvent::Alert(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[tokio::test]
    async fn confirm_waits_for_ui_reply() {
        let (ui_tx, ui_rx) = bounded(4);
        let prompt = BridgePrompt::new(ui_tx);

        let ui = std::thread::spawn(move || match ui_rx.recv() {
            Ok(UiEvent::ConfirmRequested { message, reply }) => {
                assert_eq!(message, "Are you sure?");
                let _ = reply.send(true);
            }
            _ => panic!("expected confirmation request"),
        });

        assert!(prompt.confirm("Are you sure?").await);
        ui.join().expect("ui thread");
    }

    #[tokio::test]
    async fn dropped_reply_declines() {
        let (ui_tx, ui_rx) = bounded(4);
        let prompt = BridgePrompt::new(ui_tx);

        let ui = std::thread::spawn(move || {
            let _ = ui_rx.recv();
        });

        assert!(!prompt.confirm("Are you sure?").await);
        ui.join().expect("ui thread");
    }

    #[tokio::test]
    async fn alert_is_forwarded() {
        let (ui_tx, ui_rx) = bounded(4);
        BridgePrompt::new(ui_tx).alert("Something went wrong!").await;
        assert!(matches!(ui_rx.try_recv(), Ok(UiEvent::Alert(text)) if text == "Something went wrong!"));
    }
}
