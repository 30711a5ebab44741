//! Runtime bridge between UI command queue and backend event intake.

use std::{fs::File, sync::Arc, thread};

use client_core::{ClientEvent, ClientSettings, CustomerList, GridHandle};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::{commands::BackendCommand, prompt::BridgePrompt};
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: ClientSettings) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let prompt = Arc::new(BridgePrompt::new(ui_tx.clone()));
            let list = match CustomerList::from_settings(&settings, prompt) {
                Ok(list) => Arc::new(list),
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        err.to_string(),
                    )));
                    tracing::error!("failed to create customer list: {err}");
                    return;
                }
            };

            let mut events = list.subscribe_events();
            let forwarder_list = Arc::clone(&list);
            let ui_events = ui_tx.clone();
            tokio::spawn(async move {
                while let Ok(event) = events.recv().await {
                    match event {
                        ClientEvent::Error(message) => {
                            let _ = ui_events.try_send(UiEvent::Error(UiError::from_message(
                                UiErrorContext::Sync,
                                message,
                            )));
                        }
                        ClientEvent::CustomersReloaded { count } => {
                            let _ = ui_events
                                .try_send(UiEvent::Info(format!("Loaded {count} customers")));
                        }
                        ClientEvent::NotificationShown(message) => {
                            tracing::debug!(%message, "notification shown");
                            let list = Arc::clone(&forwarder_list);
                            tokio::spawn(async move {
                                list.auto_hide_notification().await;
                            });
                        }
                        ClientEvent::NotificationHidden => {
                            publish_view(&forwarder_list, &ui_events).await;
                        }
                        // Raised to the user through `BridgePrompt::alert`.
                        ClientEvent::Alert(message) => {
                            tracing::debug!(%message, "alert raised");
                        }
                    }
                }
            });

            tracing::info!(base_url = %settings.api_base_url, "customer backend ready");
            let _ = list.mount().await;
            publish_view(&list, &ui_tx).await;

            while let Ok(cmd) = cmd_rx.recv() {
                let list = Arc::clone(&list);
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    handle_command(&list, cmd, &ui_tx).await;
                    publish_view(&list, &ui_tx).await;
                });
            }
            tracing::info!("ui command queue closed; backend worker exiting");
        });
    });
}

async fn publish_view(list: &CustomerList, ui_tx: &Sender<UiEvent>) {
    let _ = ui_tx.try_send(UiEvent::ViewUpdated(list.snapshot().await));
}

async fn handle_command(list: &CustomerList, cmd: BackendCommand, ui_tx: &Sender<UiEvent>) {
    let command = cmd.name();
    let outcome = match cmd {
        BackendCommand::Reload => {
            let _ = list.reload().await;
            return;
        }
        BackendCommand::GridReady => {
            list.on_grid_ready(GridHandle::default()).await;
            return;
        }
        BackendCommand::DismissNotification => {
            list.dismiss_notification().await;
            return;
        }
        BackendCommand::ExportCsv { path, query } => {
            let result = match File::create(&path) {
                Ok(file) => list.export_csv(&query, file).await,
                Err(err) => Err(err.into()),
            };
            let event = match result {
                Ok(rows) => UiEvent::Exported { rows, path },
                Err(err) => UiEvent::Error(UiError::from_message(
                    UiErrorContext::Export,
                    format!("{}: {err}", path.display()),
                )),
            };
            let _ = ui_tx.try_send(event);
            return;
        }
        BackendCommand::AddCustomer { customer } => list.add_customer(customer).await,
        BackendCommand::EditCustomer { href, customer } => {
            list.edit_customer(&href, customer).await
        }
        BackendCommand::DeleteCustomer { href } => list.delete_customer(&href).await,
        BackendCommand::AddTraining { training } => list.add_training(training).await,
    };

    tracing::debug!(command, ?outcome, "customer command finished");
}
