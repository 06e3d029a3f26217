//! Backend worker: drains the UI command queue on its own tokio runtime and
//! reports results back over the UI event channel.

use std::thread;

use client_core::ContactsClient;
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(server_url: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
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
            let client = ContactsClient::new(server_url);

            // Commands run strictly in order, so a fetch queued after a
            // mutation always observes that mutation's effect.
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::FetchContacts => {
                        tracing::info!("backend: fetch_contacts");
                        match client.list_contacts().await {
                            Ok(contacts) => {
                                let _ = ui_tx.try_send(UiEvent::ContactsLoaded(contacts));
                            }
                            Err(err) => {
                                tracing::error!("backend: fetch_contacts failed: {err}");
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_client_error(
                                    UiErrorContext::FetchContacts,
                                    &err,
                                )));
                            }
                        }
                    }
                    BackendCommand::CreateContact { req } => {
                        tracing::info!(email = %req.email, "backend: create_contact");
                        match client.create_contact(&req).await {
                            Ok(()) => {
                                let _ = ui_tx.try_send(UiEvent::MutationDone);
                            }
                            Err(err) => {
                                tracing::error!("backend: create_contact failed: {err}");
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_client_error(
                                    UiErrorContext::SaveContact,
                                    &err,
                                )));
                            }
                        }
                    }
                    BackendCommand::UpdateContact { contact_id, req } => {
                        tracing::info!(contact_id = contact_id.0, "backend: update_contact");
                        match client.update_contact(contact_id, &req).await {
                            Ok(()) => {
                                let _ = ui_tx.try_send(UiEvent::MutationDone);
                            }
                            Err(err) => {
                                tracing::error!(
                                    contact_id = contact_id.0,
                                    "backend: update_contact failed: {err}"
                                );
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_client_error(
                                    UiErrorContext::SaveContact,
                                    &err,
                                )));
                            }
                        }
                    }
                    BackendCommand::DeleteContact { contact_id } => {
                        tracing::info!(contact_id = contact_id.0, "backend: delete_contact");
                        match client.delete_contact(contact_id).await {
                            Ok(()) => {
                                let _ = ui_tx.try_send(UiEvent::MutationDone);
                            }
                            Err(err) => {
                                tracing::error!(
                                    contact_id = contact_id.0,
                                    "backend: delete_contact failed: {err}"
                                );
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_client_error(
                                    UiErrorContext::DeleteContact,
                                    &err,
                                )));
                            }
                        }
                    }
                }
            }
        });
    });
}
