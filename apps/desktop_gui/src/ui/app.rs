use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{
    domain::ContactId,
    protocol::{ContactRecord, CreateContactRequest, UpdateContactRequest},
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiErrorContext, UiEvent};
use crate::controller::modal::ModalState;
use crate::controller::orchestration::dispatch_backend_command;

fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Backend => "Backend",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

/// Text drafts backing the create/edit form fields.
#[derive(Debug, Clone, Default)]
struct ContactFormDraft {
    first_name: String,
    last_name: String,
    email: String,
}

impl ContactFormDraft {
    fn from_contact(contact: &ContactRecord) -> Self {
        Self {
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            email: contact.email.clone(),
        }
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn create_request(&self) -> CreateContactRequest {
        CreateContactRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
        }
    }

    // The form always submits every field, as the original edit form did;
    // partial patches are a wire capability, not a UI one.
    fn update_request(&self) -> UpdateContactRequest {
        UpdateContactRequest {
            first_name: Some(self.first_name.trim().to_string()),
            last_name: Some(self.last_name.trim().to_string()),
            email: Some(self.email.trim().to_string()),
        }
    }
}

#[derive(Debug, Clone)]
struct ErrorBanner {
    message: String,
    retryable: bool,
}

enum ListAction {
    Edit(ContactRecord),
    Delete(ContactId),
}

enum FormAction {
    Submit,
    Cancel,
}

/// Owner of all client-side state: the contact list, the modal state
/// machine, and the channels to the backend worker.
pub struct ContactDeskApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    contacts: Vec<ContactRecord>,
    modal: ModalState,
    form: ContactFormDraft,

    status: String,
    error_banner: Option<ErrorBanner>,
}

impl ContactDeskApp {
    pub fn bootstrap(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            contacts: Vec::new(),
            modal: ModalState::default(),
            form: ContactFormDraft::default(),
            status: "Loading contacts...".to_string(),
            error_banner: None,
        };
        // The one automatic fetch: everything after this goes through
        // on_update.
        app.fetch_contacts();
        app
    }

    fn fetch_contacts(&mut self) {
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::FetchContacts,
            &mut self.status,
        );
    }

    fn open_create_modal(&mut self) {
        if self.modal.open_for_create() {
            self.form.clear();
        }
    }

    fn open_edit_modal(&mut self, contact: ContactRecord) {
        let draft = ContactFormDraft::from_contact(&contact);
        // A dropped request must not touch the open modal's draft.
        if self.modal.open_for_edit(contact) {
            self.form = draft;
        }
    }

    fn close_modal(&mut self) {
        self.modal.close();
        self.form.clear();
    }

    /// Completion path shared by create, edit, and delete: close the modal
    /// and resynchronize from the backend.
    fn on_update(&mut self) {
        self.close_modal();
        self.fetch_contacts();
    }

    fn submit_form(&mut self) {
        let cmd = match &self.modal {
            ModalState::OpenForCreate => BackendCommand::CreateContact {
                req: self.form.create_request(),
            },
            ModalState::OpenForEdit(contact) => BackendCommand::UpdateContact {
                contact_id: contact.id,
                req: self.form.update_request(),
            },
            ModalState::Closed => return,
        };
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn request_delete(&mut self, contact_id: ContactId) {
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::DeleteContact { contact_id },
            &mut self.status,
        );
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::ContactsLoaded(contacts) => {
                    self.status = format!("{} contacts", contacts.len());
                    self.contacts = contacts;
                    self.error_banner = None;
                }
                UiEvent::MutationDone => {
                    self.on_update();
                }
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Error(err) => {
                    self.apply_error(err);
                }
            }
        }
    }

    fn apply_error(&mut self, err: UiError) {
        self.status = format!("{} error: {}", err_label(err.category()), err.message());
        // Fetch failures keep the stale list visible and offer a retry;
        // everything else is just reported.
        self.error_banner = Some(ErrorBanner {
            message: self.status.clone(),
            retryable: err.context() == UiErrorContext::FetchContacts,
        });
    }

    fn show_error_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = self.error_banner.clone() else {
            return;
        };
        egui::Frame::group(ui.style())
            .fill(egui::Color32::from_rgb(60, 26, 26))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::LIGHT_RED, &banner.message);
                    if banner.retryable && ui.button("Retry").clicked() {
                        self.error_banner = None;
                        self.fetch_contacts();
                    }
                    if ui.button("Dismiss").clicked() {
                        self.error_banner = None;
                    }
                });
            });
        ui.add_space(6.0);
    }

    fn show_contact_list(&mut self, ui: &mut egui::Ui) {
        let mut action = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            if self.contacts.is_empty() {
                ui.weak("No contacts yet.");
            }
            for contact in &self.contacts {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.strong(contact.full_name());
                        ui.weak(&contact.email);
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Delete").clicked() {
                            action = Some(ListAction::Delete(contact.id));
                        }
                        if ui.button("Edit").clicked() {
                            action = Some(ListAction::Edit(contact.clone()));
                        }
                    });
                });
                ui.separator();
            }
        });

        match action {
            Some(ListAction::Edit(contact)) => self.open_edit_modal(contact),
            Some(ListAction::Delete(contact_id)) => self.request_delete(contact_id),
            None => {}
        }
    }

    fn show_modal(&mut self, ctx: &egui::Context) {
        if !self.modal.is_open() {
            return;
        }
        let title = if self.modal.editing().is_some() {
            "Edit Contact"
        } else {
            "Create Contact"
        };

        let mut action = None;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                egui::Grid::new("contact_form").num_columns(2).show(ui, |ui| {
                    ui.label("First name");
                    ui.text_edit_singleline(&mut self.form.first_name);
                    ui.end_row();
                    ui.label("Last name");
                    ui.text_edit_singleline(&mut self.form.last_name);
                    ui.end_row();
                    ui.label("Email");
                    ui.text_edit_singleline(&mut self.form.email);
                    ui.end_row();
                });
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    let submit_label = if self.modal.editing().is_some() {
                        "Update"
                    } else {
                        "Create"
                    };
                    if ui.button(submit_label).clicked() {
                        action = Some(FormAction::Submit);
                    }
                    if ui.button("Cancel").clicked() {
                        action = Some(FormAction::Cancel);
                    }
                });
            });

        match action {
            Some(FormAction::Submit) => self.submit_form(),
            Some(FormAction::Cancel) => self.close_modal(),
            None => {}
        }
    }
}

impl eframe::App for ContactDeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.label(&self.status);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Contacts");
            ui.add_space(6.0);
            self.show_error_banner(ui);
            if ui.button("Create New Contact").clicked() {
                self.open_create_modal();
            }
            ui.add_space(6.0);
            self.show_contact_list(ui);
        });

        self.show_modal(ctx);

        // Events arrive from the worker thread; keep polling at a low rate.
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
