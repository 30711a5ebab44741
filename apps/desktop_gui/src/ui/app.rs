use std::time::{Duration, Instant};

use client_core::{
    grid::{customer_columns, ColumnDescriptor, ColumnKind, SortDirection, DEFAULT_EXPORT_FILE_NAME},
    GridAction, GridQuery, ViewState,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{Customer, CustomerField};
use tokio::sync::oneshot;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::forms::{CustomerForm, TrainingForm, TRAINING_DATE_FORMAT};

const DATA_COLUMN_MIN_WIDTH: f32 = 100.0;

struct PendingConfirm {
    message: String,
    reply: oneshot::Sender<bool>,
}

enum Dialog {
    AddCustomer(CustomerForm),
    EditCustomer {
        href: String,
        form: CustomerForm,
    },
    AddTraining {
        customer: Customer,
        form: TrainingForm,
        error: Option<String>,
    },
}

enum DialogResult {
    Open,
    Cancelled,
    Submitted(BackendCommand),
}

pub struct CustomerListApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    columns: Vec<ColumnDescriptor>,
    view: ViewState,
    query: GridQuery,
    status: String,
    grid_ready_sent: bool,
    pending_confirm: Option<PendingConfirm>,
    alert: Option<String>,
    dialog: Option<Dialog>,
}

impl CustomerListApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            columns: customer_columns(),
            view: ViewState::default(),
            query: GridQuery::default(),
            status: "Loading customers...".to_string(),
            grid_ready_sent: false,
            pending_confirm: None,
            alert: None,
            dialog: None,
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => self.status = message,
                UiEvent::ViewUpdated(view) => {
                    let total = self.query.displayed(view.customers()).len();
                    self.view = view;
                    self.query.set_page(self.query.page(), total);
                }
                UiEvent::ConfirmRequested { message, reply } => {
                    if let Some(previous) = self.pending_confirm.replace(PendingConfirm { message, reply }) {
                        let _ = previous.reply.send(false);
                    }
                }
                UiEvent::Alert(message) => self.alert = Some(message),
                UiEvent::Exported { rows, path } => {
                    self.status = format!("Exported {rows} customers to {}", path.display());
                }
                UiEvent::Error(err) => {
                    tracing::warn!(context = ?err.context(), category = ?err.category(), "{}", err.message());
                    if let Some(line) = err.status_line() {
                        self.status = line;
                    }
                }
            }
        }
    }

    fn show_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Add customer").clicked() {
                self.dialog = Some(Dialog::AddCustomer(CustomerForm::blank()));
            }
            if ui.button(GridAction::Export.label()).clicked() {
                self.export_csv();
            }
            if ui.button("Refresh").clicked() {
                self.dispatch(BackendCommand::Reload);
            }
            ui.separator();
            ui.label(self.status.as_str());
        });
    }

    fn export_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(DEFAULT_EXPORT_FILE_NAME)
            .add_filter("CSV", &["csv"])
            .save_file()
        else {
            return;
        };
        let query = self.query.clone();
        self.dispatch(BackendCommand::ExportCsv { path, query });
    }

    fn show_grid(&mut self, ui: &mut egui::Ui) {
        let mut clicked: Option<(GridAction, Customer)> = None;
        let mut sort_clicked: Option<CustomerField> = None;
        let mut filter_changes: Vec<(CustomerField, String)> = Vec::new();

        egui::ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
            egui::Grid::new("customer_grid")
                .striped(true)
                .num_columns(self.columns.len())
                .min_col_width(DATA_COLUMN_MIN_WIDTH)
                .show(ui, |ui| {
                    for column in &self.columns {
                        match column.kind {
                            ColumnKind::Data(field) => {
                                let arrow = match self.query.sort() {
                                    Some((sorted, SortDirection::Ascending)) if sorted == field => " ^",
                                    Some((sorted, SortDirection::Descending)) if sorted == field => " v",
                                    _ => "",
                                };
                                let header = egui::RichText::new(format!("{}{arrow}", column.header)).strong();
                                if !column.sortable {
                                    ui.label(header);
                                } else if ui.button(header).clicked() {
                                    sort_clicked = Some(field);
                                }
                            }
                            ColumnKind::Action(_) => {
                                ui.label(column.header);
                            }
                        }
                    }
                    ui.end_row();

                    for column in &self.columns {
                        match column.field() {
                            Some(field) if column.filterable => {
                                let mut text = self.query.filter(field).to_string();
                                let edit = egui::TextEdit::singleline(&mut text)
                                    .hint_text("filter")
                                    .desired_width(DATA_COLUMN_MIN_WIDTH);
                                if ui.add(edit).changed() {
                                    filter_changes.push((field, text));
                                }
                            }
                            _ => {
                                ui.label("");
                            }
                        }
                    }
                    ui.end_row();

                    for customer in self.query.page_rows(self.view.customers()) {
                        for column in &self.columns {
                            match column.kind {
                                ColumnKind::Data(field) => {
                                    ui.label(customer.field(field));
                                }
                                ColumnKind::Action(action) => {
                                    let width = column.width.unwrap_or(DATA_COLUMN_MIN_WIDTH);
                                    let button = egui::Button::new(action.label());
                                    if ui.add_sized([width, 20.0], button).clicked() {
                                        clicked = Some((action, customer.clone()));
                                    }
                                }
                            }
                        }
                        ui.end_row();
                    }
                });
        });

        if let Some(field) = sort_clicked {
            self.query.toggle_sort(field);
        }
        for (field, text) in filter_changes {
            self.query.set_filter(field, text);
        }
        if let Some((action, customer)) = clicked {
            self.on_row_action(action, customer);
        }
    }

    fn show_pagination(&mut self, ui: &mut egui::Ui) {
        let total = self.query.displayed(self.view.customers()).len();
        let page = self.query.page();
        let pages = self.query.page_count(total);
        ui.horizontal(|ui| {
            if ui.add_enabled(page > 0, egui::Button::new("< Prev")).clicked() {
                self.query.set_page(page - 1, total);
            }
            ui.label(format!("Page {} of {pages} ({total} rows)", page + 1));
            if ui.add_enabled(page + 1 < pages, egui::Button::new("Next >")).clicked() {
                self.query.set_page(page + 1, total);
            }
        });
    }

    fn on_row_action(&mut self, action: GridAction, customer: Customer) {
        let href = match customer.self_href() {
            Ok(href) => href.to_string(),
            Err(err) => {
                self.status = err.to_string();
                return;
            }
        };
        match action {
            GridAction::AttachTraining => {
                self.dialog = Some(Dialog::AddTraining {
                    customer,
                    form: TrainingForm::default(),
                    error: None,
                });
            }
            GridAction::Edit => {
                self.dialog = Some(Dialog::EditCustomer {
                    form: CustomerForm::from_customer(&customer),
                    href,
                });
            }
            GridAction::Delete => self.dispatch(BackendCommand::DeleteCustomer { href }),
            GridAction::Export => self.export_csv(),
        }
    }

    fn show_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        let result = match dialog {
            Dialog::AddCustomer(form) => customer_window(ctx, "New customer", form, |customer| {
                BackendCommand::AddCustomer { customer }
            }),
            Dialog::EditCustomer { href, form } => {
                let href = href.clone();
                customer_window(ctx, "Edit customer", form, move |customer| {
                    BackendCommand::EditCustomer { href, customer }
                })
            }
            Dialog::AddTraining {
                customer,
                form,
                error,
            } => training_window(ctx, customer, form, error),
        };
        match result {
            DialogResult::Open => {}
            DialogResult::Cancelled => self.dialog = None,
            DialogResult::Submitted(cmd) => {
                self.dialog = None;
                self.dispatch(cmd);
            }
        }
    }

    fn show_modals(&mut self, ctx: &egui::Context) {
        if let Some(pending) = &self.pending_confirm {
            let mut answer = None;
            modal(ctx, "Confirm", |ui| {
                ui.label(pending.message.as_str());
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        answer = Some(true);
                    }
                    if ui.button("Cancel").clicked() {
                        answer = Some(false);
                    }
                });
            });
            if let Some(answer) = answer {
                if let Some(pending) = self.pending_confirm.take() {
                    let _ = pending.reply.send(answer);
                }
            }
        }

        if let Some(message) = &self.alert {
            let mut dismissed = false;
            modal(ctx, "Alert", |ui| {
                ui.colored_label(egui::Color32::RED, message.as_str());
                dismissed = ui.button("OK").clicked();
            });
            if dismissed {
                self.alert = None;
            }
        }
    }

    fn show_notification(&mut self, ctx: &egui::Context) {
        let Some(message) = self
            .view
            .notification()
            .message_at(Instant::now())
            .map(str::to_string)
        else {
            return;
        };
        let mut dismiss = false;
        egui::TopBottomPanel::bottom("notification").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(message.as_str()).strong());
                dismiss = ui.small_button("x").clicked();
            });
        });
        if dismiss {
            self.dispatch(BackendCommand::DismissNotification);
        }
    }
}

fn modal(ctx: &egui::Context, title: &str, add: impl FnOnce(&mut egui::Ui)) {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, add);
}

fn customer_window(
    ctx: &egui::Context,
    title: &str,
    form: &mut CustomerForm,
    submit: impl FnOnce(Customer) -> BackendCommand,
) -> DialogResult {
    let mut result = DialogResult::Open;
    let mut save = false;
    modal(ctx, title, |ui| {
        egui::Grid::new(("customer_form", title)).num_columns(2).show(ui, |ui| {
            for field in CustomerField::ALL {
                ui.label(field.label());
                ui.text_edit_singleline(form.field_mut(field));
                ui.end_row();
            }
        });
        ui.horizontal(|ui| {
            save = ui.button("Save").clicked();
            if ui.button("Cancel").clicked() {
                result = DialogResult::Cancelled;
            }
        });
    });
    if save {
        result = DialogResult::Submitted(submit(std::mem::take(form).into_customer()));
    }
    result
}

fn training_window(
    ctx: &egui::Context,
    customer: &Customer,
    form: &mut TrainingForm,
    error: &mut Option<String>,
) -> DialogResult {
    let mut result = DialogResult::Open;
    let mut save = false;
    modal(ctx, "New training", |ui| {
        ui.label(format!("Customer: {}", customer.display_name()));
        egui::Grid::new("training_form").num_columns(2).show(ui, |ui| {
            ui.label(format!("Date ({TRAINING_DATE_FORMAT}, UTC)"));
            ui.text_edit_singleline(&mut form.date);
            ui.end_row();
            ui.label("Activity");
            ui.text_edit_singleline(&mut form.activity);
            ui.end_row();
            ui.label("Duration (min)");
            ui.text_edit_singleline(&mut form.duration);
            ui.end_row();
        });
        if let Some(message) = error.as_deref() {
            ui.colored_label(egui::Color32::RED, message);
        }
        ui.horizontal(|ui| {
            save = ui.button("Save").clicked();
            if ui.button("Cancel").clicked() {
                result = DialogResult::Cancelled;
            }
        });
    });
    if save {
        match form.to_training(customer) {
            Ok(training) => result = DialogResult::Submitted(BackendCommand::AddTraining { training }),
            Err(message) => *error = Some(message),
        }
    }
    result
}

impl eframe::App for CustomerListApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        if !self.grid_ready_sent {
            self.grid_ready_sent = true;
            self.dispatch(BackendCommand::GridReady);
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.show_toolbar(ui));
        self.show_notification(ctx);
        egui::TopBottomPanel::bottom("pagination").show(ctx, |ui| self.show_pagination(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.show_grid(ui));
        self.show_dialog(ctx);
        self.show_modals(ctx);

        let repaint = self
            .view
            .notification()
            .remaining(Instant::now())
            .unwrap_or(Duration::from_millis(100))
            .min(Duration::from_millis(100));
        ctx.request_repaint_after(repaint);
    }
}

impl Drop for CustomerListApp {
    fn drop(&mut self) {
        if let Some(pending) = self.pending_confirm.take() {
            let _ = pending.reply.send(false);
        }
    }
}
