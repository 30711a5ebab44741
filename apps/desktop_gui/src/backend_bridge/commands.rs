//! Backend commands queued from UI to backend worker.

use std::path::PathBuf;

use client_core::GridQuery;
use shared::domain::{Customer, Training};

pub enum BackendCommand {
    Reload,
    GridReady,
    AddCustomer {
        customer: Customer,
    },
    EditCustomer {
        href: String,
        customer: Customer,
    },
    DeleteCustomer {
        href: String,
    },
    AddTraining {
        training: Training,
    },
    DismissNotification,
    ExportCsv {
        path: PathBuf,
        query: GridQuery,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Reload => "reload",
            BackendCommand::GridReady => "grid_ready",
            BackendCommand::AddCustomer { .. } => "add_customer",
            BackendCommand::EditCustomer { .. } => "edit_customer",
            BackendCommand::DeleteCustomer { .. } => "delete_customer",
            BackendCommand::AddTraining { .. } => "add_training",
            BackendCommand::DismissNotification => "dismiss_notification",
            BackendCommand::ExportCsv { .. } => "export_csv",
        }
    }
}
