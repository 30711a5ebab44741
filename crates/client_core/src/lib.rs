use std::{io::Write, sync::Arc, time::Instant};

use async_trait::async_trait;
use shared::{
    domain::{Customer, Training},
    protocol::{
        ALERT_GENERIC_FAILURE, CONFIRM_DELETE, NOTICE_CUSTOMER_DELETED, NOTICE_CUSTOMER_UPDATED,
    },
};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

pub mod config;
pub mod error;
pub mod grid;
pub mod transport;
pub mod types;

pub use config::{load_settings, ClientSettings};
pub use error::ClientError;
pub use grid::{GridAction, GridHandle, GridQuery};
pub use transport::{CustomerApi, HttpCustomerApi};
pub use types::{CommandOutcome, Notification, ViewState, NOTIFICATION_AUTO_HIDE};

/// User-facing dialogs owned by the front end.
#[async_trait]
pub trait Prompt: Send + Sync {
    /// Blocks the command until the user answers.
    async fn confirm(&self, message: &str) -> bool;
    async fn alert(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    CustomersReloaded { count: usize },
    NotificationShown(String),
    NotificationHidden,
    Alert(String),
    Error(String),
}

/// The customer list component: owns the view state and dispatches commands
/// against a [`CustomerApi`], reloading the whole list after each success.
pub struct CustomerList {
    api: Arc<dyn CustomerApi>,
    prompt: Arc<dyn Prompt>,
    state: RwLock<ViewState>,
    events: broadcast::Sender<ClientEvent>,
}

impl CustomerList {
    pub fn new(api: Arc<dyn CustomerApi>, prompt: Arc<dyn Prompt>) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            api,
            prompt,
            state: RwLock::new(ViewState::default()),
            events,
        }
    }

    pub fn from_settings(
        settings: &ClientSettings,
        prompt: Arc<dyn Prompt>,
    ) -> Result<Self, ClientError> {
        let api = HttpCustomerApi::new(&settings.api_base_url)?;
        Ok(Self::new(Arc::new(api), prompt))
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: ClientEvent) {
        let _ = self.events.send(event);
    }

    pub async fn snapshot(&self) -> ViewState {
        self.state.read().await.clone()
    }

    pub async fn customers(&self) -> Vec<Customer> {
        self.state.read().await.customers.clone()
    }

    pub async fn mount(&self) -> Result<usize, ClientError> {
        self.reload().await
    }

    /// Replaces the list with the server's. On failure the previous rows stay.
    pub async fn reload(&self) -> Result<usize, ClientError> {
        match self.api.list_customers().await {
            Ok(customers) => {
                let count = customers.len();
                self.state.write().await.customers = customers;
                info!(count, "customer list reloaded");
                self.emit(ClientEvent::CustomersReloaded { count });
                Ok(count)
            }
            Err(err) => {
                warn!("customer reload failed; keeping previous rows: {err}");
                self.emit(ClientEvent::Error(err.to_string()));
                Err(err)
            }
        }
    }

    pub async fn add_customer(&self, customer: Customer) -> CommandOutcome {
        match self.api.create_customer(&customer.to_draft()).await {
            Ok(status) => {
                debug!(%status, "customer create resolved");
                let _ = self.reload().await;
                CommandOutcome::Applied
            }
            Err(err) => self.transport_failed("add_customer", err),
        }
    }

    pub async fn edit_customer(&self, url: &str, customer: Customer) -> CommandOutcome {
        match self.api.update_customer(url, &customer.to_draft()).await {
            Ok(status) if status.is_success() => {
                self.show_notification(NOTICE_CUSTOMER_UPDATED).await;
                let _ = self.reload().await;
                CommandOutcome::Applied
            }
            Ok(status) => self.rejected("edit_customer", url, status).await,
            Err(err) => self.transport_failed("edit_customer", err),
        }
    }

    /// Asks for confirmation first; nothing is sent when declined.
    pub async fn delete_customer(&self, url: &str) -> CommandOutcome {
        if !self.prompt.confirm(CONFIRM_DELETE).await {
            debug!(url, "customer delete cancelled");
            return CommandOutcome::Cancelled;
        }
        match self.api.delete_customer(url).await {
            Ok(status) if status.is_success() => {
                self.show_notification(NOTICE_CUSTOMER_DELETED).await;
                let _ = self.reload().await;
                CommandOutcome::Applied
            }
            Ok(status) => self.rejected("delete_customer", url, status).await,
            Err(err) => self.transport_failed("delete_customer", err),
        }
    }

    pub async fn add_training(&self, training: Training) -> CommandOutcome {
        match self.api.create_training(&training).await {
            Ok(status) => {
                debug!(%status, customer = %training.customer, "training create resolved");
                let _ = self.reload().await;
                CommandOutcome::Applied
            }
            Err(err) => self.transport_failed("add_training", err),
        }
    }

    async fn rejected(
        &self,
        command: &'static str,
        url: &str,
        status: reqwest::StatusCode,
    ) -> CommandOutcome {
        warn!(command, url, %status, "server rejected customer command");
        self.emit(ClientEvent::Alert(ALERT_GENERIC_FAILURE.to_string()));
        self.prompt.alert(ALERT_GENERIC_FAILURE).await;
        CommandOutcome::Rejected { status }
    }

    fn transport_failed(&self, command: &'static str, err: ClientError) -> CommandOutcome {
        warn!(command, "customer command failed: {err}");
        self.emit(ClientEvent::Error(err.to_string()));
        CommandOutcome::TransportFailed
    }

    async fn show_notification(&self, message: &str) {
        self.state
            .write()
            .await
            .notification
            .show(message, Instant::now());
        self.emit(ClientEvent::NotificationShown(message.to_string()));
    }

    pub async fn dismiss_notification(&self) {
        if self.state.write().await.notification.dismiss() {
            self.emit(ClientEvent::NotificationHidden);
        }
    }

    /// Applies the auto-hide timer. Returns whether the notification was hidden.
    pub async fn expire_notification(&self, now: Instant) -> bool {
        let hidden = self.state.write().await.notification.expire(now);
        if hidden {
            self.emit(ClientEvent::NotificationHidden);
        }
        hidden
    }

    /// Waits out the visible notification's display time, then hides it.
    /// A notification shown again meanwhile keeps its own later deadline.
    pub async fn auto_hide_notification(&self) -> bool {
        let remaining = match &self.state.read().await.notification {
            Notification::Hidden => return false,
            visible => visible.remaining(Instant::now()).unwrap_or_default(),
        };
        tokio::time::sleep(remaining).await;
        self.expire_notification(Instant::now()).await
    }

    /// Grid readiness is signaled once; later signals keep the first handle.
    pub async fn on_grid_ready(&self, handle: GridHandle) {
        let mut state = self.state.write().await;
        if state.grid.is_some() {
            debug!("grid already signaled ready");
            return;
        }
        state.grid = Some(handle);
        debug!("grid ready");
    }

    /// Exports the rows currently held, without refetching.
    pub async fn export_csv<W: Write>(
        &self,
        query: &GridQuery,
        out: W,
    ) -> Result<usize, ClientError> {
        let state = self.state.read().await;
        let grid = state.grid.as_ref().ok_or(ClientError::GridNotReady)?;
        let written = grid.export_csv(&state.customers, query, out)?;
        info!(rows = written, "exported customers to csv");
        Ok(written)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
