use std::time::{Duration, Instant};

use reqwest::StatusCode;
use shared::domain::Customer;

use crate::grid::GridHandle;

pub const NOTIFICATION_AUTO_HIDE: Duration = Duration::from_millis(3000);

/// Transient message shown after a successful update or delete.
///
/// Visibility is derived from the show time, so a reader that never calls
/// [`Notification::expire`] still sees it hide after [`NOTIFICATION_AUTO_HIDE`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Notification {
    #[default]
    Hidden,
    Visible { message: String, shown_at: Instant },
}

impl Notification {
    /// Shows `message`, restarting the timer if already visible.
    pub fn show(&mut self, message: impl Into<String>, now: Instant) {
        *self = Self::Visible {
            message: message.into(),
            shown_at: now,
        };
    }

    /// Returns whether a visible notification was hidden.
    pub fn dismiss(&mut self) -> bool {
        let was_visible = matches!(self, Self::Visible { .. });
        *self = Self::Hidden;
        was_visible
    }

    /// Hides the notification once its display time has elapsed.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self {
            Self::Visible { shown_at, .. }
                if now.saturating_duration_since(*shown_at) >= NOTIFICATION_AUTO_HIDE =>
            {
                self.dismiss()
            }
            _ => false,
        }
    }

    pub fn message_at(&self, now: Instant) -> Option<&str> {
        match self {
            Self::Visible { message, shown_at }
                if now.saturating_duration_since(*shown_at) < NOTIFICATION_AUTO_HIDE =>
            {
                Some(message)
            }
            _ => None,
        }
    }

    pub fn is_visible_at(&self, now: Instant) -> bool {
        self.message_at(now).is_some()
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        match self {
            Self::Visible { shown_at, .. } => {
                NOTIFICATION_AUTO_HIDE.checked_sub(now.saturating_duration_since(*shown_at))
            }
            Self::Hidden => None,
        }
    }
}

/// Everything the customer view renders from.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub(crate) customers: Vec<Customer>,
    pub(crate) notification: Notification,
    pub(crate) grid: Option<GridHandle>,
}

impl ViewState {
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn notification(&self) -> &Notification {
        &self.notification
    }

    pub fn grid(&self) -> Option<&GridHandle> {
        self.grid.as_ref()
    }

    pub fn find_by_href(&self, href: &str) -> Option<&Customer> {
        self.customers
            .iter()
            .find(|customer| customer.self_href().is_ok_and(|own| own == href))
    }
}

/// Branch taken by a command dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The server accepted the command and the list was reloaded.
    Applied,
    /// The server answered with a non-success status; an alert was raised.
    Rejected { status: StatusCode },
    /// No response was received; the failure was only logged.
    TransportFailed,
    /// The user declined the confirmation; nothing was sent.
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_hides_after_three_seconds() {
        let start = Instant::now();
        let mut notification = Notification::default();
        notification.show("Customer deleted", start);

        let almost = start + Duration::from_millis(2999);
        assert_eq!(notification.message_at(start), Some("Customer deleted"));
        assert!(notification.is_visible_at(almost));
        assert!(!notification.expire(almost));

        let elapsed = start + NOTIFICATION_AUTO_HIDE;
        assert!(!notification.is_visible_at(elapsed));
        assert!(notification.expire(elapsed));
        assert_eq!(notification, Notification::Hidden);
    }

    #[test]
    fn dismiss_hides_immediately() {
        let start = Instant::now();
        let mut notification = Notification::default();
        notification.show("Customer info updated", start);
        assert!(notification.dismiss());
        assert!(!notification.is_visible_at(start));
        assert!(!notification.dismiss());
    }

    #[test]
    fn retrigger_restarts_timer() {
        let start = Instant::now();
        let mut notification = Notification::default();
        notification.show("Customer info updated", start);
        let later = start + Duration::from_millis(2000);
        notification.show("Customer deleted", later);

        let check = start + Duration::from_millis(4000);
        assert_eq!(notification.message_at(check), Some("Customer deleted"));
        assert_eq!(
            notification.remaining(check),
            Some(Duration::from_millis(1000))
        );
    }
}
