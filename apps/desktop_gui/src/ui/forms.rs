//! Drafts backing the add/edit customer and add-training dialogs.

use chrono::{NaiveDateTime, Utc};
use shared::domain::{Customer, CustomerField, Training};

pub const TRAINING_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Default)]
pub struct CustomerForm {
    draft: Customer,
}

impl CustomerForm {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            draft: customer.to_draft(),
        }
    }

    pub fn field_mut(&mut self, field: CustomerField) -> &mut String {
        self.draft.field_mut(field)
    }

    pub fn into_customer(self) -> Customer {
        self.draft
    }
}

#[derive(Debug, Clone)]
pub struct TrainingForm {
    pub date: String,
    pub activity: String,
    pub duration: String,
}

impl Default for TrainingForm {
    fn default() -> Self {
        Self {
            date: Utc::now().format(TRAINING_DATE_FORMAT).to_string(),
            activity: String::new(),
            duration: String::new(),
        }
    }
}

impl TrainingForm {
    pub fn to_training(&self, customer: &Customer) -> Result<Training, String> {
        let date = NaiveDateTime::parse_from_str(self.date.trim(), TRAINING_DATE_FORMAT)
            .map_err(|_| format!("Date must look like {}", Utc::now().format(TRAINING_DATE_FORMAT)))?
            .and_utc();
        let activity = self.activity.trim();
        if activity.is_empty() {
            return Err("Activity is required".to_string());
        }
        let duration = self
            .duration
            .trim()
            .parse::<u32>()
            .map_err(|_| "Duration must be a whole number of minutes".to_string())?;
        Training::for_customer(customer, date, activity, duration).map_err(|err| err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::Link;

    fn ada() -> Customer {
        Customer {
            firstname: "Ada".into(),
            links: vec![Link::new("/api/customers/1")],
            ..Customer::default()
        }
    }

    #[test]
    fn edit_form_drops_links() {
        let mut form = CustomerForm::from_customer(&ada());
        *form.field_mut(CustomerField::City) = "London".into();
        let customer = form.into_customer();
        assert_eq!(customer.firstname, "Ada");
        assert_eq!(customer.city, "London");
        assert!(customer.links.is_empty());
    }

    #[test]
    fn training_form_builds_training_for_row() {
        let form = TrainingForm {
            date: "2026-10-18 07:45".into(),
            activity: " Boxing ".into(),
            duration: "50".into(),
        };
        let training = form.to_training(&ada()).expect("training");
        assert_eq!(training.activity, "Boxing");
        assert_eq!(training.duration, 50);
        assert_eq!(training.customer, "/api/customers/1");
        assert_eq!(training.date.to_rfc3339(), "2026-10-18T07:45:00+00:00");
    }

    #[test]
    fn training_form_reports_invalid_input() {
        let mut form = TrainingForm {
            date: "yesterday".into(),
            activity: "Gym".into(),
            duration: "30".into(),
        };
        assert!(form.to_training(&ada()).is_err());

        form.date = "2026-10-18 07:45".into();
        form.duration = "half an hour".into();
        assert_eq!(
            form.to_training(&ada()).expect_err("duration"),
            "Duration must be a whole number of minutes"
        );

        form.duration = "30".into();
        assert!(form.to_training(&Customer::default()).is_err());
    }
}
