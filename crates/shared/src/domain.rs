use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    pub href: String,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            rel: None,
            href: href.into(),
        }
    }
}

/// A customer as exchanged with the customer collection resource.
///
/// Customers carry no id of their own; `links[0].href` is the resource URL
/// used for update and delete. A customer without links is a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub streetaddress: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl Customer {
    pub fn self_href(&self) -> Result<&str, DomainError> {
        self.links
            .first()
            .map(|link| link.href.as_str())
            .ok_or_else(|| DomainError::MissingSelfLink {
                customer: self.display_name(),
            })
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
            .trim()
            .to_string()
    }

    pub fn field(&self, field: CustomerField) -> &str {
        match field {
            CustomerField::Firstname => &self.firstname,
            CustomerField::Lastname => &self.lastname,
            CustomerField::Streetaddress => &self.streetaddress,
            CustomerField::Postcode => &self.postcode,
            CustomerField::City => &self.city,
            CustomerField::Email => &self.email,
            CustomerField::Phone => &self.phone,
        }
    }

    pub fn field_mut(&mut self, field: CustomerField) -> &mut String {
        match field {
            CustomerField::Firstname => &mut self.firstname,
            CustomerField::Lastname => &mut self.lastname,
            CustomerField::Streetaddress => &mut self.streetaddress,
            CustomerField::Postcode => &mut self.postcode,
            CustomerField::City => &mut self.city,
            CustomerField::Email => &mut self.email,
            CustomerField::Phone => &mut self.phone,
        }
    }

    /// Copy of the editable fields without links, as sent in request bodies.
    pub fn to_draft(&self) -> Self {
        Self {
            links: Vec::new(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerField {
    Firstname,
    Lastname,
    Streetaddress,
    Postcode,
    City,
    Email,
    Phone,
}

impl CustomerField {
    pub const ALL: [CustomerField; 7] = [
        CustomerField::Firstname,
        CustomerField::Lastname,
        CustomerField::Streetaddress,
        CustomerField::Postcode,
        CustomerField::City,
        CustomerField::Email,
        CustomerField::Phone,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CustomerField::Firstname => "firstname",
            CustomerField::Lastname => "lastname",
            CustomerField::Streetaddress => "streetaddress",
            CustomerField::Postcode => "postcode",
            CustomerField::City => "city",
            CustomerField::Email => "email",
            CustomerField::Phone => "phone",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CustomerField::Firstname => "Firstname",
            CustomerField::Lastname => "Lastname",
            CustomerField::Streetaddress => "Streetaddress",
            CustomerField::Postcode => "Postcode",
            CustomerField::City => "City",
            CustomerField::Email => "Email",
            CustomerField::Phone => "Phone",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(key.trim()))
    }
}

impl std::str::FromStr for CustomerField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| DomainError::UnknownField(s.to_string()))
    }
}

/// Training session attached to a customer through the customer's self link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Training {
    pub date: DateTime<Utc>,
    pub activity: String,
    /// Minutes.
    pub duration: u32,
    pub customer: String,
}

impl Training {
    pub fn for_customer(
        customer: &Customer,
        date: DateTime<Utc>,
        activity: impl Into<String>,
        duration: u32,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            date,
            activity: activity.into(),
            duration,
            customer: customer.self_href()?.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ada() -> Customer {
        Customer {
            firstname: "Ada".into(),
            lastname: "Lovelace".into(),
            links: vec![Link::new("/api/customers/1"), Link::new("/api/customers/1/trainings")],
            ..Customer::default()
        }
    }

    #[test]
    fn self_href_is_first_link() {
        assert_eq!(ada().self_href().expect("self link"), "/api/customers/1");
    }

    #[test]
    fn draft_without_links_has_no_identity() {
        let err = ada().to_draft().self_href().expect_err("draft has no link");
        assert!(matches!(err, DomainError::MissingSelfLink { .. }));
    }

    #[test]
    fn draft_serializes_without_links_key() {
        let json = serde_json::to_value(ada().to_draft()).expect("serialize");
        assert!(json.get("links").is_none());
        assert_eq!(json["firstname"], "Ada");
    }

    #[test]
    fn field_keys_round_trip() {
        for field in CustomerField::ALL {
            assert_eq!(CustomerField::from_key(field.key()), Some(field));
        }
        assert_eq!(CustomerField::from_key(" City "), Some(CustomerField::City));
        assert_eq!(CustomerField::from_key("id"), None);
        assert_eq!(
            "id".parse::<CustomerField>(),
            Err(DomainError::UnknownField("id".into()))
        );
    }

    #[test]
    fn training_references_customer_self_link() {
        let date = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        let training = Training::for_customer(&ada(), date, "Spinning", 45).expect("training");
        let json = serde_json::to_value(&training).expect("serialize");
        assert_eq!(json["customer"], "/api/customers/1");
        assert_eq!(json["duration"], 45);
        assert_eq!(json["date"], "2026-10-18T09:30:00Z");
    }
}
