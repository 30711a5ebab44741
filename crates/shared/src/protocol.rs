use serde::{Deserialize, Serialize};

use crate::domain::Customer;

pub const CUSTOMERS_PATH: &str = "/api/customers";
pub const TRAININGS_PATH: &str = "/api/trainings";

pub const NOTICE_CUSTOMER_UPDATED: &str = "Customer info updated";
pub const NOTICE_CUSTOMER_DELETED: &str = "Customer deleted";
pub const ALERT_GENERIC_FAILURE: &str = "Something went wrong!";
pub const CONFIRM_DELETE: &str = "Are you sure?";

/// Body of `GET /api/customers`. Paging and link metadata are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerPage {
    pub content: Vec<Customer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_collection_body_ignoring_extra_keys() {
        let body = r#"{
            "links": [{"rel": "self", "href": "https://example.test/api/customers"}],
            "content": [{
                "firstname": "Ada", "lastname": "Lovelace", "streetaddress": "1 Analytical Way",
                "postcode": "00100", "city": "London", "email": "ada@example.test", "phone": "555",
                "content": [],
                "links": [{"rel": "self", "href": "https://example.test/api/customers/1"}]
            }],
            "page": {"size": 20, "totalElements": 1}
        }"#;
        let page: CustomerPage = serde_json::from_str(body).expect("decode");
        assert_eq!(page.content.len(), 1);
        assert_eq!(
            page.content[0].self_href().expect("link"),
            "https://example.test/api/customers/1"
        );
    }

    #[test]
    fn missing_content_is_a_decode_failure() {
        assert!(serde_json::from_str::<CustomerPage>(r#"{"links": []}"#).is_err());
    }
}
