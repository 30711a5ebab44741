//! Data source adapter for the customer and training collection resources.

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use shared::{
    domain::{Customer, Training},
    protocol::{CustomerPage, CUSTOMERS_PATH, TRAININGS_PATH},
};
use tracing::debug;
use url::Url;

use crate::error::ClientError;

/// Remote customer store. Mutations report the raw status so the caller
/// decides which statuses count as success.
#[async_trait]
pub trait CustomerApi: Send + Sync {
    async fn list_customers(&self) -> Result<Vec<Customer>, ClientError>;
    async fn create_customer(&self, customer: &Customer) -> Result<StatusCode, ClientError>;
    async fn update_customer(
        &self,
        url: &str,
        customer: &Customer,
    ) -> Result<StatusCode, ClientError>;
    async fn delete_customer(&self, url: &str) -> Result<StatusCode, ClientError>;
    async fn create_training(&self, training: &Training) -> Result<StatusCode, ClientError>;
}

pub struct HttpCustomerApi {
    http: Client,
    base_url: Url,
}

impl HttpCustomerApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url).map_err(|source| ClientError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        // Collection paths join under the base path, so it must end in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    /// Resolves a self link against the base url.
    /// Absolute links are used as-is.
    pub fn resolve(&self, href: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(href)
            .map_err(|source| ClientError::InvalidUrl {
                url: href.to_string(),
                source,
            })
    }

    /// Collection resources live under the base path, e.g. behind a gateway prefix.
    pub fn collection(&self, path: &str) -> Result<Url, ClientError> {
        self.resolve(path.trim_start_matches('/'))
    }

    async fn send_json<T: serde::Serialize + Sync>(
        &self,
        method: Method,
        url: Url,
        body: &T,
    ) -> Result<StatusCode, ClientError> {
        let response = self
            .http
            .request(method.clone(), url.clone())
            .json(body)
            .send()
            .await
            .map_err(|err| ClientError::from_reqwest(method.clone(), url.as_str(), err))?;
        debug!(%method, url = %url, status = %response.status(), "customer api response");
        Ok(response.status())
    }
}

#[async_trait]
impl CustomerApi for HttpCustomerApi {
    async fn list_customers(&self) -> Result<Vec<Customer>, ClientError> {
        let url = self.collection(CUSTOMERS_PATH)?;
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|err| ClientError::from_reqwest(Method::GET, url.as_str(), err))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                method: Method::GET,
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let page: CustomerPage = response
            .json()
            .await
            .map_err(|err| ClientError::from_reqwest(Method::GET, url.as_str(), err))?;
        Ok(page.content)
    }

    async fn create_customer(&self, customer: &Customer) -> Result<StatusCode, ClientError> {
        let url = self.collection(CUSTOMERS_PATH)?;
        self.send_json(Method::POST, url, customer).await
    }

    async fn update_customer(
        &self,
        url: &str,
        customer: &Customer,
    ) -> Result<StatusCode, ClientError> {
        let url = self.resolve(url)?;
        self.send_json(Method::PUT, url, customer).await
    }

    async fn delete_customer(&self, url: &str) -> Result<StatusCode, ClientError> {
        let url = self.resolve(url)?;
        let response = self
            .http
            .delete(url.clone())
            .send()
            .await
            .map_err(|err| ClientError::from_reqwest(Method::DELETE, url.as_str(), err))?;
        debug!(url = %url, status = %response.status(), "customer api response");
        Ok(response.status())
    }

    async fn create_training(&self, training: &Training) -> Result<StatusCode, ClientError> {
        let url = self.collection(TRAININGS_PATH)?;
        self.send_json(Method::POST, url, training).await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
