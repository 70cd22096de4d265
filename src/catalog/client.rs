//! Catalog lookup client
//!
//! `CatalogClient` is the seam the enrichment pipeline depends on; the HTTP
//! implementation talks to the metadata API. Tests substitute an in-memory
//! implementation.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::credentials::Credentials;
use super::entities::{Dataset, Geography, Variable};
use super::error::CatalogError;

/// Read-only metadata lookups by entity id.
pub trait CatalogClient {
    fn variable(&self, id: &str) -> Result<Variable, CatalogError>;
    fn dataset(&self, id: &str) -> Result<Dataset, CatalogError>;
    fn geography(&self, id: &str) -> Result<Geography, CatalogError>;
}

/// Catalog client backed by the hosted metadata API.
pub struct HttpCatalog {
    credentials: Credentials,
    http: Client,
}

impl HttpCatalog {
    pub fn new(credentials: Credentials) -> Self {
        HttpCatalog {
            credentials,
            http: Client::new(),
        }
    }

    fn get_entity<T: DeserializeOwned>(
        &self,
        kind: &'static str,
        path: &str,
        id: &str,
    ) -> Result<T, CatalogError> {
        let url = format!(
            "{}/api/v4/data/observatory/metadata/{}/{}",
            self.credentials.base_url(),
            path,
            id
        );
        debug!(kind, id, "catalog lookup");

        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.credentials.api_key.as_str())])
            .send()?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound {
                kind,
                id: id.to_string(),
            });
        }

        let response = response.error_for_status()?;
        response.json::<T>().map_err(|e| CatalogError::Malformed {
            kind,
            id: id.to_string(),
            detail: e.to_string(),
        })
    }
}

impl CatalogClient for HttpCatalog {
    fn variable(&self, id: &str) -> Result<Variable, CatalogError> {
        self.get_entity("variable", "variables", id)
    }

    fn dataset(&self, id: &str) -> Result<Dataset, CatalogError> {
        self.get_entity("dataset", "datasets", id)
    }

    fn geography(&self, id: &str) -> Result<Geography, CatalogError> {
        self.get_entity("geography", "geographies", id)
    }
}
