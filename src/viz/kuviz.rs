//! Kuviz publication
//!
//! A kuviz is the hosted published-map artifact. The publisher keeps the
//! record of the current publication so update and delete address the right
//! one.

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::credentials::Credentials;
use super::constants::{PRIVACY_PASSWORD, PRIVACY_PUBLIC};
use super::error::PublishError;

/// The hosted published-map record.
#[derive(Debug, Clone, Deserialize)]
pub struct Kuviz {
    pub id: String,
    pub url: String,
    pub name: String,
    pub privacy: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Publishes rendered map documents to the hosted viewer.
pub struct KuvizPublisher {
    credentials: Credentials,
    http: Client,
    kuviz: Option<Kuviz>,
}

impl KuvizPublisher {
    pub fn new(credentials: Credentials) -> Self {
        KuvizPublisher {
            credentials,
            http: Client::new(),
            kuviz: None,
        }
    }

    pub fn is_published(&self) -> bool {
        self.kuviz.is_some()
    }

    pub fn kuviz(&self) -> Option<&Kuviz> {
        self.kuviz.as_ref()
    }

    /// Publish `html` under `name`. A password makes the publication
    /// password-protected; otherwise it is public.
    pub fn publish(
        &mut self,
        html: &str,
        name: &str,
        password: Option<&str>,
    ) -> Result<&Kuviz, PublishError> {
        let url = format!("{}/api/v4/kuviz", self.credentials.base_url());
        let kuviz = self.send(self.http.post(&url), html, name, password)?;
        info!(name, privacy = %kuviz.privacy, "published map");
        Ok(&*self.kuviz.insert(kuviz))
    }

    /// Replace the current publication's content, name, or privacy.
    pub fn update_publication(
        &mut self,
        html: &str,
        name: &str,
        password: Option<&str>,
    ) -> Result<&Kuviz, PublishError> {
        let current = self.kuviz.as_ref().ok_or(PublishError::NotPublished)?;
        let url = format!(
            "{}/api/v4/kuviz/{}",
            self.credentials.base_url(),
            current.id
        );
        let kuviz = self.send(self.http.put(&url), html, name, password)?;
        info!(name, id = %kuviz.id, "updated publication");
        Ok(&*self.kuviz.insert(kuviz))
    }

    /// Remove the current publication from the viewer.
    pub fn delete_publication(&mut self) -> Result<(), PublishError> {
        let current = self.kuviz.as_ref().ok_or(PublishError::NotPublished)?;
        let url = format!(
            "{}/api/v4/kuviz/{}",
            self.credentials.base_url(),
            current.id
        );

        let response = self
            .http
            .delete(&url)
            .query(&[("api_key", self.credentials.api_key.as_str())])
            .send()?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().unwrap_or_default();
            return Err(PublishError::Api { status, message });
        }

        info!(id = %current.id, "deleted publication");
        self.kuviz = None;
        Ok(())
    }

    fn send(
        &self,
        request: reqwest::blocking::RequestBuilder,
        html: &str,
        name: &str,
        password: Option<&str>,
    ) -> Result<Kuviz, PublishError> {
        let privacy = if password.is_some() {
            PRIVACY_PASSWORD
        } else {
            PRIVACY_PUBLIC
        };

        let response = request
            .query(&[("api_key", self.credentials.api_key.as_str())])
            .json(&json!({
                "data": html,
                "name": name,
                "privacy": privacy,
                "password": password,
            }))
            .send()?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().unwrap_or_default();
            return Err(PublishError::Api { status, message });
        }

        response.json::<Kuviz>().map_err(PublishError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_before_publish_is_rejected() {
        let mut publisher = KuvizPublisher::new(Credentials::new("analyst", "key"));
        let err = publisher
            .update_publication("<html></html>", "map", None)
            .unwrap_err();
        assert!(matches!(err, PublishError::NotPublished));
    }

    #[test]
    fn test_delete_before_publish_is_rejected() {
        let mut publisher = KuvizPublisher::new(Credentials::new("analyst", "key"));
        assert!(matches!(
            publisher.delete_publication(),
            Err(PublishError::NotPublished)
        ));
        assert!(!publisher.is_published());
    }
}
