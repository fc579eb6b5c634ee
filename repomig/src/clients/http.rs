//! Shared HTTP plumbing for the Fedora REST clients

use std::time::Duration;

use repomig_common::config::RepositoryConfig;

use crate::error::{MigrationError, Result};

const USER_AGENT: &str = concat!("repomig/", env!("CARGO_PKG_VERSION"));

/// Base URL plus credentials for one repository
#[derive(Clone)]
pub struct FedoraConnection {
    http_client: reqwest::Client,
    base_url: String,
    username: String,
    password: Option<String>,
}

impl FedoraConnection {
    pub fn new(config: &RepositoryConfig, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| MigrationError::ClientSetup(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// `{base}/objects/{path}`
    pub fn objects_url(&self, path: &str) -> String {
        format!("{}/objects/{}", self.base_url, path)
    }

    pub fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http_client
            .get(url)
            .basic_auth(&self.username, self.password.as_ref())
    }

    pub fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.http_client
            .post(url)
            .basic_auth(&self.username, self.password.as_ref())
    }

    /// Send a request and fail on any status above 399
    pub async fn send(&self, url: &str, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        tracing::debug!(url = %url, "Sending repository request");

        let response = request
            .send()
            .await
            .map_err(|e| MigrationError::network(url, e))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(MigrationError::status(url, status.as_u16(), &body));
        }

        Ok(response)
    }

    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.send(url, self.get(url)).await?;
        response.text().await.map_err(|e| MigrationError::network(url, e))
    }

    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.send(url, self.get(url)).await?;
        let bytes = response.bytes().await.map_err(|e| MigrationError::network(url, e))?;
        Ok(bytes.to_vec())
    }
}

/// Append query parameters, percent-encoded
pub fn with_params(url: &str, params: &[(&str, &str)]) -> Result<String> {
    reqwest::Url::parse_with_params(url, params)
        .map(String::from)
        .map_err(|e| MigrationError::network(url, format!("invalid URL: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objects_url_strips_trailing_slash() {
        let config = RepositoryConfig {
            base_url: "http://localhost:8080/fedora/".to_string(),
            ..Default::default()
        };
        let conn = FedoraConnection::new(&config, None).unwrap();
        assert_eq!(
            conn.objects_url("coccc:1/datastreams?format=xml"),
            "http://localhost:8080/fedora/objects/coccc:1/datastreams?format=xml"
        );
    }

    #[test]
    fn test_with_params_encodes_values() {
        let url = with_params(
            "http://localhost:8080/fedora/objects/new",
            &[("label", "Oral History #3"), ("namespace", "coccc")],
        )
        .unwrap();
        assert!(url.starts_with("http://localhost:8080/fedora/objects/new?label="));
        assert!(!url.contains(' '));
        assert!(url.contains("%233"));
        assert!(url.ends_with("&namespace=coccc"));
    }
}
