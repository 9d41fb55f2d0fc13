//! Remote catalogue boundary.
//!
//! [`CatalogClient`] is the set of calls the synchronizer makes against the
//! central catalogue. [`HttpCatalogClient`] implements it over the REST API
//! with a blocking `reqwest` client; tests substitute in-memory fakes.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde_json::Value;

use crate::error::{HarvestError, Result};

/// Request timeout for catalogue calls.
const TIMEOUT: Duration = Duration::from_secs(40);

/// Operations on the remote catalogue.
///
/// Implementations are shared by all workers of a run.
pub trait CatalogClient: Send + Sync {
    /// Fetches a dataset document.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::RemoteCall`] on failure.
    fn get(&self, id: &str) -> Result<Value>;

    /// Creates a dataset and returns the id assigned by the catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::RemoteCall`] on failure.
    fn create(&self, document: &Value) -> Result<String>;

    /// Replaces a dataset.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::RemoteCall`] on failure.
    fn update(&self, id: &str, document: &Value) -> Result<()>;

    /// Deletes a dataset.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::RemoteCall`] on failure.
    fn delete(&self, id: &str) -> Result<()>;

    /// Sets the publication level (e.g. `Public`).
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::RemoteCall`] on failure.
    fn set_publication_level(&self, id: &str, level: &str) -> Result<()>;

    /// Sets the registration status (e.g. `Registered`).
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::RemoteCall`] on failure.
    fn set_registration_status(&self, id: &str, status: &str) -> Result<()>;
}

/// REST client for the catalogue API (`{base}/datasets[/{id}]`).
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    http: Client,
    base_url: String,
    token: String,
}

impl HttpCatalogClient {
    /// Creates a client for `base_url` authenticating with a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        Ok(Self {
            http: Client::builder().timeout(TIMEOUT).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.trim_start_matches("Bearer ").trim().to_string(),
        })
    }

    fn datasets_url(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/datasets/{id}", self.base_url),
            None => format!("{}/datasets", self.base_url),
        }
    }

    fn send(&self, operation: &'static str, request: reqwest::blocking::RequestBuilder) -> Result<Response> {
        let response = request
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(|e| HarvestError::remote(operation, e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(HarvestError::RemoteCall {
            operation,
            status: Some(status.as_u16()),
            message: response.text().unwrap_or_default(),
        })
    }
}

impl CatalogClient for HttpCatalogClient {
    fn get(&self, id: &str) -> Result<Value> {
        let response = self.send("get", self.http.get(self.datasets_url(Some(id))))?;
        response
            .json()
            .map_err(|e| HarvestError::remote("get", e.to_string()))
    }

    fn create(&self, document: &Value) -> Result<String> {
        let response = self.send("create", self.http.post(self.datasets_url(None)).json(document))?;
        let body = response
            .text()
            .map_err(|e| HarvestError::remote("create", e.to_string()))?;
        parse_created_id(&body)
    }

    fn update(&self, id: &str, document: &Value) -> Result<()> {
        self.send("update", self.http.put(self.datasets_url(Some(id))).json(document))?;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.send("delete", self.http.delete(self.datasets_url(Some(id))))?;
        Ok(())
    }

    fn set_publication_level(&self, id: &str, level: &str) -> Result<()> {
        let url = format!("{}/publication-level", self.datasets_url(Some(id)));
        self.send("publication-level", self.http.put(url).query(&[("level", level)]))?;
        Ok(())
    }

    fn set_registration_status(&self, id: &str, status: &str) -> Result<()> {
        let url = format!("{}/registration-status", self.datasets_url(Some(id)));
        self.send("registration-status", self.http.put(url).query(&[("status", status)]))?;
        Ok(())
    }
}

/// Extracts the new id from a create response.
///
/// The catalogue answers with either a JSON string or an object carrying an
/// `id` field; a bare non-JSON body is taken as the id itself.
///
/// # Errors
///
/// Returns [`HarvestError::RemoteCall`] if no id can be found.
pub fn parse_created_id(body: &str) -> Result<String> {
    let body = body.trim();
    let id = match serde_json::from_str::<Value>(body) {
        Ok(Value::String(id)) => Some(id),
        Ok(Value::Object(map)) => map.get("id").and_then(Value::as_str).map(String::from),
        Ok(_) => None,
        Err(_) => Some(body.to_string()),
    };
    id.filter(|id| !id.is_empty())
        .ok_or_else(|| HarvestError::remote("create", format!("no id in response: {body}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_created_id() {
        assert_eq!(parse_created_id(r#""0f9e-11""#).unwrap(), "0f9e-11");
        assert_eq!(
            parse_created_id(r#"{"id": "abc", "identifier": "x"}"#).unwrap(),
            "abc"
        );
        assert_eq!(parse_created_id("plain-id\n").unwrap(), "plain-id");
        assert!(parse_created_id("{}").is_err());
        assert!(parse_created_id("").is_err());
        assert!(parse_created_id("42").is_err());
    }

    #[test]
    fn test_urls() {
        let client = HttpCatalogClient::new("https://api.example.org/partner/v1/", "Bearer t0k").unwrap();
        assert_eq!(client.token, "t0k");
        assert_eq!(
            client.datasets_url(None),
            "https://api.example.org/partner/v1/datasets"
        );
        assert_eq!(
            client.datasets_url(Some("abc")),
            "https://api.example.org/partner/v1/datasets/abc"
        );
    }
}
