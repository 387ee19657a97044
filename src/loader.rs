//! Loading service lists from local or remote YAML documents

use crate::errors::{CheckerError, Result};
use crate::model::Service;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
struct ServiceDocument {
    #[serde(default)]
    services: Vec<Service>,
}

/// Reads configuration documents and turns them into one service list.
#[derive(Debug, Clone)]
pub struct SourceLoader {
    client: Client,
}

impl SourceLoader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Load every location in order and concatenate their services.
    /// The first failure aborts the load.
    pub async fn load_all(&self, locations: &[String]) -> Result<Vec<Service>> {
        if locations.is_empty() {
            return Err(CheckerError::Config("No YAML file(s) provided".to_string()));
        }

        let mut services = Vec::new();
        for location in locations {
            let source = self.read(location).await?;
            let parsed = parse_services(&source)?;
            debug!("Loaded {} services from {}", parsed.len(), location);
            services.extend(parsed);
        }

        Ok(services)
    }

    /// Fetch `location` over HTTP if it looks like a URL, otherwise read it
    /// from disk.
    pub async fn read(&self, location: &str) -> Result<String> {
        if location.starts_with("http") {
            self.read_remote(location).await
        } else {
            tokio::fs::read_to_string(location)
                .await
                .map_err(|e| CheckerError::Source {
                    location: location.to_string(),
                    reason: e.to_string(),
                })
        }
    }

    async fn read_remote(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(CheckerError::Source {
                location: url.to_string(),
                reason: crate::probe::status_line(status),
            });
        }

        Ok(response.text().await?)
    }
}

/// Parse one YAML document of the form `services: [{name, sites}]`.
pub fn parse_services(source: &str) -> Result<Vec<Service>> {
    if source.trim().is_empty() {
        return Ok(Vec::new());
    }

    let document: ServiceDocument = serde_yaml::from_str(source)?;
    Ok(document.services)
}
