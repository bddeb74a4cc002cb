use super::ServiceHealth;
use crate::error::Result;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

const STATUS_TIMEOUT: Duration = Duration::from_secs(30);

/// Polls the public Stability AI status page.
#[derive(Debug, Clone)]
pub struct StatusClient {
    status_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct Summary {
    page: Page,
    #[serde(default, rename = "activeIncidents")]
    active_incidents: Vec<Incident>,
}

#[derive(Debug, Deserialize)]
struct Page {
    status: String,
}

#[derive(Debug, Deserialize)]
struct Incident {
    #[serde(default)]
    impact: String,
}

#[derive(Debug, Deserialize)]
struct Component {
    status: String,
}

impl StatusClient {
    pub fn new(status_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(STATUS_TIMEOUT).build()?;
        Ok(Self {
            status_url: status_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn check(&self) -> Result<bool> {
        let summary: Summary = self
            .client
            .get(format!("{}/summary.json", self.status_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !summary_is_healthy(&summary) {
            warn!(
                "Status page reports '{}' with {} active incident(s)",
                summary.page.status,
                summary.active_incidents.len()
            );
            return Ok(false);
        }

        let components: Vec<Component> = self
            .client
            .get(format!("{}/v2/components.json", self.status_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !components_operational(&components) {
            warn!("One or more API components are not operational");
            return Ok(false);
        }

        Ok(true)
    }
}

impl ServiceHealth for StatusClient {
    async fn service_available(&self) -> bool {
        match self.check().await {
            Ok(healthy) => {
                info!("Image API available: {}", healthy);
                healthy
            }
            Err(e) => {
                warn!("Failed to check API status: {}", e);
                false
            }
        }
    }
}

fn summary_is_healthy(summary: &Summary) -> bool {
    summary.page.status == "UP"
        && !summary
            .active_incidents
            .iter()
            .any(|incident| incident.impact == "MAJOROUTAGE")
}

fn components_operational(components: &[Component]) -> bool {
    components
        .iter()
        .all(|component| component.status == "OPERATIONAL")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn summary(value: serde_json::Value) -> Summary {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn up_without_incidents_is_healthy() {
        assert!(summary_is_healthy(&summary(json!({
            "page": { "name": "Stability AI", "status": "UP" }
        }))));
    }

    #[test]
    fn minor_incidents_do_not_block() {
        assert!(summary_is_healthy(&summary(json!({
            "page": { "status": "UP" },
            "activeIncidents": [{ "name": "slow uploads", "impact": "MINOROUTAGE" }]
        }))));
    }

    #[test]
    fn major_outage_or_degraded_page_is_unhealthy() {
        assert!(!summary_is_healthy(&summary(json!({
            "page": { "status": "UP" },
            "activeIncidents": [{ "impact": "MAJOROUTAGE" }]
        }))));
        assert!(!summary_is_healthy(&summary(json!({
            "page": { "status": "HASISSUES" }
        }))));
    }

    #[test]
    fn every_component_must_be_operational() {
        let ok: Vec<Component> = serde_json::from_value(json!([
            { "name": "REST API", "status": "OPERATIONAL" },
            { "name": "gRPC API", "status": "OPERATIONAL" }
        ]))
        .unwrap();
        assert!(components_operational(&ok));

        let degraded: Vec<Component> = serde_json::from_value(json!([
            { "status": "OPERATIONAL" },
            { "status": "DEGRADEDPERFORMANCE" }
        ]))
        .unwrap();
        assert!(!components_operational(&degraded));
    }

    #[tokio::test]
    async fn unreachable_status_page_counts_as_unavailable() {
        let client = StatusClient::new("http://127.0.0.1:9").unwrap();
        assert!(!client.service_available().await);
    }
}
