//! REST transport client for the Eureka registry.
//!
//! Turns typed registry operations into HTTP requests against an
//! ordered list of base URLs, with single-pass failover: each server is
//! tried in configured order and the first one that completes the round
//! trip at the transport level wins. A reachable server's HTTP status
//! is returned as-is and never retried against the next server.

use http::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::config::RegistryConfig;
use crate::model::{Application, Applications, Instance, InstanceStatus};
use crate::url::normalize_base_url;
use crate::{EurekaError, Result};

const XML_CONTENT_TYPE: &str = "application/xml";

/// Client for the Eureka REST operations with multi-server failover.
///
/// Safe to share across tasks: the URL list is immutable and the
/// underlying connection pool handles its own synchronization.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: reqwest::Client,
    base_urls: Vec<String>,
}

impl RegistryClient {
    /// Create a client for the given base URLs with default settings.
    ///
    /// URLs are normalized to the `/eureka/v2` API root and tried in
    /// the order given. At least one URL is required.
    pub fn new<I, S>(base_urls: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_config(base_urls, RegistryConfig::new())
    }

    /// Create a client with explicit transport configuration.
    pub fn with_config<I, S>(base_urls: I, config: RegistryConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let base_urls = base_urls
            .into_iter()
            .map(|u| normalize_base_url(u.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        if base_urls.is_empty() {
            return Err(EurekaError::Configuration(
                "at least one registry base URL is required".to_string(),
            ));
        }

        let client = match config.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .timeout(config.timeout)
                .connect_timeout(config.connect_timeout)
                .pool_idle_timeout(config.pool_idle_timeout)
                .pool_max_idle_per_host(config.pool_max_idle_per_host)
                .user_agent(&config.user_agent)
                .build()
                .map_err(|e| {
                    EurekaError::Configuration(format!("failed to build HTTP client: {e}"))
                })?,
        };

        Ok(Self { client, base_urls })
    }

    /// The normalized base URLs, in failover order.
    pub fn base_urls(&self) -> &[String] {
        &self.base_urls
    }

    /// Register a new instance: `POST /apps/{appID}`.
    pub async fn register_instance(&self, app_id: &str, instance: &Instance) -> Result<()> {
        let body = quick_xml::se::to_string(instance)?;

        let response = self
            .send_with_failover(|base_url| {
                self.client
                    .post(format!("{base_url}/apps/{app_id}"))
                    .header(CONTENT_TYPE, XML_CONTENT_TYPE)
                    .header(ACCEPT, XML_CONTENT_TYPE)
                    .body(body.clone())
            })
            .await?;

        match response.status() {
            StatusCode::CREATED | StatusCode::NO_CONTENT => {
                info!(app = app_id, "registered instance");
                Ok(())
            }
            status => Err(EurekaError::Protocol {
                operation: format!("register instance for application {app_id}"),
                status,
            }),
        }
    }

    /// De-register an instance: `DELETE /apps/{appID}/{instanceID}`.
    pub async fn unregister_instance(&self, app_id: &str, instance_id: &str) -> Result<()> {
        let response = self
            .send_with_failover(|base_url| {
                self.client
                    .delete(format!("{base_url}/apps/{app_id}/{instance_id}"))
                    .header(ACCEPT, XML_CONTENT_TYPE)
            })
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT => {
                info!(app = app_id, instance = instance_id, "unregistered instance");
                Ok(())
            }
            status => Err(EurekaError::Protocol {
                operation: format!("unregister instance {instance_id} of application {app_id}"),
                status,
            }),
        }
    }

    /// Renew the instance lease: `PUT /apps/{appID}/{instanceID}`.
    ///
    /// Returns `Ok(false)` if the server no longer knows the instance
    /// (HTTP 404); the caller is expected to re-register in that case.
    pub async fn heartbeat(&self, app_id: &str, instance_id: &str) -> Result<bool> {
        let response = self
            .send_with_failover(|base_url| {
                self.client
                    .put(format!("{base_url}/apps/{app_id}/{instance_id}"))
                    .header(ACCEPT, XML_CONTENT_TYPE)
            })
            .await?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(EurekaError::Protocol {
                operation: format!("heartbeat for instance {instance_id} of application {app_id}"),
                status,
            }),
        }
    }

    /// Fetch the full registry snapshot: `GET /apps`.
    pub async fn get_all_applications(&self) -> Result<Applications> {
        self.get_xml("/apps", "all applications".to_string()).await
    }

    /// Fetch one application: `GET /apps/{appID}`.
    pub async fn get_application(&self, app_id: &str) -> Result<Application> {
        self.get_xml(&format!("/apps/{app_id}"), format!("application {app_id}"))
            .await
    }

    /// Fetch one instance: `GET /apps/{appID}/{instanceID}`.
    pub async fn get_instance(&self, app_id: &str, instance_id: &str) -> Result<Instance> {
        self.get_xml(
            &format!("/apps/{app_id}/{instance_id}"),
            format!("instance {instance_id} of application {app_id}"),
        )
        .await
    }

    /// Query instances by virtual address: `GET /vips/{vip}`.
    pub async fn get_by_vip(&self, vip: &str) -> Result<Applications> {
        self.get_xml(&format!("/vips/{vip}"), format!("VIP {vip}"))
            .await
    }

    /// Query instances by secure virtual address: `GET /svips/{svip}`.
    pub async fn get_by_secure_vip(&self, svip: &str) -> Result<Applications> {
        self.get_xml(&format!("/svips/{svip}"), format!("secure VIP {svip}"))
            .await
    }

    /// Override the instance status:
    /// `PUT /apps/{appID}/{instanceID}/status?value={status}`.
    pub async fn set_status(
        &self,
        app_id: &str,
        instance_id: &str,
        status: InstanceStatus,
    ) -> Result<()> {
        let response = self
            .send_with_failover(|base_url| {
                self.client
                    .put(format!(
                        "{base_url}/apps/{app_id}/{instance_id}/status?value={status}"
                    ))
                    .header(ACCEPT, XML_CONTENT_TYPE)
            })
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            status => Err(EurekaError::Protocol {
                operation: format!(
                    "set status for instance {instance_id} of application {app_id}"
                ),
                status,
            }),
        }
    }

    /// Remove the status override, suggesting a fallback status:
    /// `DELETE /apps/{appID}/{instanceID}/status?value={fallback}`.
    pub async fn clear_status_override(
        &self,
        app_id: &str,
        instance_id: &str,
        fallback: InstanceStatus,
    ) -> Result<()> {
        let response = self
            .send_with_failover(|base_url| {
                self.client
                    .delete(format!(
                        "{base_url}/apps/{app_id}/{instance_id}/status?value={fallback}"
                    ))
                    .header(ACCEPT, XML_CONTENT_TYPE)
            })
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            status => Err(EurekaError::Protocol {
                operation: format!(
                    "clear status override for instance {instance_id} of application {app_id}"
                ),
                status,
            }),
        }
    }

    /// Update instance metadata:
    /// `PUT /apps/{appID}/{instanceID}/metadata?{key=value&...}`.
    ///
    /// Keys and values are percent-encoded. An empty map is rejected
    /// before any network call.
    pub async fn update_metadata(
        &self,
        app_id: &str,
        instance_id: &str,
        metadata: &BTreeMap<String, String>,
    ) -> Result<()> {
        if metadata.is_empty() {
            return Err(EurekaError::InvalidArgument(
                "metadata map cannot be empty".to_string(),
            ));
        }
        let query = serde_urlencoded::to_string(metadata)
            .map_err(|e| EurekaError::InvalidArgument(format!("unencodable metadata: {e}")))?;

        let response = self
            .send_with_failover(|base_url| {
                self.client
                    .put(format!(
                        "{base_url}/apps/{app_id}/{instance_id}/metadata?{query}"
                    ))
                    .header(ACCEPT, XML_CONTENT_TYPE)
            })
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            status => Err(EurekaError::Protocol {
                operation: format!(
                    "update metadata for instance {instance_id} of application {app_id}"
                ),
                status,
            }),
        }
    }

    /// GET a path and decode the XML body.
    async fn get_xml<T: DeserializeOwned>(&self, path: &str, operation: String) -> Result<T> {
        let response = self
            .send_with_failover(|base_url| {
                self.client
                    .get(format!("{base_url}{path}"))
                    .header(ACCEPT, XML_CONTENT_TYPE)
            })
            .await?;

        if response.status() != StatusCode::OK {
            return Err(EurekaError::Protocol {
                operation,
                status: response.status(),
            });
        }

        let url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|source| EurekaError::Transport { url, source })?;
        quick_xml::de::from_str(&body).map_err(|source| EurekaError::Decode { operation, source })
    }

    /// Try each base URL in configured order until one completes the
    /// round trip. Only transport-level failures advance to the next
    /// URL; any HTTP response, whatever its status, ends the loop.
    async fn send_with_failover<F>(&self, build: F) -> Result<reqwest::Response>
    where
        F: Fn(&str) -> reqwest::RequestBuilder,
    {
        let mut last_err = None;
        for base_url in &self.base_urls {
            debug!(url = %base_url, "sending registry request");
            match build(base_url).send().await {
                Ok(response) => return Ok(response),
                Err(source) => {
                    debug!(url = %base_url, error = %source, "registry server unreachable");
                    last_err = Some(EurekaError::Transport {
                        url: base_url.clone(),
                        source,
                    });
                }
            }
        }
        // The constructor guarantees a non-empty URL list.
        Err(last_err.unwrap_or_else(|| {
            EurekaError::Configuration("no registry base URLs configured".to_string())
        }))
    }
}
